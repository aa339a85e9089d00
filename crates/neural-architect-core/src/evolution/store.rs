use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::leveling::{
    architecture_tier, connection_count, experience_to_next_level, level_from_total_experience,
    milestone_features, neuron_count, total_experience_for_level, ArchitectureTier,
};
use crate::error::StorageError;
use crate::events::Event;
use crate::storage::{KeyValueStore, SnapshotSlot};

pub const EVOLUTION_STORAGE_KEY: &str = "neural-architect-evolution";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neuron {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub activated: bool,
    pub layer: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub active: bool,
}

/// Visualization state. Carried opaquely; the core never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkState {
    pub neurons: Vec<Neuron>,
    pub connections: Vec<Connection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_frame: Option<u64>,
}

/// Field-wise replacement for [`NetworkState`]; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct NetworkStatePatch {
    pub neurons: Option<Vec<Neuron>>,
    pub connections: Option<Vec<Connection>>,
    pub animation_frame: Option<Option<u64>>,
}

/// Experience aggregate. Everything except `total_experience`,
/// `unlocked_features` and `network_state` is derived from the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvolutionState {
    pub level: u32,
    /// Progress within the current level.
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub total_experience: u64,
    pub neuron_count: u64,
    pub connection_count: u64,
    pub architecture_tier: ArchitectureTier,
    pub unlocked_features: Vec<String>,
    pub network_state: NetworkState,
}

impl Default for EvolutionState {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next_level: experience_to_next_level(1),
            total_experience: 0,
            neuron_count: neuron_count(1),
            connection_count: connection_count(1),
            architecture_tier: ArchitectureTier::Basic,
            unlocked_features: Vec::new(),
            network_state: NetworkState::default(),
        }
    }
}

impl EvolutionState {
    /// New snapshot at `total_experience` with every derived field recomputed.
    pub fn with_total_experience(&self, total_experience: u64) -> Self {
        let level = level_from_total_experience(total_experience);
        Self {
            level,
            experience: total_experience - total_experience_for_level(level),
            experience_to_next_level: experience_to_next_level(level),
            total_experience,
            neuron_count: neuron_count(level),
            connection_count: connection_count(level),
            architecture_tier: architecture_tier(level),
            unlocked_features: self.unlocked_features.clone(),
            network_state: self.network_state.clone(),
        }
    }

    /// Re-derives level-dependent fields so a persisted snapshot cannot desync.
    pub fn recomputed(&self) -> Self {
        self.with_total_experience(self.total_experience)
    }

    /// 0.0 .. 1.0 progress towards the next level.
    pub fn level_progress(&self) -> f64 {
        if self.experience_to_next_level == 0 {
            return 0.0;
        }
        (self.experience as f64 / self.experience_to_next_level as f64).min(1.0)
    }

    pub fn has_feature(&self, feature_id: &str) -> bool {
        self.unlocked_features.iter().any(|f| f == feature_id)
    }
}

/// Owns the [`EvolutionState`] and persists every change.
pub struct EvolutionStore {
    state: EvolutionState,
    slot: Option<SnapshotSlot>,
}

impl EvolutionStore {
    /// Unpersisted store starting at level 1.
    pub fn new() -> Self {
        Self {
            state: EvolutionState::default(),
            slot: None,
        }
    }

    /// Rehydrate from storage. A missing or malformed snapshot starts fresh.
    ///
    /// # Errors
    /// Returns the store's error when the snapshot cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let slot = SnapshotSlot::new(store, EVOLUTION_STORAGE_KEY);
        let state = slot
            .load::<EvolutionState>()?
            .map(|persisted| persisted.recomputed())
            .unwrap_or_default();
        tracing::debug!(
            level = state.level,
            total_experience = state.total_experience,
            "evolution state loaded"
        );
        Ok(Self {
            state,
            slot: Some(slot),
        })
    }

    pub fn state(&self) -> &EvolutionState {
        &self.state
    }

    /// Add XP and recompute every derived field in one update.
    ///
    /// Returns `Event::LevelUp` when the level increased.
    pub fn add_experience(&mut self, amount: u64) -> Option<Event> {
        self.add_experience_at(amount, Utc::now())
    }

    /// [`add_experience`](Self::add_experience) with the event stamped `at`.
    pub fn add_experience_at(&mut self, amount: u64, at: DateTime<Utc>) -> Option<Event> {
        if amount == 0 {
            return None;
        }
        let previous = self.state.level;
        let total = self.state.total_experience.saturating_add(amount);
        let next = self.state.with_total_experience(total);
        let level_up = (next.level > previous).then(|| Event::LevelUp {
            from_level: previous,
            to_level: next.level,
            tier: next.architecture_tier,
            at,
        });
        self.commit(next);

        if level_up.is_some() {
            tracing::info!(
                level = self.state.level,
                tier = %self.state.architecture_tier,
                "level up"
            );
        }
        level_up
    }

    /// Idempotent: unlocking an already-unlocked feature is a no-op.
    pub fn unlock_feature(&mut self, feature_id: &str) -> Option<Event> {
        self.unlock_feature_at(feature_id, Utc::now())
    }

    pub fn unlock_feature_at(&mut self, feature_id: &str, at: DateTime<Utc>) -> Option<Event> {
        if self.state.has_feature(feature_id) {
            return None;
        }
        let mut next = self.state.clone();
        next.unlocked_features.push(feature_id.to_string());
        self.commit(next);
        tracing::info!(feature_id, "feature unlocked");
        Some(Event::FeatureUnlocked {
            feature_id: feature_id.to_string(),
            at,
        })
    }

    /// Unlock every milestone feature reached at the current level.
    pub fn unlock_milestones(&mut self) -> Vec<Event> {
        self.unlock_milestones_at(Utc::now())
    }

    pub fn unlock_milestones_at(&mut self, at: DateTime<Utc>) -> Vec<Event> {
        let level = self.state.level;
        milestone_features(level)
            .filter_map(|feature| self.unlock_feature_at(feature, at))
            .collect()
    }

    pub fn update_network_state(&mut self, patch: NetworkStatePatch) {
        let mut next = self.state.clone();
        if let Some(neurons) = patch.neurons {
            next.network_state.neurons = neurons;
        }
        if let Some(connections) = patch.connections {
            next.network_state.connections = connections;
        }
        if let Some(frame) = patch.animation_frame {
            next.network_state.animation_frame = frame;
        }
        self.commit(next);
    }

    fn commit(&mut self, next: EvolutionState) {
        self.state = next;
        if let Some(slot) = &self.slot {
            slot.save(&self.state);
        }
    }
}

impl Default for EvolutionStore {
    fn default() -> Self {
        Self::new()
    }
}
