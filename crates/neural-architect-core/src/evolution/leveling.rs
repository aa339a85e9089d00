//! Experience curve and cosmetic growth curves.
//!
//! Every function here is pure and total over its integer domain. Results
//! saturate instead of overflowing for absurd inputs.

use serde::{Deserialize, Serialize};

const BASE_EXP_MULTIPLIER: f64 = 100.0;
const EXP_CURVE_EXPONENT: f64 = 1.5;

const BASE_NEURON_COUNT: f64 = 3.0;
const NEURON_GROWTH_RATE: f64 = 1.15;
const CONNECTION_DENSITY: f64 = 1.5;
const CONNECTION_LEVEL_EXPONENT: f64 = 0.3;

/// XP needed to go from `level` to `level + 1`: `floor(100 * level^1.5)`.
pub fn experience_to_next_level(level: u32) -> u64 {
    (BASE_EXP_MULTIPLIER * f64::from(level).powf(EXP_CURVE_EXPONENT)).floor() as u64
}

/// Cumulative XP required to reach `level`. Level 1 (and 0) needs nothing.
pub fn total_experience_for_level(level: u32) -> u64 {
    (1..level).fold(0u64, |total, i| {
        total.saturating_add(experience_to_next_level(i))
    })
}

/// Largest `level >= 1` whose cumulative requirement fits in `total_experience`.
pub fn level_from_total_experience(total_experience: u64) -> u32 {
    let mut level: u32 = 1;
    let mut required: u64 = 0;
    loop {
        let next = required.saturating_add(experience_to_next_level(level));
        // Saturated: no further level can be distinguished.
        if next > total_experience || next == required || level == u32::MAX {
            return level;
        }
        required = next;
        level += 1;
    }
}

/// `floor(3 * 1.15^(level - 1))`.
pub fn neuron_count(level: u32) -> u64 {
    let exponent = level.saturating_sub(1);
    (BASE_NEURON_COUNT * NEURON_GROWTH_RATE.powf(f64::from(exponent))).floor() as u64
}

/// `floor(neuron_count(level) * 1.5 * level^0.3)`.
pub fn connection_count(level: u32) -> u64 {
    let neurons = neuron_count(level) as f64;
    (neurons * CONNECTION_DENSITY * f64::from(level).powf(CONNECTION_LEVEL_EXPONENT)).floor()
        as u64
}

/// Cosmetic progression bucket derived from level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureTier {
    Basic,
    Intermediate,
    Advanced,
    Expert,
    Master,
    Legendary,
}

/// Minimum level for each tier, ascending.
pub const TIER_THRESHOLDS: [(u32, ArchitectureTier); 6] = [
    (1, ArchitectureTier::Basic),
    (5, ArchitectureTier::Intermediate),
    (15, ArchitectureTier::Advanced),
    (25, ArchitectureTier::Expert),
    (35, ArchitectureTier::Master),
    (50, ArchitectureTier::Legendary),
];

/// Highest tier whose threshold is `<= level`.
pub fn architecture_tier(level: u32) -> ArchitectureTier {
    TIER_THRESHOLDS
        .iter()
        .rev()
        .find(|(threshold, _)| level >= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(ArchitectureTier::Basic)
}

impl ArchitectureTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitectureTier::Basic => "basic",
            ArchitectureTier::Intermediate => "intermediate",
            ArchitectureTier::Advanced => "advanced",
            ArchitectureTier::Expert => "expert",
            ArchitectureTier::Master => "master",
            ArchitectureTier::Legendary => "legendary",
        }
    }
}

impl std::fmt::Display for ArchitectureTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature unlocked when a level milestone is reached.
pub const LEVEL_MILESTONES: [(u32, &str); 9] = [
    (5, "unlock_intermediate_architecture"),
    (10, "unlock_advanced_visualizations"),
    (15, "unlock_advanced_architecture"),
    (20, "unlock_custom_themes"),
    (25, "unlock_expert_architecture"),
    (30, "unlock_network_customization"),
    (35, "unlock_master_architecture"),
    (40, "unlock_advanced_analytics"),
    (50, "unlock_legendary_architecture"),
];

/// Milestone feature ids reached at `level`, in milestone order.
pub fn milestone_features(level: u32) -> impl Iterator<Item = &'static str> {
    LEVEL_MILESTONES
        .iter()
        .filter(move |(threshold, _)| *threshold <= level)
        .map(|(_, feature)| *feature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_curve_values() {
        assert_eq!(experience_to_next_level(1), 100);
        assert_eq!(experience_to_next_level(2), 282);
        assert_eq!(experience_to_next_level(3), 519);
    }

    #[test]
    fn cumulative_requirements() {
        assert_eq!(total_experience_for_level(0), 0);
        assert_eq!(total_experience_for_level(1), 0);
        assert_eq!(total_experience_for_level(2), 100);
        assert_eq!(total_experience_for_level(3), 382);
        assert_eq!(total_experience_for_level(4), 901);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_from_total_experience(0), 1);
        assert_eq!(level_from_total_experience(99), 1);
        assert_eq!(level_from_total_experience(100), 2);
        assert_eq!(level_from_total_experience(381), 2);
        assert_eq!(level_from_total_experience(382), 3);
    }

    #[test]
    fn level_from_max_experience_terminates() {
        let level = level_from_total_experience(u64::MAX);
        assert!(level > 1);
        assert!(total_experience_for_level(level) <= u64::MAX);
    }

    #[test]
    fn growth_curves() {
        assert_eq!(neuron_count(1), 3);
        assert_eq!(neuron_count(2), 3);
        assert_eq!(neuron_count(4), 4);
        assert_eq!(connection_count(1), 4);
        let mut prev_n = 0;
        let mut prev_c = 0;
        for level in 1..=100 {
            let n = neuron_count(level);
            let c = connection_count(level);
            assert!(n >= prev_n, "neurons decreased at level {level}");
            assert!(c >= prev_c, "connections decreased at level {level}");
            prev_n = n;
            prev_c = c;
        }
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(architecture_tier(0), ArchitectureTier::Basic);
        assert_eq!(architecture_tier(1), ArchitectureTier::Basic);
        assert_eq!(architecture_tier(4), ArchitectureTier::Basic);
        assert_eq!(architecture_tier(5), ArchitectureTier::Intermediate);
        assert_eq!(architecture_tier(14), ArchitectureTier::Intermediate);
        assert_eq!(architecture_tier(15), ArchitectureTier::Advanced);
        assert_eq!(architecture_tier(25), ArchitectureTier::Expert);
        assert_eq!(architecture_tier(35), ArchitectureTier::Master);
        assert_eq!(architecture_tier(49), ArchitectureTier::Master);
        assert_eq!(architecture_tier(50), ArchitectureTier::Legendary);
        assert_eq!(architecture_tier(500), ArchitectureTier::Legendary);
    }

    #[test]
    fn milestones_up_to_level() {
        assert_eq!(milestone_features(4).count(), 0);
        let at_ten: Vec<_> = milestone_features(10).collect();
        assert_eq!(
            at_ten,
            vec!["unlock_intermediate_architecture", "unlock_advanced_visualizations"]
        );
        assert_eq!(milestone_features(99).count(), LEVEL_MILESTONES.len());
    }
}
