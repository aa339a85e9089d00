//! Experience and leveling.
//!
//! [`leveling`] holds the pure curves; [`EvolutionStore`] is the persisted
//! aggregate that the "add experience" hook feeds.

pub mod leveling;
mod store;

pub use leveling::{
    architecture_tier, connection_count, experience_to_next_level, level_from_total_experience,
    milestone_features, neuron_count, total_experience_for_level, ArchitectureTier,
    LEVEL_MILESTONES,
};
pub use store::{
    Connection, EvolutionState, EvolutionStore, NetworkState, NetworkStatePatch, Neuron,
    EVOLUTION_STORAGE_KEY,
};
