use clap::Subcommand;
use neural_architect_core::{EvolutionStore, SessionRecord, SessionStore, UserStatsStore};

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Level, tier and network growth
    Evolution,
    /// Completed focus sessions, oldest first
    Sessions {
        /// Only show the most recent N sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Work time, streaks and achievements
    User,
}

pub fn run(action: StatsAction) -> CliResult {
    let store = open_store()?;

    match action {
        StatsAction::Evolution => {
            let evolution = EvolutionStore::load(store)?;
            let state = evolution.state();
            let mut json = serde_json::to_value(state)?;
            if let Some(obj) = json.as_object_mut() {
                obj.insert("levelProgress".into(), state.level_progress().into());
            }
            print_json(&json)?;
        }
        StatsAction::Sessions { limit } => {
            let sessions = SessionStore::load(store)?;
            let history: Vec<&SessionRecord> = sessions.history().collect();
            let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
            print_json(&history[skip..])?;
        }
        StatsAction::User => {
            let stats = UserStatsStore::load(store)?;
            print_json(stats.stats())?;
        }
    }
    Ok(())
}
