use clap::Subcommand;
use neural_architect_core::{Config, PomodoroConfigPatch, SessionCategory, SessionTag};

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum TagAction {
    /// Create a tag
    Add {
        /// Display label
        label: String,
        /// Category the tag belongs to
        #[arg(long, default_value = "work")]
        category: SessionCategory,
    },
    /// Delete a tag and detach it from recorded sessions
    Remove {
        /// Tag ID
        id: String,
    },
    /// List all tags as JSON
    List,
}

pub fn run(action: TagAction) -> CliResult {
    let config = Config::load_or_default();
    let mut engine = open_engine(&config)?;

    match action {
        TagAction::Add { label, category } => {
            let tag = SessionTag::new(&label, category)?;
            engine.hooks_mut().sessions_mut().add_tag(tag.clone());
            print_json(&tag)?;
        }
        TagAction::Remove { id } => {
            let Some(removed) = engine.hooks_mut().sessions_mut().remove_tag(&id) else {
                return Err(format!("unknown tag: {id}").into());
            };
            if engine.config().has_tag(&id) {
                let remaining = engine
                    .config()
                    .active_tags
                    .iter()
                    .filter(|t| **t != id)
                    .cloned()
                    .collect();
                engine.set_config(PomodoroConfigPatch {
                    active_tags: Some(remaining),
                    ..Default::default()
                });
            }
            print_json(&removed)?;
        }
        TagAction::List => {
            let tags: Vec<&SessionTag> = engine.hooks().sessions().tags().collect();
            print_json(&tags)?;
        }
    }
    Ok(())
}
