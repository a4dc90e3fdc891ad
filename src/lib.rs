pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::FixupConfig;
pub use crate::core::{
    build_fix::BuildFix, engine::PatchEngine, workflow_patch::WorkflowPatch, Patch, PatchKind,
    PatchOutcome, Storage,
};
pub use utils::error::{PatchError, Result};
