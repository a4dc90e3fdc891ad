pub mod build_fix;
pub mod engine;
pub mod workflow_patch;

pub use crate::domain::model::{PatchKind, PatchOutcome, PatchResult, TextDocument};
pub use crate::domain::ports::{Patch, Storage};
pub use crate::utils::error::Result;
