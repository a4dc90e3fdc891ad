use crate::domain::model::{PatchKind, PatchResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<String>;
    fn write_file(&self, path: &str, content: &str) -> Result<()>;
}

pub trait Patch {
    fn kind(&self) -> PatchKind;
    fn target(&self) -> &str;
    fn apply(&self, content: &str) -> Result<PatchResult>;
}
