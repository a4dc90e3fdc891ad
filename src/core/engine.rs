use crate::core::{Patch, PatchOutcome, Storage, TextDocument};
use crate::utils::error::Result;

pub struct PatchEngine<S: Storage> {
    storage: S,
    dry_run: bool,
}

impl<S: Storage> PatchEngine<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            dry_run: false,
        }
    }

    pub fn new_with_dry_run(storage: S, dry_run: bool) -> Self {
        Self { storage, dry_run }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 讀檔、套用、寫回。沒有變更時仍會寫回，dry run 時不寫。
    pub fn run<P: Patch + ?Sized>(&self, patch: &P) -> Result<PatchOutcome> {
        let kind = patch.kind();
        tracing::info!("Applying {} patch to {}", kind.label(), patch.target());

        let document = TextDocument::new(patch.target(), self.storage.read_file(patch.target())?);
        let lines_before = document.line_count();
        tracing::debug!("Read {} lines from {}", lines_before, document.path);

        let result = patch.apply(&document.content)?;
        let patched = TextDocument::new(document.path.clone(), result.content);
        let changed = patched.content != document.content;

        if result.matches == 0 {
            tracing::warn!("No matching lines in {}; content left as is", document.path);
        }

        let written = if self.dry_run {
            tracing::info!("Dry run: not writing {}", document.path);
            false
        } else {
            self.storage.write_file(&patched.path, &patched.content)?;
            true
        };

        let outcome = PatchOutcome {
            patch: kind,
            path: patched.path.clone(),
            matches: result.matches,
            lines_before,
            lines_after: patched.line_count(),
            changed,
            written,
        };

        tracing::info!(
            "{}: {} match(es), {} -> {} lines",
            outcome.path,
            outcome.matches,
            outcome.lines_before,
            outcome.lines_after
        );

        Ok(outcome)
    }
}
