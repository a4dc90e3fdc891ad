use crate::core::{Patch, PatchKind, PatchResult};
use crate::utils::error::Result;

pub const DEFAULT_BUILD_PATH: &str = "build.py";
pub const DEFAULT_LINE_THRESHOLD: usize = 630;
pub const DEFAULT_PERMISSION_MARKER: &str = "确保所有的脚本都有执行权限";
pub const DEFAULT_DUPLICATE_MARKER: &str = "cp -a DEBIAN/* tmpdeb/DEBIAN/";

/// 移除 build 腳本中重複的區塊與多餘的 `else:`
///
/// 規則只在行號（從 0 起算）大於 `threshold` 時生效：
/// - 權限註解之後的第一個 `else:` 會被刪除
/// - 兩個 duplicate marker 之間（含兩端）的所有行會被刪除
#[derive(Debug, Clone)]
pub struct BuildFix {
    path: String,
    threshold: usize,
    permission_marker: String,
    duplicate_marker: String,
}

impl BuildFix {
    pub fn new(
        path: impl Into<String>,
        threshold: usize,
        permission_marker: impl Into<String>,
        duplicate_marker: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            threshold,
            permission_marker: permission_marker.into(),
            duplicate_marker: duplicate_marker.into(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_BUILD_PATH,
            DEFAULT_LINE_THRESHOLD,
            DEFAULT_PERMISSION_MARKER,
            DEFAULT_DUPLICATE_MARKER,
        )
    }
}

impl Patch for BuildFix {
    fn kind(&self) -> PatchKind {
        PatchKind::BuildFix
    }

    fn target(&self) -> &str {
        &self.path
    }

    fn apply(&self, content: &str) -> Result<PatchResult> {
        let mut kept = String::with_capacity(content.len());
        let mut removed = 0;
        let mut skip_next_else = false;
        let mut in_duplicate_block = false;

        for (index, line) in content.split_inclusive('\n').enumerate() {
            let past_threshold = index > self.threshold;

            if skip_next_else && line.trim() == "else:" {
                skip_next_else = false;
                tracing::debug!("Dropping stray else at line {}", index + 1);
                removed += 1;
                continue;
            }

            if past_threshold && line.contains(&self.permission_marker) {
                skip_next_else = true;
            }

            if line.contains(&self.duplicate_marker) {
                if in_duplicate_block {
                    in_duplicate_block = false;
                    tracing::debug!("Duplicate block ends at line {}", index + 1);
                    removed += 1;
                    continue;
                }
                if past_threshold {
                    in_duplicate_block = true;
                    tracing::debug!("Duplicate block starts at line {}", index + 1);
                    removed += 1;
                    continue;
                }
            }

            if in_duplicate_block {
                removed += 1;
            } else {
                kept.push_str(line);
            }
        }

        if in_duplicate_block {
            tracing::warn!("Duplicate block was never closed; dropped everything to end of file");
        }

        Ok(PatchResult {
            content: kept,
            matches: removed,
        })
    }
}
