use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// 整份讀入的文字檔
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub path: String,
    pub content: String,
}

impl TextDocument {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        count_lines(&self.content)
    }
}

/// 以換行符計算行數；結尾沒有換行的最後一行也算一行
pub fn count_lines(content: &str) -> usize {
    content.split_inclusive('\n').count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchKind {
    WorkflowPermissions,
    BuildFix,
}

impl PatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            PatchKind::WorkflowPermissions => "workflow permissions",
            PatchKind::BuildFix => "build fix",
        }
    }
}

/// 純文字轉換的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub content: String,
    /// 插入點數量（workflow）或刪除行數（build fix）
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    pub patch: PatchKind,
    pub path: String,
    pub matches: usize,
    pub lines_before: usize,
    pub lines_after: usize,
    pub changed: bool,
    pub written: bool,
}

impl PatchOutcome {
    pub fn line_delta(&self) -> i64 {
        self.lines_after as i64 - self.lines_before as i64
    }

    /// 給使用者看的確認訊息
    pub fn summary(&self) -> String {
        let action = match self.patch {
            PatchKind::WorkflowPermissions => format!(
                "inserted the permission-fix step before {} run-on-arch action(s)",
                self.matches
            ),
            PatchKind::BuildFix => format!("removed {} duplicated line(s)", self.matches),
        };
        let verb = if self.written { "Patched" } else { "Would patch" };
        format!(
            "{} {}: {} ({} -> {} lines)",
            verb, self.path, action, self.lines_before, self.lines_after
        )
    }
}

/// `--json` 輸出用的報告
pub fn to_json_report<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
