use crate::core::{Patch, PatchKind, PatchResult};
use crate::utils::error::Result;
use regex::{Captures, Regex};

pub const DEFAULT_WORKFLOW_PATH: &str = ".github/workflows/flutter-build.yml";
pub const DEFAULT_MARKER: &str = "- uses: rustdesk-org/run-on-arch-action@amd64-support";
pub const DEFAULT_PERMISSION_STEP: &str = "      - name: Fix permissions for run-on-arch
        run: |
          chmod +x .github/set-permissions.sh
          .github/set-permissions.sh
";

/// 在每個 marker 之前插入權限修復步驟
///
/// marker 前面必須至少有一個空白字元；匹配會吞掉前一行的換行與縮排，
/// 替換時補回一個換行，所以步驟區塊與 marker 之間會多一行空行。
/// 換行符跟著被吞掉的那個換行走：CRLF 檔案插入的區塊也是 CRLF。
/// 重複執行會重複插入。
#[derive(Debug, Clone)]
pub struct WorkflowPatch {
    path: String,
    marker: String,
    step: String,
    step_crlf: String,
    pattern: Regex,
}

impl WorkflowPatch {
    pub fn new(path: impl Into<String>, marker: impl Into<String>, step: impl Into<String>) -> Result<Self> {
        let marker: String = marker.into();
        let pattern = Regex::new(&format!(r"(\s+{})", regex::escape(&marker)))?;
        let step: String = step.into();
        let step = step.replace("\r\n", "\n");
        let step_crlf = step.replace('\n', "\r\n");

        Ok(Self {
            path: path.into(),
            marker,
            step,
            step_crlf,
            pattern,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_WORKFLOW_PATH, DEFAULT_MARKER, DEFAULT_PERMISSION_STEP)
    }

    /// 每次插入增加的換行數
    pub fn lines_per_insertion(&self) -> usize {
        self.step.matches('\n').count() + 1
    }
}

impl Patch for WorkflowPatch {
    fn kind(&self) -> PatchKind {
        PatchKind::WorkflowPermissions
    }

    fn target(&self) -> &str {
        &self.path
    }

    fn apply(&self, content: &str) -> Result<PatchResult> {
        let mut matches = 0;
        let patched = self.pattern.replace_all(content, |caps: &Captures| {
            matches += 1;
            let leading = &caps[1];
            if leading.starts_with("\r\n") {
                format!("\r\n{}{}", self.step_crlf, leading)
            } else {
                format!("\n{}{}", self.step, leading)
            }
        });

        tracing::debug!("Found {} occurrence(s) of marker '{}'", matches, self.marker);

        Ok(PatchResult {
            content: patched.into_owned(),
            matches,
        })
    }
}
