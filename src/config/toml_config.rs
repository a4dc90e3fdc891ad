use crate::core::build_fix::{
    BuildFix, DEFAULT_BUILD_PATH, DEFAULT_DUPLICATE_MARKER, DEFAULT_LINE_THRESHOLD,
    DEFAULT_PERMISSION_MARKER,
};
use crate::core::workflow_patch::{
    WorkflowPatch, DEFAULT_MARKER, DEFAULT_PERMISSION_STEP, DEFAULT_WORKFLOW_PATH,
};
use crate::core::Patch;
use crate::utils::error::{PatchError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_single_line, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixupConfig {
    pub base_dir: Option<String>,
    pub workflow: Option<WorkflowSection>,
    pub build_fix: Option<BuildFixSection>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowSection {
    pub path: Option<String>,
    pub marker: Option<String>,
    pub step: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildFixSection {
    pub path: Option<String>,
    pub line_threshold: Option<usize>,
    pub permission_marker: Option<String>,
    pub duplicate_marker: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    /// "compact" 或 "json"
    pub format: Option<String>,
}

impl WorkflowSection {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_WORKFLOW_PATH)
    }

    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    pub fn step(&self) -> &str {
        self.step.as_deref().unwrap_or(DEFAULT_PERMISSION_STEP)
    }

    pub fn to_patch(&self) -> Result<WorkflowPatch> {
        WorkflowPatch::new(self.path(), self.marker(), self.step())
    }
}

impl Validate for WorkflowSection {
    fn validate(&self) -> Result<()> {
        validate_path("workflow.path", self.path())?;
        validate_single_line("workflow.marker", self.marker())?;
        validate_non_empty_string("workflow.step", self.step())?;
        Ok(())
    }
}

impl BuildFixSection {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_BUILD_PATH)
    }

    pub fn line_threshold(&self) -> usize {
        self.line_threshold.unwrap_or(DEFAULT_LINE_THRESHOLD)
    }

    pub fn permission_marker(&self) -> &str {
        self.permission_marker
            .as_deref()
            .unwrap_or(DEFAULT_PERMISSION_MARKER)
    }

    pub fn duplicate_marker(&self) -> &str {
        self.duplicate_marker
            .as_deref()
            .unwrap_or(DEFAULT_DUPLICATE_MARKER)
    }

    pub fn to_patch(&self) -> BuildFix {
        BuildFix::new(
            self.path(),
            self.line_threshold(),
            self.permission_marker(),
            self.duplicate_marker(),
        )
    }
}

impl Validate for BuildFixSection {
    fn validate(&self) -> Result<()> {
        validate_path("build_fix.path", self.path())?;
        validate_single_line("build_fix.permission_marker", self.permission_marker())?;
        validate_single_line("build_fix.duplicate_marker", self.duplicate_marker())?;
        Ok(())
    }
}

impl FixupConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WORKSPACE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_dir(&self) -> &str {
        self.base_dir.as_deref().unwrap_or(".")
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }

    /// 依固定順序（workflow 先於 build_fix）建立要執行的 patch
    pub fn patches(&self) -> Result<Vec<Box<dyn Patch>>> {
        let mut patches: Vec<Box<dyn Patch>> = Vec::new();
        if let Some(workflow) = &self.workflow {
            patches.push(Box::new(workflow.to_patch()?));
        }
        if let Some(build_fix) = &self.build_fix {
            patches.push(Box::new(build_fix.to_patch()));
        }
        Ok(patches)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("base_dir", self.base_dir())?;

        if self.workflow.is_none() && self.build_fix.is_none() {
            return Err(PatchError::MissingConfigError {
                field: "[workflow] or [build_fix]".to_string(),
            });
        }

        if let Some(workflow) = &self.workflow {
            workflow.validate()?;
        }
        if let Some(build_fix) = &self.build_fix {
            build_fix.validate()?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format) {
                return Err(PatchError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Validate for FixupConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
