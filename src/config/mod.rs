pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{Patch, Storage};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use self::cli::LocalStorage;
#[cfg(feature = "cli")]
use self::toml_config::{BuildFixSection, WorkflowSection};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "repo-fixup")]
#[command(about = "Patch CI workflows and build scripts in place")]
pub struct CliConfig {
    /// Directory that target paths are resolved against
    #[arg(long, global = true, default_value = ".")]
    pub base_dir: String,

    /// Show what would change without writing the file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print the outcome as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: PatchCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum PatchCommand {
    /// Insert the permission-fix step before every run-on-arch action
    Workflow {
        /// Workflow file to patch
        #[arg(long)]
        path: Option<String>,

        /// Line marker to insert before
        #[arg(long)]
        marker: Option<String>,

        /// File holding a replacement step block, relative to --base-dir
        #[arg(long)]
        step_file: Option<String>,
    },

    /// Drop the duplicated DEBIAN copy block and stray else from the build script
    BuildFix {
        /// Build script to fix
        #[arg(long)]
        path: Option<String>,

        /// Rules apply to lines whose 0-based index is greater than this
        #[arg(long)]
        threshold: Option<usize>,

        #[arg(long)]
        permission_marker: Option<String>,

        #[arg(long)]
        duplicate_marker: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 依子命令建立 patch；step_file 以 base_dir 為根讀入，讀入後再驗證一次
    pub fn patch(&self) -> Result<Box<dyn Patch>> {
        match &self.command {
            PatchCommand::Workflow { step_file, .. } => {
                let mut section = self.workflow_section();
                if let Some(file) = step_file {
                    section.step = Some(LocalStorage::new(&self.base_dir).read_file(file)?);
                    section.validate()?;
                }
                Ok(Box::new(section.to_patch()?))
            }
            PatchCommand::BuildFix { .. } => Ok(Box::new(self.build_fix_section().to_patch())),
        }
    }

    fn workflow_section(&self) -> WorkflowSection {
        match &self.command {
            PatchCommand::Workflow { path, marker, .. } => WorkflowSection {
                path: path.clone(),
                marker: marker.clone(),
                step: None,
            },
            PatchCommand::BuildFix { .. } => WorkflowSection::default(),
        }
    }

    fn build_fix_section(&self) -> BuildFixSection {
        match &self.command {
            PatchCommand::BuildFix {
                path,
                threshold,
                permission_marker,
                duplicate_marker,
            } => BuildFixSection {
                path: path.clone(),
                line_threshold: *threshold,
                permission_marker: permission_marker.clone(),
                duplicate_marker: duplicate_marker.clone(),
            },
            PatchCommand::Workflow { .. } => BuildFixSection::default(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("base_dir", &self.base_dir)?;
        match &self.command {
            PatchCommand::Workflow { step_file, .. } => {
                if let Some(file) = step_file {
                    validate_path("step_file", file)?;
                }
                self.workflow_section().validate()
            }
            PatchCommand::BuildFix { .. } => self.build_fix_section().validate(),
        }
    }
}
