use clap::Parser;
use repo_fixup::domain::model::to_json_report;
use repo_fixup::utils::{logger, validation::Validate};
use repo_fixup::{FixupConfig, LocalStorage, PatchEngine};

#[derive(Parser)]
#[command(name = "toml-fixup")]
#[command(about = "Run the repository fixups listed in a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "fixup.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Print the outcomes as a JSON array on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match FixupConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if !args.json {
        display_config_summary(&config, &args);
    }

    let engine = PatchEngine::new_with_dry_run(LocalStorage::new(config.base_dir()), args.dry_run);
    let patches = config.patches()?;
    let mut outcomes = Vec::with_capacity(patches.len());

    // 依序執行，遇到錯誤就停止
    for patch in &patches {
        match engine.run(&**patch) {
            Ok(outcome) => {
                if !args.json {
                    println!("✅ {}", outcome.summary());
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                tracing::error!(
                    "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                    patch.kind().label(),
                    e,
                    e.category(),
                    e.severity()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        }
    }

    if args.json {
        match to_json_report(&outcomes) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &FixupConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Base dir: {}", config.base_dir());

    if let Some(workflow) = &config.workflow {
        println!("  Workflow: {}", workflow.path());
        println!("    Marker: {}", workflow.marker());
        println!("    Step lines: {}", workflow.step().lines().count());
    }

    if let Some(build_fix) = &config.build_fix {
        println!("  Build script: {}", build_fix.path());
        println!("    Line threshold: {}", build_fix.line_threshold());
        println!("    Duplicate marker: {}", build_fix.duplicate_marker());
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
