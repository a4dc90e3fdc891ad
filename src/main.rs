use clap::Parser;
use repo_fixup::domain::model::to_json_report;
use repo_fixup::utils::{logger, validation::Validate};
use repo_fixup::{CliConfig, LocalStorage, PatchEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting repo-fixup");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new(config.base_dir.clone());
    let engine = PatchEngine::new_with_dry_run(storage, config.dry_run);

    let result = config.patch().and_then(|patch| engine.run(&*patch)).and_then(|outcome| {
        if config.json {
            to_json_report(&outcome)
        } else {
            Ok(format!("✅ {}", outcome.summary()))
        }
    });

    match result {
        Ok(report) => println!("{}", report),
        Err(e) => {
            tracing::error!(
                "❌ Patch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
