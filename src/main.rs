use clap::Parser;
use menu_parser::utils::error::ErrorSeverity;
use menu_parser::utils::{logger, validation::Validate};
use menu_parser::{CliConfig, EtlEngine, LocalStorage, MenuPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting menu-parser");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let print_output = config.print_output;
    let storage = LocalStorage::new(".");
    let pipeline = MenuPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Menu parsed successfully!");
            eprintln!("Menu saved to: {}", summary.output_path);
            if !summary.skipped.is_empty() {
                eprintln!(
                    "⚠️ {} blocks could not be parsed; run with --verbose for details",
                    summary.skipped.len()
                );
            }

            if print_output {
                println!("{}", summary.document.to_json_pretty()?);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Menu parsing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
