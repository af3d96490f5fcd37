use anyhow::Context;
use clap::Parser;
use facility_grid::core::ConfigProvider;
use facility_grid::utils::{logger, validation::Validate};
use facility_grid::{CliConfig, EtlEngine, EtlError, FacilityPipeline, LocalStorage, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, args.log_format);

    tracing::info!("Starting facility-grid");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match args.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            tracing::info!("Pipeline: {}", config.pipeline_name());
            let monitor = args.monitor || config.monitoring_enabled();
            run(config, monitor, args.dry_run).await
        }
        None => {
            let monitor = args.monitor;
            let dry_run = args.dry_run;
            run(args, monitor, dry_run).await
        }
    };

    match result {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Facility grid build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

async fn run<C>(
    config: C,
    monitor: bool,
    dry_run: bool,
) -> Result<facility_grid::RunSummary, EtlError>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;
    tracing::debug!(
        "Input: {}, output: {}, cell size: {}°",
        config.input_file(),
        config.output_path(),
        config.cell_size_deg()
    );

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 本機檔案，相對路徑以工作目錄為準
    let storage = LocalStorage::new(".");
    let pipeline = FacilityPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        engine.dry_run().await
    } else {
        engine.run().await
    }
}
