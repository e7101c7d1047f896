use clap::Parser;
use order_export::config::toml_config::TomlConfig;
use order_export::core::crawler::PAGE_DELAY;
use order_export::core::csv::export_filename;
use order_export::utils::{logger, validation::Validate};
use order_export::ExportEngine;
use order_export::ExportError;
use order_export::HttpPageFetcher;
use order_export::LocalStorage;
use order_export::OrderExportPipeline;

#[derive(Parser)]
#[command(name = "toml-export")]
#[command(about = "Order export tool with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "export.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override output path from config
    #[arg(long)]
    output_path: Option<String>,

    /// Override session cookie from config
    #[arg(long)]
    cookie: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based order export tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(output_path) = args.output_path.clone() {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.load.output_path = output_path;
    }

    if let Some(cookie) = args.cookie.clone() {
        tracing::info!("🔧 Session cookie overridden from command line");
        config.source.cookie = Some(cookie);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    // 創建抓取器、存儲和管道
    let fetcher = HttpPageFetcher::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = OrderExportPipeline::new(fetcher, storage, config);

    // 創建匯出引擎並運行
    let engine = ExportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Order export completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Order export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(ExportError::NoOrdersError) => {
            // 空結果不視為失敗
            tracing::warn!("No orders found on this page.");
            println!("No orders found on this page.");
        }
        Err(e) => {
            tracing::error!("❌ Order export failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Start URL: {}", config.start_url());
    println!("  Output: {}", config.output_path());
    println!("  Request Timeout: {}s", config.timeout_seconds());
    println!(
        "  Session Cookie: {}",
        if config.source.cookie.is_some() {
            "provided"
        } else {
            "not set"
        }
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 資料來源分析
    println!("📡 Data Source Analysis:");
    println!("  Start URL: {}", config.start_url());
    println!("  Extra query parameter: disableCsd=true");
    println!("  Request timeout: {}s", config.timeout_seconds());

    // 抓取行為分析
    println!();
    println!("⚙️ Crawling Behavior:");
    println!("  Pagination: follows the next-page control, falls back to order-count paging");
    println!("  Delay between pages: {}ms", PAGE_DELAY.as_millis());

    // 輸出分析
    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!(
        "  File: {}",
        export_filename(chrono::Local::now().date_naive())
    );
    println!("  Columns: Date, Amount, Description, Order ID");

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
