use clap::Parser;
use order_export::utils::{logger, validation::Validate};
use order_export::{
    CliConfig, ExportEngine, ExportError, HttpPageFetcher, LocalStorage, OrderExportPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting order-export CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 創建抓取器、存儲和管道
    let fetcher = HttpPageFetcher::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path.clone());
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
