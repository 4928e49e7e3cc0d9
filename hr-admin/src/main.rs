use clap::Parser;
use hr_admin::commands::{self, Cli};
use hr_admin::{AppConfig, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env, 命令行参数覆盖环境变量
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from(cli.config.clone());

    // 2. 初始化日志 (guard 必须存活到进程结束)
    let log_guard = init_logger(&config.log_level, config.log_dir.as_deref())?;
    tracing::debug!(api = %config.api_url, "hr-admin starting");

    // 3. 执行命令
    if let Err(e) = commands::run(cli, config).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}
