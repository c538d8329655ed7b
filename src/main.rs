use anyhow::Result;
use opentrivia_client::{logger, App, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：OPENTRIVIA_CONFIG 指定的 TOML 文件优先，环境变量覆盖
    let config = match std::env::var("OPENTRIVIA_CONFIG") {
        Ok(path) => Config::from_file(path)?.with_env_overrides(),
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logger::init(config.verbose_logging);

    let app = App::initialize(config)?;

    // Ctrl+C 取消进行中的请求
    let cancel = app.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到 Ctrl+C，正在取消...");
            cancel.cancel();
        }
    });

    let game = app.run().await?;
    info!("✓ 本局共 {} 道题", game.len());

    Ok(())
}
