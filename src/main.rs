use anyhow::Result;
use paper_vista::config::Config;
use paper_vista::logger;
use paper_vista::server::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行服务
    App::initialize(config).await?.run().await?;

    Ok(())
}
