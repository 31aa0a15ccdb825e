use anyhow::{Context, Result};

use harb_data_agent::{
    utils, BcsCaptchaClient, CdpBrowser, Config, RedisSessionStore, RequestCtx, UserDataAgent,
    UserQuery,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    utils::logging::init(&config.log_level);

    // 查询参数以 JSON 形式从命令行传入（生产环境由 HTTP 层传入）
    let raw_query = std::env::args()
        .nth(1)
        .context("用法: harb_data_agent '<UserQuery JSON>'")?;
    let query: UserQuery = serde_json::from_str(&raw_query).context("查询参数解析失败")?;

    // 组装真实依赖并运行一次请求
    let session_store = RedisSessionStore::new(&config)?;
    let browser = CdpBrowser::new(config.clone());
    let captcha_client = BcsCaptchaClient::new(&config);
    let agent = UserDataAgent::new(config, session_store, browser, captcha_client);

    let ctx = RequestCtx::with_generated_request_id(query.requester_id.to_string(), "cli");
    let reply = agent.get_user_data(&query, &ctx).await;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
