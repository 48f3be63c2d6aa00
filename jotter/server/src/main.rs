#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = jotter_server::config::Config::from_env()?;
    jotter_server::web::start_web_server(config).await
}
