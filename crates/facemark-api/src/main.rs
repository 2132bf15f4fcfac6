use facemark_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    facemark_api::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let (_state, router) = facemark_api::setup::initialize_app(config.clone()).await?;

    facemark_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
