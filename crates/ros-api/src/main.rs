mod auth;
mod error;
mod handlers;
mod routes;
mod server;
mod state;
mod telemetry;
mod validation;

use ros_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_telemetry();

    let config = Config::from_env()?;

    let state = state::build_state(config.clone()).await?;
    let router = routes::build_router(state);

    server::start_server(&config, router).await?;

    Ok(())
}
