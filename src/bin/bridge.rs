use std::io;

use coverage_planner::{
    bridge::client::{self, BridgeSettings},
    config::Config,
    logic::planner::Planner,
};
use log::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let planner = Planner::from_config(&config).map_err(io::Error::other)?;
    let settings = BridgeSettings::from_config(&config);

    info!("Coverage bridge connecting to {}", settings.url);
    info!("   cell values from {}", config.values_url);
    client::run(settings, planner).await.map_err(io::Error::other)?;
    info!("Coverage bridge stopped");
    Ok(())
}
