use std::io;

use actix_web::{middleware, web, App, HttpServer};
use coverage_planner::{api::routes, config::Config, logic::planner::Planner};
use log::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let planner = web::Data::new(Planner::from_config(&config).map_err(io::Error::other)?);
    let bind_addr = config.bind_addr();
    let docs = config.api_docs;

    info!("Coverage planner started at http://{bind_addr}");
    info!("   POST /plan");
    info!("   cell values from {}", config.values_url);
    if docs {
        info!("   Swagger UI → http://{bind_addr}/swagger-ui/");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(planner.clone())
            .configure(routes::configure)
            .configure(|cfg| {
                if docs {
                    routes::configure_docs(cfg);
                }
            })
    })
    .bind(bind_addr)?
    .run()
    .await
}
