use std::io;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

use ubeer_api::auth::TokenVerifier;
use ubeer_api::config::Config;
use ubeer_api::{db, routes, AppState};

fn startup_error<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(startup_error)?;

    // Create a connection pool to the database and make sure the tables exist
    let pool = db::connect(&config.database_url, config.pool_size).map_err(startup_error)?;
    db::init_schema(&pool).map_err(startup_error)?;

    let state = web::Data::new(AppState::new(pool, TokenVerifier::new(&config.auth)));

    info!("Listening on {}", config.listen_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .configure(routes::configure)
    })
    .bind(config.listen_addr)?
    .run()
    .await
}
