use actix_web::middleware::from_fn;
use actix_web::web;

use crate::api::{beers, breweries, orders};
use crate::auth::require_token;
use crate::error::Error;

/// Register every resource of the service.
///
/// Guards are attached per route with `Route::wrap` and run before the handler;
/// only the order reads require a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| Error::BadRequest(err.to_string()).into());

    cfg.app_data(json)
        .service(
            web::resource("/beers")
                .route(web::get().to(beers::list))
                .route(web::post().to(beers::create)),
        )
        .service(
            web::resource("/beers/{id}")
                .route(web::get().to(beers::get))
                .route(web::put().to(beers::update))
                .route(web::delete().to(beers::delete)),
        )
        .service(
            web::resource("/breweries")
                .route(web::get().to(breweries::list))
                .route(web::post().to(breweries::create)),
        )
        .service(
            web::resource("/breweries/{id}")
                .route(web::get().to(breweries::get))
                .route(web::put().to(breweries::update))
                .route(web::delete().to(breweries::delete)),
        )
        .service(
            web::resource("/orders")
                .route(web::get().to(orders::list).wrap(from_fn(require_token)))
                .route(web::post().to(orders::create)),
        )
        .service(
            web::resource("/orders/{id}")
                .route(web::get().to(orders::get).wrap(from_fn(require_token)))
                .route(web::delete().to(orders::delete)),
        );
}
