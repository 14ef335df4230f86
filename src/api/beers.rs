use actix_web::{web, HttpResponse};

use crate::api::BeerView;
use crate::db::{self, CreateBeer, DeleteBeer, GetBeer, ListBeers, UpdateBeer};
use crate::error::{Error, Notice, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct BeerFilter {
    /// Only list beers whose name contains this text.
    name: Option<String>,
}

#[derive(Deserialize)]
pub struct BeerForm {
    name: Option<String>,
    style: Option<String>,
    brewery_id: Option<i32>,
}

fn not_found() -> Error {
    Error::NotFound(Notice::message("Beer not found"))
}

pub async fn list(state: web::Data<AppState>, filter: web::Query<BeerFilter>) -> Result<HttpResponse> {
    let query = ListBeers {
        name: filter.into_inner().name,
    };

    let beers: Vec<BeerView> = db::execute(&state.pool, query)
        .await?
        .into_iter()
        .map(BeerView::from)
        .collect();

    Ok(HttpResponse::Ok().json(beers))
}

pub async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> Result<HttpResponse> {
    let id = id.into_inner();

    let beer = db::execute(&state.pool, GetBeer { id })
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(BeerView::from(beer)))
}

/// Route handler for creating new beers
///
/// Expects a JSON body with the optional fields `name`, `style` and `brewery_id`.
/// A `brewery_id` that names no brewery is rejected with a 400.
pub async fn create(state: web::Data<AppState>, form: web::Json<BeerForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    let query = CreateBeer {
        name: form.name,
        style: form.style,
        brewery_id: form.brewery_id,
    };

    let beer = db::execute(&state.pool, query).await?;
    info!("Created beer {}", beer.0.id);

    Ok(HttpResponse::Created().json(BeerView::from(beer)))
}

pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: web::Json<BeerForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let query = UpdateBeer {
        id: id.into_inner(),
        name: form.name,
        style: form.style,
        brewery_id: form.brewery_id,
    };

    let beer = db::execute(&state.pool, query).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(BeerView::from(beer)))
}

pub async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> Result<HttpResponse> {
    let id = id.into_inner();

    if !db::execute(&state.pool, DeleteBeer { id }).await? {
        return Err(not_found());
    }
    info!("Deleted beer {}", id);

    Ok(HttpResponse::Ok().json(Notice::message("Beer deleted")))
}
