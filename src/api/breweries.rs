use actix_web::{web, HttpResponse};

use crate::api::BreweryView;
use crate::db::{self, CreateBrewery, DeleteBrewery, GetBrewery, ListBreweries, UpdateBrewery};
use crate::error::{Error, Notice, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct BreweryForm {
    name: Option<String>,
    location: Option<String>,
}

fn not_found() -> Error {
    Error::NotFound(Notice::message("Brewery not found"))
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let breweries: Vec<BreweryView> = db::execute(&state.pool, ListBreweries)
        .await?
        .into_iter()
        .map(BreweryView::from)
        .collect();

    Ok(HttpResponse::Ok().json(breweries))
}

pub async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> Result<HttpResponse> {
    let id = id.into_inner();

    let brewery = db::execute(&state.pool, GetBrewery { id })
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(BreweryView::from(brewery)))
}

pub async fn create(state: web::Data<AppState>, form: web::Json<BreweryForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    let query = CreateBrewery {
        name: form.name,
        location: form.location,
    };

    let brewery = db::execute(&state.pool, query).await?;
    info!("Created brewery {}", brewery.0.id);

    Ok(HttpResponse::Created().json(BreweryView::from(brewery)))
}

pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: web::Json<BreweryForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let query = UpdateBrewery {
        id: id.into_inner(),
        name: form.name,
        location: form.location,
    };

    let brewery = db::execute(&state.pool, query).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(BreweryView::from(brewery)))
}

/// Deletes a brewery. Its beers stay in place with no brewery attached.
pub async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> Result<HttpResponse> {
    let id = id.into_inner();

    if !db::execute(&state.pool, DeleteBrewery { id }).await? {
        return Err(not_found());
    }
    info!("Deleted brewery {}", id);

    Ok(HttpResponse::Ok().json(Notice::message("Brewery deleted")))
}
