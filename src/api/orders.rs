use actix_web::{web, HttpResponse};

use crate::api::{Envelope, OrderList, OrderView};
use crate::auth::Claims;
use crate::db::{self, CreateOrder, DeleteOrder, GetOrder, ListOrders};
use crate::error::{Error, Notice, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct OrderForm {
    customer_name: String,
    beer_ids: Vec<i32>,
}

fn not_found(id: i32) -> Error {
    Error::NotFound(Notice::error(format!("Order with id {} not found", id)))
}

pub async fn list(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> Result<HttpResponse> {
    debug!("Listing orders for {}", claims.subject());

    let orders = db::execute(&state.pool, ListOrders)
        .await?
        .into_iter()
        .map(OrderView::from)
        .collect();

    Ok(HttpResponse::Ok().json(Envelope(OrderList(orders))))
}

pub async fn get(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    id: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    debug!("Fetching order {} for {}", id, claims.subject());

    let order = db::execute(&state.pool, GetOrder { id })
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(HttpResponse::Ok().json(Envelope(OrderView::from(order))))
}

/// Route handler for placing an order
///
/// Expects a JSON body with `customer_name` and `beer_ids`. If any of the ids
/// names no beer, nothing is stored and a 400 is returned.
pub async fn create(state: web::Data<AppState>, form: web::Json<OrderForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    let query = CreateOrder {
        customer_name: form.customer_name,
        beer_ids: form.beer_ids,
    };

    let order = db::execute(&state.pool, query).await?;
    info!("Created order {} with {} beer(s)", order.0.id, order.1.len());

    Ok(HttpResponse::Ok().json(Envelope(OrderView::from(order))))
}

pub async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> Result<HttpResponse> {
    let id = id.into_inner();

    if !db::execute(&state.pool, DeleteOrder { id }).await? {
        return Err(not_found(id));
    }
    info!("Deleted order {}", id);

    Ok(HttpResponse::Ok().json(Notice::message(format!("Order with id {} deleted", id))))
}
