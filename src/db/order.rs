use chrono::Utc;
use diesel::prelude::*;

use crate::error::{Error, Notice, Result};
use crate::models::{Beer, NewOrder, Order, OrderBeer};
use crate::schema::{beers, order_beers, orders};

use super::Query;

/// An order together with the beers it contains.
pub type OrderWithBeers = (Order, Vec<Beer>);

fn fetch_order(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<OrderWithBeers>> {
    let order = match orders::table.find(id).first::<Order>(conn).optional()? {
        Some(order) => order,
        None => return Ok(None),
    };

    let contents = OrderBeer::belonging_to(&order)
        .inner_join(beers::table)
        .select(beers::all_columns)
        .order(beers::id.asc())
        .load::<Beer>(conn)?;

    Ok(Some((order, contents)))
}

/*************************************/
/** List Orders query               **/
/*************************************/

#[derive(Debug, Clone)]
pub struct ListOrders;

impl Query for ListOrders {
    type Item = Vec<OrderWithBeers>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        let all = orders::table.order(orders::id.asc()).load::<Order>(conn)?;

        let contents = OrderBeer::belonging_to(&all)
            .inner_join(beers::table)
            .order(beers::id.asc())
            .load::<(OrderBeer, Beer)>(conn)?
            .grouped_by(&all);

        Ok(all
            .into_iter()
            .zip(contents)
            .map(|(order, rows)| (order, rows.into_iter().map(|(_, beer)| beer).collect()))
            .collect())
    }
}

/*************************************/
/** Get Order query                 **/
/*************************************/

#[derive(Debug, Clone)]
pub struct GetOrder {
    pub id: i32,
}

impl Query for GetOrder {
    type Item = Option<OrderWithBeers>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        Ok(fetch_order(conn, self.id)?)
    }
}

/*************************************/
/** Create Order query              **/
/*************************************/

/// Records a new order for the given beers, stamped with the current UTC time.
///
/// Every id in `beer_ids` must name an existing beer; the first one that does
/// not aborts the whole order. Repeated ids are only linked once.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_name: String,
    pub beer_ids: Vec<i32>,
}

impl Query for CreateOrder {
    type Item = OrderWithBeers;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        let mut beer_ids: Vec<i32> = Vec::with_capacity(self.beer_ids.len());
        for id in self.beer_ids {
            if !beer_ids.contains(&id) {
                beer_ids.push(id);
            }
        }

        conn.transaction::<_, Error, _>(|conn| {
            let known: Vec<i32> = beers::table
                .filter(beers::id.eq_any(&beer_ids))
                .select(beers::id)
                .load(conn)?;

            if let Some(missing) = beer_ids.iter().find(|id| !known.contains(id)) {
                return Err(Error::InvalidReference(Notice::error(format!(
                    "Beer with id {} not found",
                    missing
                ))));
            }

            let new_order = NewOrder {
                customer_name: &self.customer_name,
                created_at: Utc::now().naive_utc(),
            };

            let order: Order = diesel::insert_into(orders::table)
                .values(&new_order)
                .get_result(conn)?;

            let links: Vec<OrderBeer> = beer_ids
                .iter()
                .map(|&beer_id| OrderBeer {
                    order_id: order.id,
                    beer_id,
                })
                .collect();
            if !links.is_empty() {
                diesel::insert_into(order_beers::table)
                    .values(&links)
                    .execute(conn)?;
            }

            fetch_order(conn, order.id)?.ok_or(Error::Database(diesel::result::Error::NotFound))
        })
    }
}

/*************************************/
/** Delete Order query              **/
/*************************************/

/// Deletes the order and its beer links. Yields `false` when no order had that id.
#[derive(Debug, Clone)]
pub struct DeleteOrder {
    pub id: i32,
}

impl Query for DeleteOrder {
    type Item = bool;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            diesel::delete(order_beers::table.filter(order_beers::order_id.eq(self.id)))
                .execute(conn)?;

            let deleted = diesel::delete(orders::table.find(self.id)).execute(conn)?;

            Ok(deleted > 0)
        })
    }
}
