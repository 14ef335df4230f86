use actix_web::web;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};

use super::error::Result;
use super::schema;

mod beer;
mod brewery;
mod order;

pub use self::beer::{CreateBeer, DeleteBeer, GetBeer, ListBeers, UpdateBeer};
pub use self::brewery::{CreateBrewery, DeleteBrewery, GetBrewery, ListBreweries, UpdateBrewery};
pub use self::order::{CreateOrder, DeleteOrder, GetOrder, ListOrders};

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// A database operation that runs synchronously on a checked-out connection.
pub trait Query: Send + 'static {
    type Item: Send + 'static;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item>;
}

/// Run `query` on the blocking thread pool so the async workers never wait on SQLite.
pub async fn execute<T: Query>(pool: &Pool, query: T) -> Result<T::Item> {
    let pool = pool.clone();

    web::block(move || {
        let mut conn = pool.get()?;
        query.run(&mut conn)
    })
    .await?
}

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

/// Build a connection pool for the SQLite database at `database_url`.
///
/// An in-memory database (`:memory:`) only lives as long as its connection, so
/// callers using one should pass a `max_size` of 1.
pub fn connect(database_url: &str, max_size: u32) -> Result<Pool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    Ok(r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?)
}

/// Create every table if it does not exist yet.
pub fn init_schema(pool: &Pool) -> Result<()> {
    let mut conn = pool.get()?;
    conn.batch_execute(schema::CREATE_TABLES)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn memory_pool() -> Pool {
    let pool = connect(":memory:", 1).expect("in-memory pool");
    init_schema(&pool).expect("schema");
    pool
}
