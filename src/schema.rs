diesel::table! {
    beers (id) {
        id -> Integer,
        name -> Nullable<Text>,
        style -> Nullable<Text>,
        brewery_id -> Nullable<Integer>,
    }
}

diesel::table! {
    breweries (id) {
        id -> Integer,
        name -> Nullable<Text>,
        location -> Nullable<Text>,
    }
}

diesel::table! {
    order_beers (order_id, beer_id) {
        order_id -> Integer,
        beer_id -> Integer,
    }
}

diesel::table! {
    orders (id) {
        id -> Integer,
        customer_name -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(beers -> breweries (brewery_id));
diesel::joinable!(order_beers -> beers (beer_id));
diesel::joinable!(order_beers -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(beers, breweries, order_beers, orders,);

/// DDL matching the `table!` definitions above. Safe to run on every start.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS breweries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50),
    location VARCHAR(50)
);

CREATE TABLE IF NOT EXISTS beers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50),
    style VARCHAR(50),
    brewery_id INTEGER REFERENCES breweries (id)
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_name VARCHAR(50) NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS order_beers (
    order_id INTEGER NOT NULL REFERENCES orders (id),
    beer_id INTEGER NOT NULL REFERENCES beers (id),
    PRIMARY KEY (order_id, beer_id)
);
";
