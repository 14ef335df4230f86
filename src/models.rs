use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::*;

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
#[diesel(table_name = breweries)]
pub struct Brewery {
    pub id: i32,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Mutable columns of a brewery, used both for inserts and full replacement.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = breweries, treat_none_as_null = true)]
pub struct BreweryFields<'a> {
    pub name: Option<&'a str>,
    pub location: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(Brewery))]
#[diesel(table_name = beers)]
pub struct Beer {
    pub id: i32,
    pub name: Option<String>,
    pub style: Option<String>,
    pub brewery_id: Option<i32>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = beers, treat_none_as_null = true)]
pub struct BeerFields<'a> {
    pub name: Option<&'a str>,
    pub style: Option<&'a str>,
    pub brewery_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
#[diesel(table_name = orders)]
pub struct Order {
    pub id: i32,
    pub customer_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder<'a> {
    pub customer_name: &'a str,
    pub created_at: NaiveDateTime,
}

/// Row of the order/beer join table.
#[derive(Debug, Clone, Copy, PartialEq, Queryable, Identifiable, Associations, Insertable)]
#[diesel(belongs_to(Order))]
#[diesel(belongs_to(Beer))]
#[diesel(table_name = order_beers, primary_key(order_id, beer_id))]
pub struct OrderBeer {
    pub order_id: i32,
    pub beer_id: i32,
}
