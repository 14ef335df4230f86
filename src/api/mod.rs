//! JSON views of the stored records and the request handlers that return them.

use chrono::NaiveDateTime;

use crate::models::{Beer, Brewery, Order};

pub mod beers;
pub mod breweries;
pub mod envelope;
pub mod orders;

pub use self::envelope::Envelope;

/// Brewery as embedded in a beer.
#[derive(Debug, Serialize)]
pub struct BreweryRef {
    pub id: i32,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl From<Brewery> for BreweryRef {
    fn from(brewery: Brewery) -> BreweryRef {
        BreweryRef {
            id: brewery.id,
            name: brewery.name,
            location: brewery.location,
        }
    }
}

/// Beer as embedded in a brewery or an order.
#[derive(Debug, Serialize)]
pub struct BeerSummary {
    pub id: i32,
    pub name: Option<String>,
    pub style: Option<String>,
}

impl From<Beer> for BeerSummary {
    fn from(beer: Beer) -> BeerSummary {
        BeerSummary {
            id: beer.id,
            name: beer.name,
            style: beer.style,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BeerView {
    pub id: i32,
    pub name: Option<String>,
    pub style: Option<String>,
    pub brewery: Option<BreweryRef>,
}

impl From<(Beer, Option<Brewery>)> for BeerView {
    fn from((beer, brewery): (Beer, Option<Brewery>)) -> BeerView {
        BeerView {
            id: beer.id,
            name: beer.name,
            style: beer.style,
            brewery: brewery.map(BreweryRef::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreweryView {
    pub id: i32,
    pub name: Option<String>,
    pub location: Option<String>,
    pub beers: Vec<BeerSummary>,
}

impl From<(Brewery, Vec<Beer>)> for BreweryView {
    fn from((brewery, beers): (Brewery, Vec<Beer>)) -> BreweryView {
        BreweryView {
            id: brewery.id,
            name: brewery.name,
            location: brewery.location,
            beers: beers.into_iter().map(BeerSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "order")]
pub struct OrderView {
    pub id: i32,
    pub customer_name: String,
    #[serde(rename = "date")]
    pub created_at: NaiveDateTime,
    pub beers: Vec<BeerSummary>,
}

impl From<(Order, Vec<Beer>)> for OrderView {
    fn from((order, beers): (Order, Vec<Beer>)) -> OrderView {
        OrderView {
            id: order.id,
            customer_name: order.customer_name,
            created_at: order.created_at,
            beers: beers.into_iter().map(BeerSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "orders")]
pub struct OrderList(pub Vec<OrderView>);
