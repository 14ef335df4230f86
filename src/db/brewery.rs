use diesel::prelude::*;

use crate::error::{Error, Result};
use crate::models::{Beer, Brewery, BreweryFields};
use crate::schema::{beers, breweries};

use super::Query;

/// A brewery together with every beer it owns.
pub type BreweryWithBeers = (Brewery, Vec<Beer>);

fn fetch_brewery(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<BreweryWithBeers>> {
    let brewery = match breweries::table.find(id).first::<Brewery>(conn).optional()? {
        Some(brewery) => brewery,
        None => return Ok(None),
    };

    let owned = Beer::belonging_to(&brewery)
        .order(beers::id.asc())
        .load::<Beer>(conn)?;

    Ok(Some((brewery, owned)))
}

/*************************************/
/** List Breweries query            **/
/*************************************/

#[derive(Debug, Clone)]
pub struct ListBreweries;

impl Query for ListBreweries {
    type Item = Vec<BreweryWithBeers>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        let all = breweries::table
            .order(breweries::id.asc())
            .load::<Brewery>(conn)?;

        let owned = Beer::belonging_to(&all)
            .order(beers::id.asc())
            .load::<Beer>(conn)?
            .grouped_by(&all);

        Ok(all.into_iter().zip(owned).collect())
    }
}

/*************************************/
/** Get Brewery query               **/
/*************************************/

#[derive(Debug, Clone)]
pub struct GetBrewery {
    pub id: i32,
}

impl Query for GetBrewery {
    type Item = Option<BreweryWithBeers>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        Ok(fetch_brewery(conn, self.id)?)
    }
}

/*************************************/
/** Create Brewery query            **/
/*************************************/

#[derive(Debug, Clone, Default)]
pub struct CreateBrewery {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl Query for CreateBrewery {
    type Item = BreweryWithBeers;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        let new_brewery = BreweryFields {
            name: self.name.as_deref(),
            location: self.location.as_deref(),
        };

        let brewery: Brewery = diesel::insert_into(breweries::table)
            .values(&new_brewery)
            .get_result(conn)?;

        Ok((brewery, Vec::new()))
    }
}

/*************************************/
/** Update Brewery query            **/
/*************************************/

#[derive(Debug, Clone)]
pub struct UpdateBrewery {
    pub id: i32,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl Query for UpdateBrewery {
    type Item = Option<BreweryWithBeers>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            let changes = BreweryFields {
                name: self.name.as_deref(),
                location: self.location.as_deref(),
            };

            let updated = diesel::update(breweries::table.find(self.id))
                .set(&changes)
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }

            Ok(fetch_brewery(conn, self.id)?)
        })
    }
}

/*************************************/
/** Delete Brewery query            **/
/*************************************/

/// Deletes the brewery. Its beers are kept, detached from any brewery.
/// Yields `false` when no brewery had that id.
#[derive(Debug, Clone)]
pub struct DeleteBrewery {
    pub id: i32,
}

impl Query for DeleteBrewery {
    type Item = bool;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            diesel::update(beers::table.filter(beers::brewery_id.eq(self.id)))
                .set(beers::brewery_id.eq(None::<i32>))
                .execute(conn)?;

            let deleted = diesel::delete(breweries::table.find(self.id)).execute(conn)?;

            Ok(deleted > 0)
        })
    }
}
