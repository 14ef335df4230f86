use diesel::prelude::*;

use crate::error::{Error, Notice, Result};
use crate::models::{Beer, BeerFields, Brewery};
use crate::schema::{beers, breweries, order_beers};

use super::Query;

/// A beer together with the brewery it belongs to, if any.
pub type BeerWithBrewery = (Beer, Option<Brewery>);

pub(crate) fn fetch_beer(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<BeerWithBrewery>> {
    beers::table
        .left_join(breweries::table)
        .filter(beers::id.eq(id))
        .first::<BeerWithBrewery>(conn)
        .optional()
}

/// Fails with a 400 when `brewery_id` is set but names no brewery.
fn check_brewery(conn: &mut SqliteConnection, brewery_id: Option<i32>) -> Result<()> {
    let brewery_id = match brewery_id {
        Some(id) => id,
        None => return Ok(()),
    };

    let found = breweries::table
        .find(brewery_id)
        .select(breweries::id)
        .first::<i32>(conn)
        .optional()?;

    match found {
        Some(_) => Ok(()),
        None => Err(Error::InvalidReference(Notice::message(format!(
            "Brewery with id {} not found",
            brewery_id
        )))),
    }
}

/// A LIKE pattern matching any text that contains `text` literally.
fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{}%", escaped)
}

/*************************************/
/** List Beers query                **/
/*************************************/

#[derive(Debug, Clone, Default)]
pub struct ListBeers {
    /// Only return beers whose name contains this text.
    pub name: Option<String>,
}

impl Query for ListBeers {
    type Item = Vec<BeerWithBrewery>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        let mut query = beers::table
            .left_join(breweries::table)
            .order(beers::id.asc())
            .into_boxed();

        if let Some(name) = self.name {
            query = query.filter(beers::name.like(contains_pattern(&name)).escape('\\'));
        }

        Ok(query.load::<BeerWithBrewery>(conn)?)
    }
}

/*************************************/
/** Get Beer query                  **/
/*************************************/

#[derive(Debug, Clone)]
pub struct GetBeer {
    pub id: i32,
}

impl Query for GetBeer {
    type Item = Option<BeerWithBrewery>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        Ok(fetch_beer(conn, self.id)?)
    }
}

/*************************************/
/** Create Beer message             **/
/*************************************/

#[derive(Debug, Clone, Default)]
pub struct CreateBeer {
    pub name: Option<String>,
    pub style: Option<String>,
    pub brewery_id: Option<i32>,
}

impl Query for CreateBeer {
    type Item = BeerWithBrewery;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            check_brewery(conn, self.brewery_id)?;

            let new_beer = BeerFields {
                name: self.name.as_deref(),
                style: self.style.as_deref(),
                brewery_id: self.brewery_id,
            };

            let beer: Beer = diesel::insert_into(beers::table)
                .values(&new_beer)
                .get_result(conn)?;

            let brewery = match beer.brewery_id {
                Some(brewery_id) => breweries::table
                    .find(brewery_id)
                    .first::<Brewery>(conn)
                    .optional()?,
                None => None,
            };

            Ok((beer, brewery))
        })
    }
}

/*************************************/
/** Update Beer message             **/
/*************************************/

/// Replaces every mutable column of the beer; absent fields become null.
#[derive(Debug, Clone)]
pub struct UpdateBeer {
    pub id: i32,
    pub name: Option<String>,
    pub style: Option<String>,
    pub brewery_id: Option<i32>,
}

impl Query for UpdateBeer {
    type Item = Option<BeerWithBrewery>;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            let exists = beers::table
                .find(self.id)
                .select(beers::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }

            check_brewery(conn, self.brewery_id)?;

            let changes = BeerFields {
                name: self.name.as_deref(),
                style: self.style.as_deref(),
                brewery_id: self.brewery_id,
            };

            diesel::update(beers::table.find(self.id))
                .set(&changes)
                .execute(conn)?;

            Ok(fetch_beer(conn, self.id)?)
        })
    }
}

/*************************************/
/** Delete Beer message             **/
/*************************************/

/// Deletes the beer and drops it from every order that contained it.
/// Yields `false` when no beer had that id.
#[derive(Debug, Clone)]
pub struct DeleteBeer {
    pub id: i32,
}

impl Query for DeleteBeer {
    type Item = bool;

    fn run(self, conn: &mut SqliteConnection) -> Result<Self::Item> {
        conn.transaction::<_, Error, _>(|conn| {
            diesel::delete(order_beers::table.filter(order_beers::beer_id.eq(self.id)))
                .execute(conn)?;

            let deleted = diesel::delete(beers::table.find(self.id)).execute(conn)?;

            Ok(deleted > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, CreateBrewery};

    fn brewery(conn: &mut SqliteConnection, name: &str) -> Brewery {
        CreateBrewery {
            name: Some(name.to_string()),
            location: Some("Lille".to_string()),
        }
        .run(conn)
        .unwrap()
        .0
    }

    #[test]
    fn create_embeds_brewery() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let owner = brewery(&mut conn, "Brasserie du Pays Flamand");

        let (beer, found) = CreateBeer {
            name: Some("Anosteké".to_string()),
            style: Some("Blonde".to_string()),
            brewery_id: Some(owner.id),
        }
        .run(&mut conn)
        .unwrap();

        assert_eq!(beer.name.as_deref(), Some("Anosteké"));
        assert_eq!(found, Some(owner));
    }

    #[test]
    fn create_rejects_unknown_brewery() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();

        let result = CreateBeer {
            name: Some("Ghost".to_string()),
            style: None,
            brewery_id: Some(99),
        }
        .run(&mut conn);

        match result {
            Err(Error::InvalidReference(Notice::Message(text))) => {
                assert_eq!(text, "Brewery with id 99 not found")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ListBeers::default().run(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn create_without_brewery_stores_nulls() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();

        let (beer, found) = CreateBeer::default().run(&mut conn).unwrap();

        assert_eq!(beer.name, None);
        assert_eq!(beer.brewery_id, None);
        assert_eq!(found, None);
    }

    #[test]
    fn list_filters_by_name() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let owner = brewery(&mut conn, "Cantillon");

        for name in &["Gueuze", "Kriek", "Rosé de Gambrinus"] {
            CreateBeer {
                name: Some(name.to_string()),
                style: Some("Lambic".to_string()),
                brewery_id: Some(owner.id),
            }
            .run(&mut conn)
            .unwrap();
        }

        let all = ListBeers::default().run(&mut conn).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|(_, b)| b.as_ref() == Some(&owner)));

        let filtered = ListBeers {
            name: Some("rie".to_string()),
        }
        .run(&mut conn)
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0.name.as_deref(), Some("Kriek"));

        for wildcard in &["%", "_", "\\"] {
            let matched = ListBeers {
                name: Some(wildcard.to_string()),
            }
            .run(&mut conn)
            .unwrap();
            assert!(matched.is_empty(), "{:?} matched {} beers", wildcard, matched.len());
        }

        CreateBeer {
            name: Some("100% Brett_Blend".to_string()),
            style: None,
            brewery_id: None,
        }
        .run(&mut conn)
        .unwrap();

        let literal = ListBeers {
            name: Some("0% Brett_".to_string()),
        }
        .run(&mut conn)
        .unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].0.name.as_deref(), Some("100% Brett_Blend"));
    }

    #[test]
    fn update_replaces_all_fields() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let owner = brewery(&mut conn, "Orval");
        let (beer, _) = CreateBeer {
            name: Some("Orval".to_string()),
            style: Some("Trappist".to_string()),
            brewery_id: Some(owner.id),
        }
        .run(&mut conn)
        .unwrap();

        let (updated, found) = UpdateBeer {
            id: beer.id,
            name: Some("Petite Orval".to_string()),
            style: None,
            brewery_id: None,
        }
        .run(&mut conn)
        .unwrap()
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Petite Orval"));
        assert_eq!(updated.style, None);
        assert_eq!(found, None);
    }

    #[test]
    fn update_missing_beer_yields_none() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();

        let result = UpdateBeer {
            id: 7,
            name: None,
            style: None,
            brewery_id: Some(12),
        }
        .run(&mut conn)
        .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn delete_reports_absence() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let (beer, _) = CreateBeer::default().run(&mut conn).unwrap();

        assert!(DeleteBeer { id: beer.id }.run(&mut conn).unwrap());
        assert!(!DeleteBeer { id: beer.id }.run(&mut conn).unwrap());
        assert!(GetBeer { id: beer.id }.run(&mut conn).unwrap().is_none());
    }
}
