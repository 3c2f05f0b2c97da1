use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CatalogError, CatalogResult};

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub birthdate: Option<Date>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub pictures: Vec<String>,
    /// Sorted by actor id; only membership is meaningful.
    pub cast: Vec<Actor>,
}

impl Movie {
    pub fn cast_ids(&self) -> Vec<i32> {
        self.cast.iter().map(|a| a.id).collect()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewMovie {
    #[serde(alias = "imdbID")]
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pictures: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub cast: Vec<i32>,
}

/// Full replacement of a movie's mutable fields.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieUpdate {
    pub title: String,
    pub release_year: i32,
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pictures: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub cast: Vec<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActorInput {
    pub name: String,
    pub birthdate: Option<Date>,
}

/// An explicit JSON `null` list reads the same as an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewMovie {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut errors = Vec::new();
        require(&mut errors, "id", &self.id);
        require(&mut errors, "title", &self.title);
        require(&mut errors, "description", &self.description);
        finish(errors)
    }

    pub(crate) fn into_parts(self) -> (String, MovieUpdate) {
        let NewMovie { id, title, release_year, description, pictures, cast } = self;
        (id, MovieUpdate { title, release_year, description, pictures, cast })
    }
}

impl MovieUpdate {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "description", &self.description);
        finish(errors)
    }
}

impl ActorInput {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        finish(errors)
    }
}

fn require(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} cannot be blank"));
    }
}

fn finish(errors: Vec<String>) -> CatalogResult<()> {
    if errors.is_empty() { Ok(()) } else { Err(CatalogError::ValidationFailed(errors)) }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// A validated 1-based page request with the size already clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Row offset of the first item, or `None` when the page lies beyond any
    /// offset the store can address.
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1).checked_mul(self.size).filter(|&offset| offset <= i64::MAX as u64)
    }
}

impl PageParams {
    /// `Ok(None)` means "no pagination requested".
    pub fn resolve(&self) -> CatalogResult<Option<PageRequest>> {
        match (self.page, self.size) {
            (None, None) => Ok(None),
            (Some(page), Some(size)) => {
                if page < 1 || size < 1 {
                    return Err(CatalogError::InvalidArgument(
                        "page and size parameters must be positive integers".to_string(),
                    ));
                }
                Ok(Some(PageRequest {
                    page: page as u64,
                    size: (size as u64).min(MAX_PAGE_SIZE),
                }))
            },
            _ => Err(CatalogError::InvalidArgument(
                "both page and size parameters must be provided together".to_string(),
            )),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            current_page: request.page,
            page_size: request.size,
            total_items,
            total_pages: total_items.div_ceil(request.size),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum MovieListing {
    All(Vec<Movie>),
    Paged(Page<Movie>),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl MovieQuery {
    pub fn is_unfiltered(&self) -> bool {
        self.title.is_none() && self.year.is_none()
    }
}
