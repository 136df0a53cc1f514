//! Cache for reference data. Tags and ingredients are only loaded in bulk from outside, so the
//! full ordered collections can be kept in memory between requests.

use anyhow::anyhow;
use quick_cache::sync::Cache;
use quick_cache::Weighter;
use std::sync::Arc;

use foodgram::basic_models::{Ingredient, Tag};

use crate::database::Database;
use crate::errors::{WebError, WebResult};
use crate::models::{Ingredients, Tags};

pub type ReferenceCache = Arc<Cache<CacheQuery, CacheValue, ValueWeighter>>;

pub fn new_cache() -> ReferenceCache {
    Arc::new(Cache::with_weighter(4, 50 << 20, ValueWeighter))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheQuery {
    Ingredients,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    Ingredients { ingredients: Arc<Vec<Ingredient>> },
    Tags { tags: Arc<Vec<Tag>> },
}

#[derive(Clone)]
pub struct ValueWeighter;

impl Weighter<CacheQuery, CacheValue> for ValueWeighter {
    fn weight(&self, _key: &CacheQuery, val: &CacheValue) -> u64 {
        // Roughly the heap size of the strings, which dominate
        match val {
            CacheValue::Ingredients { ingredients } => ingredients
                .iter()
                .map(|i| (i.name.len() + i.measurement_unit.len() + 64) as u64)
                .sum::<u64>()
                .max(1),
            CacheValue::Tags { tags } => tags
                .iter()
                .map(|t| (t.name.len() + t.slug.len() + t.color.len() + 64) as u64)
                .sum::<u64>()
                .max(1),
        }
    }
}

fn mismatched(query: CacheQuery, value: &CacheValue) -> WebError {
    let found = match value {
        CacheValue::Ingredients { .. } => "ingredients",
        CacheValue::Tags { .. } => "tags",
    };
    WebError::Internal(anyhow!("Cache entry for {:?} holds {}", query, found))
}

/// All ingredients, ordered by name, loading them on first use.
pub async fn ingredients(cache: &ReferenceCache, db: &Database) -> WebResult<Arc<Vec<Ingredient>>> {
    match cache.get_value_or_guard_async(&CacheQuery::Ingredients).await {
        Ok(CacheValue::Ingredients { ingredients }) => Ok(ingredients),
        Ok(other) => Err(mismatched(CacheQuery::Ingredients, &other)),
        Err(guard) => {
            tracing::info!("Loading ingredients into the cache");
            let ingredients = Arc::new(Ingredients::list_all(db)?);
            guard
                .insert(CacheValue::Ingredients {
                    ingredients: ingredients.clone(),
                })
                .unwrap_or_default();
            Ok(ingredients)
        }
    }
}

/// All tags, ordered by name, loading them on first use.
pub async fn tags(cache: &ReferenceCache, db: &Database) -> WebResult<Arc<Vec<Tag>>> {
    match cache.get_value_or_guard_async(&CacheQuery::Tags).await {
        Ok(CacheValue::Tags { tags }) => Ok(tags),
        Ok(other) => Err(mismatched(CacheQuery::Tags, &other)),
        Err(guard) => {
            tracing::info!("Loading tags into the cache");
            let tags = Arc::new(Tags::list_all(db)?);
            guard
                .insert(CacheValue::Tags { tags: tags.clone() })
                .unwrap_or_default();
            Ok(tags)
        }
    }
}
