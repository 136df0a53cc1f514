//! Recipe list filtering.
//!
//! Query parameters become an ordered list of [`RecipePredicate`]s. A recipe is listed only
//! if it passes all of them.

use std::collections::{HashMap, HashSet};

use rusqlite::params_from_iter;
use serde::Deserialize;

use crate::{
    auth::Actor,
    database::{Database, FromRow},
    errors::{WebError, WebResult},
    models::{Recipe, RecipeList, Tags},
};

/// Query parameters accepted by `GET /api/recipes/`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches if it has any of them.
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i64>,
    pub is_favorited: Option<u8>,
    pub is_in_shopping_cart: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePredicate {
    HasAnyTag(HashSet<String>),
    ByAuthor(i64),
    Favorited,
    InShoppingCart,
}

/// A recipe plus the facts about it that the predicates look at.
#[derive(Debug, Clone)]
pub struct RecipeCard {
    pub recipe: Recipe,
    pub tag_slugs: HashSet<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipePredicate {
    pub fn matches(&self, card: &RecipeCard) -> bool {
        match self {
            RecipePredicate::HasAnyTag(slugs) => !card.tag_slugs.is_disjoint(slugs),
            RecipePredicate::ByAuthor(author_id) => card.recipe.author_id == *author_id,
            RecipePredicate::Favorited => card.is_favorited,
            RecipePredicate::InShoppingCart => card.is_in_shopping_cart,
        }
    }
}

fn flag(name: &str, value: Option<u8>) -> WebResult<bool> {
    match value {
        None | Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(_) => Err(WebError::field(name, "Select either 0 or 1.")),
    }
}

impl RecipeFilter {
    /// Turn the parameters into predicates, in the order they are applied.
    ///
    /// A flag set to `0` does not filter at all.
    pub fn predicates(&self) -> WebResult<Vec<RecipePredicate>> {
        let mut predicates = vec![];
        if !self.tags.is_empty() {
            predicates.push(RecipePredicate::HasAnyTag(
                self.tags.iter().cloned().collect(),
            ));
        }
        if let Some(author_id) = self.author {
            predicates.push(RecipePredicate::ByAuthor(author_id));
        }
        if flag("is_favorited", self.is_favorited)? {
            predicates.push(RecipePredicate::Favorited);
        }
        if flag("is_in_shopping_cart", self.is_in_shopping_cart)? {
            predicates.push(RecipePredicate::InShoppingCart);
        }
        Ok(predicates)
    }

    /// Reject slugs that name no tag.
    pub fn check_tags(&self, known: &HashSet<String>) -> WebResult<()> {
        match self.tags.iter().find(|slug| !known.contains(*slug)) {
            Some(slug) => Err(WebError::field(
                "tags",
                format!("Select a valid choice. {slug} is not one of the available choices."),
            )),
            None => Ok(()),
        }
    }

    /// Keep the cards that pass every predicate, preserving their order.
    pub fn apply(&self, cards: Vec<RecipeCard>) -> WebResult<Vec<RecipeCard>> {
        let predicates = self.predicates()?;
        Ok(cards
            .into_iter()
            .filter(|card| predicates.iter().all(|p| p.matches(card)))
            .collect())
    }
}

struct TagLink {
    recipe_id: i64,
    slug: String,
}

impl FromRow for TagLink {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            recipe_id: row.get("recipe_id")?,
            slug: row.get("slug")?,
        })
    }
}

/// Load the candidate recipes (newest first) with what the predicates need to look at.
///
/// The author narrows the query itself, and only links to the requested tag slugs are read,
/// since those are all `HasAnyTag` compares against. Anonymous viewers have empty lists.
pub fn load_cards(
    db: &Database,
    viewer: Option<&Actor>,
    filter: &RecipeFilter,
) -> WebResult<Vec<RecipeCard>> {
    let mut slugs_by_recipe: HashMap<i64, HashSet<String>> = HashMap::new();
    if !filter.tags.is_empty() {
        let placeholders = vec!["?"; filter.tags.len()].join(", ");
        let links = db.collect_rows::<TagLink, _>(
            &format!(
                "SELECT RecipeTag.recipe_id, Tag.slug FROM RecipeTag
                    JOIN Tag ON Tag.tag_id = RecipeTag.tag_id
                    WHERE Tag.slug IN ({placeholders})"
            ),
            params_from_iter(&filter.tags),
        )?;
        for link in links {
            slugs_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .insert(link.slug);
        }
    }
    let (favorites, cart) = match viewer {
        Some(viewer) => (
            RecipeList::Favorite.recipe_ids(db, viewer.user_id)?,
            RecipeList::ShoppingCart.recipe_ids(db, viewer.user_id)?,
        ),
        None => Default::default(),
    };
    let recipes = match filter.author {
        Some(author_id) => Recipe::list_by_author(db, author_id)?,
        None => Recipe::list_all(db)?,
    };
    Ok(recipes
        .into_iter()
        .map(|recipe| RecipeCard {
            tag_slugs: slugs_by_recipe.remove(&recipe.recipe_id).unwrap_or_default(),
            is_favorited: favorites.contains(&recipe.recipe_id),
            is_in_shopping_cart: cart.contains(&recipe.recipe_id),
            recipe,
        })
        .collect())
}

/// The recipes `viewer` asked for, in list order.
pub fn filter_recipes(
    db: &Database,
    viewer: Option<&Actor>,
    filter: &RecipeFilter,
) -> WebResult<Vec<Recipe>> {
    if !filter.tags.is_empty() {
        filter.check_tags(&Tags::slugs(db)?)?;
    }
    Ok(filter
        .apply(load_cards(db, viewer, filter)?)?
        .into_iter()
        .map(|card| card.recipe)
        .collect())
}
