//! The JSON shapes exchanged with API clients.
//!
//! Inputs and outputs are separate types: a request body never doubles as a response body.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// One ingredient line as submitted when creating or editing a recipe.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i64,
    pub amount: i64,
}

/// One ingredient line as shown inside a recipe.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// A user, as seen by whoever is asking. `is_subscribed` is always false for anonymous readers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
}

/// An author the reader subscribes to, with a preview of their recipes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthorWithRecipes {
    #[serde(flatten)]
    pub author: UserProfile,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: usize,
}

/// Body of `POST /api/recipes/`.
///
/// Missing collections deserialize as empty so that validation can report them per field
/// instead of failing the whole body.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct RecipeForCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub cooking_time: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl std::fmt::Debug for RecipeForCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeForCreate")
            .field("name", &self.name)
            .field("text", &self.text.len())
            .field("cooking_time", &self.cooking_time)
            .field("ingredients", &self.ingredients)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Body of `PATCH /api/recipes/{id}/`.
///
/// Scalar fields left out keep their stored value. Ingredients and tags are always replaced
/// wholesale, so they must be supplied.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecipeForUpdate {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// A page of results, in the page-number style: `next` and `previous` are query strings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_with_recipes_is_flat() {
        let value = serde_json::to_value(AuthorWithRecipes {
            author: UserProfile {
                email: "cook@example.com".into(),
                id: 7,
                username: "cook".into(),
                first_name: "Ada".into(),
                last_name: "Cook".into(),
                is_subscribed: true,
            },
            recipes: vec![],
            recipes_count: 0,
        })
        .unwrap();
        assert_eq!(value["username"], "cook");
        assert_eq!(value["is_subscribed"], true);
        assert_eq!(value["recipes_count"], 0);
        assert!(value.get("author").is_none());
    }

    #[test]
    fn partial_create_body_still_parses() {
        let body: RecipeForCreate = serde_json::from_str(r#"{"name": "Soup"}"#).unwrap();
        assert_eq!(body.name, "Soup");
        assert!(body.ingredients.is_empty());
        assert!(body.tags.is_empty());
        assert_eq!(body.cooking_time, 0);
    }
}
