//! The shopping list: every ingredient needed for the recipes in a user's cart, summed up.

use std::collections::BTreeMap;

use rusqlite::params;
use serde::Serialize;

use crate::{
    auth::Actor,
    database::{Database, FromRow},
    errors::{WebError, WebResult},
};

pub mod render;

pub const FILENAME: &str = "shopping_list.pdf";

/// One ingredient line of one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub ingredient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl FromRow for CartLine {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            ingredient_id: row.get("ingredient_id")?,
            name: row.get("name")?,
            measurement_unit: row.get("measurement_unit")?,
            amount: row.get("amount")?,
        })
    }
}

/// The total quantity of one ingredient across the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub ingredient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

impl std::fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.name, self.total, self.measurement_unit)
    }
}

/// Sum amounts per (ingredient, unit), ordered by ingredient name and then id.
pub fn aggregate(lines: &[CartLine]) -> Vec<ShoppingItem> {
    let mut totals: BTreeMap<(&str, i64, &str), u64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((
                line.name.as_str(),
                line.ingredient_id,
                line.measurement_unit.as_str(),
            ))
            .or_default() += line.amount.max(0) as u64;
    }
    totals
        .into_iter()
        .map(|((name, ingredient_id, unit), total)| ShoppingItem {
            ingredient_id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total,
        })
        .collect()
}

/// All ingredient lines of every recipe in the user's cart.
pub fn cart_lines(db: &Database, user_id: i64) -> WebResult<Vec<CartLine>> {
    Ok(db.collect_rows(
        "SELECT Ingredient.ingredient_id, Ingredient.name, Ingredient.measurement_unit,
                RecipeIngredient.amount
            FROM ShoppingCart
            JOIN RecipeIngredient ON RecipeIngredient.recipe_id = ShoppingCart.recipe_id
            JOIN Ingredient ON Ingredient.ingredient_id = RecipeIngredient.ingredient_id
            WHERE ShoppingCart.user_id = ?",
        params![user_id],
    )?)
}

/// Build the aggregated shopping list for the actor.
///
/// Fails with [`WebError::EmptyCart`] when nothing has been put in the cart.
pub fn shopping_list(db: &Database, actor: &Actor) -> WebResult<Vec<ShoppingItem>> {
    let has_any = db.exists(
        "SELECT 1 FROM ShoppingCart WHERE user_id = ?",
        params![actor.user_id],
    )?;
    if !has_any {
        return Err(WebError::EmptyCart);
    }
    Ok(aggregate(&cart_lines(db, actor.user_id)?))
}

/// Render the actor's shopping list as a PDF document.
pub fn export_pdf(db: &Database, actor: &Actor) -> WebResult<Vec<u8>> {
    let items = shopping_list(db, actor)?;
    tracing::info!(
        user_id = actor.user_id,
        items = items.len(),
        "Exporting shopping list"
    );
    let pages = render::layout(&items)?;
    Ok(render::to_pdf(&pages)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::TestDatabase;
    use crate::models::testing::*;
    use crate::models::RecipeList;

    fn line(id: i64, name: &str, unit: &str, amount: i64) -> CartLine {
        CartLine {
            ingredient_id: id,
            name: name.into(),
            measurement_unit: unit.into(),
            amount,
        }
    }

    #[test]
    fn sums_per_ingredient_and_unit() {
        let lines = [
            line(1, "A", "g", 100),
            line(2, "B", "ml", 30),
            line(1, "A", "g", 50),
        ];
        let items = aggregate(&lines);
        assert_eq!(
            items
                .iter()
                .map(|i| (i.name.as_str(), i.measurement_unit.as_str(), i.total))
                .collect::<Vec<_>>(),
            [("A", "g", 150), ("B", "ml", 30)]
        );
    }

    #[test]
    fn same_name_different_units_stay_apart() {
        let lines = [
            line(1, "milk", "ml", 200),
            line(2, "milk", "cup", 1),
            line(1, "milk", "ml", 100),
        ];
        let items = aggregate(&lines);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].to_string(), "milk: 300 ml");
        assert_eq!(items[1].to_string(), "milk: 1 cup");
    }

    #[test]
    fn ordered_by_name() {
        let lines = [line(3, "yeast", "g", 7), line(1, "flour", "g", 500)];
        let names = aggregate(&lines)
            .into_iter()
            .map(|i| i.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["flour", "yeast"]);
    }

    #[tokio::test]
    async fn aggregates_across_cart_recipes() {
        let test = TestDatabase::new().await;
        let db = &test.db;
        let cook = user(db, "cook");
        let lunch = tag(db, "Lunch", "#00FF00", "lunch");
        let a = ingredient(db, "A", "g");
        let b = ingredient(db, "B", "ml");
        let first = recipe(db, &cook, "First", &[(a, 100), (b, 30)], &[lunch]);
        let second = recipe(db, &cook, "Second", &[(a, 50)], &[lunch]);
        // not in the cart, must not count
        recipe(db, &cook, "Third", &[(a, 1000)], &[lunch]);
        RecipeList::ShoppingCart.add(db, &cook, first).unwrap();
        RecipeList::ShoppingCart.add(db, &cook, second).unwrap();

        let items = shopping_list(db, &cook).unwrap();
        assert_eq!(
            items
                .iter()
                .map(|i| (i.name.as_str(), i.measurement_unit.as_str(), i.total))
                .collect::<Vec<_>>(),
            [("A", "g", 150), ("B", "ml", 30)]
        );
        let pdf = export_pdf(db, &cook).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn empty_cart_is_refused() {
        let test = TestDatabase::new().await;
        let cook = user(&test.db, "cook");
        assert!(matches!(
            export_pdf(&test.db, &cook),
            Err(WebError::EmptyCart)
        ));
    }
}
