use std::collections::HashSet;

use crate::auth::Actor;
use crate::database::{collect_rows, Database, FromRow};
use crate::errors::{FieldErrors, WebError, WebResult};
use anyhow::Result;
use foodgram::basic_models::{
    self, AuthorWithRecipes, IngredientAmount, RecipeDetail, RecipeForCreate, RecipeForUpdate,
    RecipeIngredient, RecipeShort, UserProfile,
};
use itertools::Itertools;
use rusqlite::params;
use strum::IntoStaticStr;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_COOKING_TIME: i64 = 32_767;

pub fn sqlite_current_timestamp() -> String {
    // Sub-second precision keeps "newest first" stable for recipes created in a burst
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl FromRow for User {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            email: row.get("email")?,
            username: row.get("username")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            is_staff: row.get("is_staff")?,
        })
    }
}

impl User {
    pub fn get_by_id(db: &Database, user_id: i64) -> Result<Option<User>> {
        db.first_row("SELECT * FROM User WHERE user_id = ?", params![user_id])
    }

    pub fn list_all(db: &Database) -> Result<Vec<User>> {
        db.collect_rows("SELECT * FROM User ORDER BY user_id", params![])
    }

    /// Add a user together with their API token.
    pub fn push(db: &Database, user: &User, token: &str) -> Result<i64> {
        let mut conn = db.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO User (email, username, first_name, last_name, is_staff)
            VALUES (?, ?, ?, ?, ?)",
            params![
                user.email,
                user.username,
                user.first_name,
                user.last_name,
                user.is_staff
            ],
        )?;
        let user_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO AuthToken (token, user_id) VALUES (?, ?)",
            params![token, user_id],
        )?;
        tx.commit()?;
        Ok(user_id)
    }

    /// This user as seen by `viewer`.
    pub fn profile(&self, db: &Database, viewer: Option<&Actor>) -> Result<UserProfile> {
        let is_subscribed = match viewer {
            Some(viewer) => Subscription::exists(db, viewer.user_id, self.user_id)?,
            None => false,
        };
        Ok(UserProfile {
            email: self.email.clone(),
            id: self.user_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_subscribed,
        })
    }
}

impl FromRow for basic_models::Tag {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("tag_id")?,
            name: row.get("name")?,
            color: row.get("color")?,
            slug: row.get("slug")?,
        })
    }
}

lazy_static::lazy_static! {
    static ref HEX_COLOR: regex::Regex = regex::Regex::new("^#[0-9A-Fa-f]{6}$").unwrap();
}

pub struct Tags;

impl Tags {
    pub fn list_all(db: &Database) -> Result<Vec<basic_models::Tag>> {
        db.collect_rows("SELECT * FROM Tag ORDER BY name", params![])
    }

    pub fn get_by_id(db: &Database, tag_id: i64) -> Result<Option<basic_models::Tag>> {
        db.first_row("SELECT * FROM Tag WHERE tag_id = ?", params![tag_id])
    }

    /// Every slug that exists, for validating filter input.
    pub fn slugs(db: &Database) -> Result<HashSet<String>> {
        Ok(Self::list_all(db)?.into_iter().map(|t| t.slug).collect())
    }

    /// Add a tag. Colors must be `#RRGGBB` hex codes.
    pub fn push(db: &Database, name: &str, color: &str, slug: &str) -> WebResult<i64> {
        if !HEX_COLOR.is_match(color) {
            return Err(WebError::field("color", "Enter a #RRGGBB hex color."));
        }
        let conn = db.pool.get()?;
        conn.execute(
            "INSERT INTO Tag (name, color, slug) VALUES (?, ?, ?)",
            params![name, color.to_uppercase(), slug],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

impl FromRow for basic_models::Ingredient {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("ingredient_id")?,
            name: row.get("name")?,
            measurement_unit: row.get("measurement_unit")?,
        })
    }
}

pub struct Ingredients;

impl Ingredients {
    /// The whole ingredient collection, in its natural (name) order.
    pub fn list_all(db: &Database) -> Result<Vec<basic_models::Ingredient>> {
        db.collect_rows(
            "SELECT * FROM Ingredient ORDER BY name, ingredient_id",
            params![],
        )
    }

    pub fn get_by_id(db: &Database, ingredient_id: i64) -> Result<Option<basic_models::Ingredient>> {
        db.first_row(
            "SELECT * FROM Ingredient WHERE ingredient_id = ?",
            params![ingredient_id],
        )
    }

    pub fn push(db: &Database, name: &str, measurement_unit: &str) -> Result<i64> {
        let conn = db.pool.get()?;
        conn.execute(
            "INSERT INTO Ingredient (name, measurement_unit) VALUES (?, ?)",
            params![name, measurement_unit],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub recipe_id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i64,
    pub created_on: String,
}

impl FromRow for Recipe {
    /// Create a new recipe from an sql row, provided by rusqlite, using named columns.
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            recipe_id: row.get("recipe_id")?,
            author_id: row.get("author_id")?,
            name: row.get("name")?,
            text: row.get("text")?,
            image: row.get("image")?,
            cooking_time: row.get("cooking_time")?,
            created_on: row.get("created_on")?,
        })
    }
}

impl FromRow for RecipeIngredient {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("ingredient_id")?,
            name: row.get("name")?,
            measurement_unit: row.get("measurement_unit")?,
            amount: row.get("amount")?,
        })
    }
}

/// Fields shared by recipe creation and update, after defaults have been filled in.
struct RecipeFields<'a> {
    name: &'a str,
    text: &'a str,
    cooking_time: i64,
    image: Option<&'a str>,
    ingredients: &'a [IngredientAmount],
    tags: &'a [i64],
}

impl Recipe {
    /// All recipes, newest first.
    pub fn list_all(db: &Database) -> Result<Vec<Recipe>> {
        db.collect_rows(
            "SELECT * FROM Recipe ORDER BY created_on DESC, recipe_id DESC",
            params![],
        )
    }

    /// Recipes written by one author, newest first.
    pub fn list_by_author(db: &Database, author_id: i64) -> Result<Vec<Recipe>> {
        db.collect_rows(
            "SELECT * FROM Recipe WHERE author_id = ? ORDER BY created_on DESC, recipe_id DESC",
            params![author_id],
        )
    }

    /// Get a recipe by ID
    pub fn get_by_id(db: &Database, recipe_id: i64) -> Result<Option<Self>> {
        db.first_row(
            "SELECT * FROM Recipe WHERE recipe_id = ?",
            params![recipe_id],
        )
    }

    /// Get a recipe by ID, or a 404.
    pub fn require(db: &Database, recipe_id: i64) -> WebResult<Self> {
        Self::get_by_id(db, recipe_id)?.ok_or(WebError::NotFound)
    }

    /// List all the tags for a recipe
    pub fn get_tags(&self, db: &Database) -> Result<Vec<basic_models::Tag>> {
        db.collect_rows(
            "SELECT Tag.* FROM Tag
                JOIN RecipeTag ON RecipeTag.tag_id = Tag.tag_id
                WHERE RecipeTag.recipe_id = ?
                ORDER BY Tag.name",
            params![self.recipe_id],
        )
    }

    /// List the ingredient lines of a recipe
    pub fn get_ingredients(&self, db: &Database) -> Result<Vec<RecipeIngredient>> {
        db.collect_rows(
            "SELECT Ingredient.ingredient_id, Ingredient.name, Ingredient.measurement_unit,
                    RecipeIngredient.amount
                FROM RecipeIngredient
                JOIN Ingredient ON Ingredient.ingredient_id = RecipeIngredient.ingredient_id
                WHERE RecipeIngredient.recipe_id = ?
                ORDER BY Ingredient.name",
            params![self.recipe_id],
        )
    }

    pub fn short(&self) -> RecipeShort {
        RecipeShort {
            id: self.recipe_id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }

    /// Get all the details about a recipe, as seen by `viewer`.
    pub fn detail(&self, db: &Database, viewer: Option<&Actor>) -> WebResult<RecipeDetail> {
        let author = User::get_by_id(db, self.author_id)?.ok_or(WebError::NotFound)?;
        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                RecipeList::Favorite.contains(db, viewer.user_id, self.recipe_id)?,
                RecipeList::ShoppingCart.contains(db, viewer.user_id, self.recipe_id)?,
            ),
            None => (false, false),
        };
        Ok(RecipeDetail {
            id: self.recipe_id,
            tags: self.get_tags(db)?,
            author: author.profile(db, viewer)?,
            ingredients: self.get_ingredients(db)?,
            is_favorited,
            is_in_shopping_cart,
            name: self.name.clone(),
            image: self.image.clone(),
            text: self.text.clone(),
            cooking_time: self.cooking_time,
        })
    }

    /// Add a new recipe written by `actor`, with its ingredient lines and tags, atomically.
    pub fn create(db: &Database, actor: &Actor, upload: RecipeForCreate) -> WebResult<Recipe> {
        let fields = RecipeFields {
            name: upload.name.trim(),
            text: &upload.text,
            cooking_time: upload.cooking_time,
            image: upload.image.as_deref(),
            ingredients: &upload.ingredients,
            tags: &upload.tags,
        };
        validate(db, actor.user_id, None, &fields)?;

        let mut conn = db.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO Recipe (author_id, name, text, image, cooking_time, created_on)
            VALUES (?, ?, ?, ?, ?, ?)",
            params![
                actor.user_id,
                fields.name,
                fields.text,
                fields.image,
                fields.cooking_time,
                sqlite_current_timestamp()
            ],
        )
        .map_err(name_conflict)?;
        let recipe_id = tx.last_insert_rowid();
        write_lines(&tx, recipe_id, fields.ingredients, fields.tags)?;
        let recipe = collect_rows(
            &tx,
            "SELECT * FROM Recipe WHERE recipe_id = ?",
            params![recipe_id],
        )?
        .pop()
        .ok_or(WebError::NotFound)?;
        tx.commit()?;
        tracing::info!(recipe_id, author_id = actor.user_id, "Created recipe");
        Ok(recipe)
    }

    /// Edit a recipe. Scalar fields that are left out keep their value; ingredient lines and
    /// tags are replaced in the same transaction.
    pub fn update(
        db: &Database,
        actor: &Actor,
        recipe_id: i64,
        upload: RecipeForUpdate,
    ) -> WebResult<Recipe> {
        let current = Self::require(db, recipe_id)?;
        if !actor.can_modify(current.author_id) {
            return Err(WebError::Forbidden);
        }
        let name = upload.name.as_deref().map(str::trim).unwrap_or(&current.name);
        let fields = RecipeFields {
            name,
            text: upload.text.as_deref().unwrap_or(&current.text),
            cooking_time: upload.cooking_time.unwrap_or(current.cooking_time),
            image: upload.image.as_deref().or(current.image.as_deref()),
            ingredients: &upload.ingredients,
            tags: &upload.tags,
        };
        validate(db, current.author_id, Some(recipe_id), &fields)?;

        let mut conn = db.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE Recipe SET name = ?, text = ?, image = ?, cooking_time = ?
            WHERE recipe_id = ?",
            params![
                fields.name,
                fields.text,
                fields.image,
                fields.cooking_time,
                recipe_id
            ],
        )
        .map_err(name_conflict)?;
        tx.execute(
            "DELETE FROM RecipeIngredient WHERE recipe_id = ?",
            params![recipe_id],
        )?;
        tx.execute("DELETE FROM RecipeTag WHERE recipe_id = ?", params![recipe_id])?;
        write_lines(&tx, recipe_id, fields.ingredients, fields.tags)?;
        tx.commit()?;
        tracing::info!(recipe_id, actor = actor.user_id, "Updated recipe");
        Self::require(db, recipe_id)
    }

    /// Delete a recipe. Its lines, tags and list entries go with it.
    pub fn delete(db: &Database, actor: &Actor, recipe_id: i64) -> WebResult<()> {
        let current = Self::require(db, recipe_id)?;
        if !actor.can_modify(current.author_id) {
            return Err(WebError::Forbidden);
        }
        let conn = db.pool.get()?;
        conn.execute("DELETE FROM Recipe WHERE recipe_id = ?", params![recipe_id])?;
        tracing::info!(recipe_id, actor = actor.user_id, "Deleted recipe");
        Ok(())
    }
}

const DUPLICATE_NAME: &str = "You already have a recipe with this name.";

/// `UNIQUE (name, author_id)` can still fire when two writes with the same name race past
/// [`validate`]; report it the same way validation does.
fn name_conflict(err: rusqlite::Error) -> WebError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            WebError::field("name", DUPLICATE_NAME)
        }
        _ => err.into(),
    }
}

/// Insert the ingredient lines and tag links of a recipe.
fn write_lines(
    conn: &rusqlite::Connection,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
    tags: &[i64],
) -> WebResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO RecipeIngredient (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
    )?;
    for line in ingredients {
        stmt.execute(params![recipe_id, line.id, line.amount])?;
    }
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO RecipeTag (recipe_id, tag_id) VALUES (?, ?)")?;
    for tag_id in tags {
        stmt.execute(params![recipe_id, tag_id])?;
    }
    Ok(())
}

/// Check recipe input, collecting every problem per field before failing.
fn validate(
    db: &Database,
    author_id: i64,
    recipe_id: Option<i64>,
    fields: &RecipeFields,
) -> WebResult<()> {
    let mut errors = FieldErrors::new();
    let mut report = |field: &str, message: String| {
        errors.entry(field.into()).or_default().push(message);
    };

    if fields.name.is_empty() {
        report("name", "This field is required.".into());
    } else if fields.name.chars().count() > MAX_NAME_LENGTH {
        report(
            "name",
            format!("Ensure this field has no more than {MAX_NAME_LENGTH} characters."),
        );
    } else if db.exists(
        "SELECT 1 FROM Recipe WHERE name = ? AND author_id = ? AND recipe_id IS NOT ?",
        params![fields.name, author_id, recipe_id],
    )? {
        report("name", DUPLICATE_NAME.into());
    }
    if fields.text.trim().is_empty() {
        report("text", "This field is required.".into());
    }
    if fields.cooking_time < 1 {
        report("cooking_time", "Cooking time must be at least 1.".into());
    } else if fields.cooking_time > MAX_COOKING_TIME {
        report(
            "cooking_time",
            format!("Ensure this value is less than or equal to {MAX_COOKING_TIME}."),
        );
    }

    if fields.ingredients.is_empty() {
        report("ingredients", "This field is required.".into());
    }
    if fields.ingredients.iter().map(|i| i.id).duplicates().next().is_some() {
        report("ingredients", "Ingredients must not repeat.".into());
    }
    for line in fields.ingredients {
        if line.amount < 1 {
            report("ingredients", format!("Amount of ingredient {} must be at least 1.", line.id));
        }
        if !db.exists(
            "SELECT 1 FROM Ingredient WHERE ingredient_id = ?",
            params![line.id],
        )? {
            report("ingredients", format!("Ingredient {} does not exist.", line.id));
        }
    }

    if fields.tags.is_empty() {
        report("tags", "This field is required.".into());
    }
    for tag_id in fields.tags.iter().unique() {
        if !db.exists("SELECT 1 FROM Tag WHERE tag_id = ?", params![tag_id])? {
            report("tags", format!("Tag {} does not exist.", tag_id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(WebError::Validation(errors))
    }
}

/// The per-user recipe lists. Both are plain (user, recipe) pairs, so they share one
/// implementation and differ only in their table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum RecipeList {
    #[strum(serialize = "Favorite")]
    Favorite,
    #[strum(serialize = "ShoppingCart")]
    ShoppingCart,
}

impl RecipeList {
    fn table(self) -> &'static str {
        self.into()
    }

    fn already_there(self) -> &'static str {
        match self {
            RecipeList::Favorite => "Recipe is already in favorites",
            RecipeList::ShoppingCart => "Recipe is already in the shopping cart",
        }
    }

    fn not_there(self) -> &'static str {
        match self {
            RecipeList::Favorite => "Recipe is not in favorites",
            RecipeList::ShoppingCart => "Recipe is not in the shopping cart",
        }
    }

    pub fn contains(self, db: &Database, user_id: i64, recipe_id: i64) -> Result<bool> {
        db.exists(
            &format!(
                "SELECT 1 FROM {} WHERE user_id = ? AND recipe_id = ?",
                self.table()
            ),
            params![user_id, recipe_id],
        )
    }

    /// Every recipe in this list for one user.
    pub fn recipe_ids(self, db: &Database, user_id: i64) -> Result<HashSet<i64>> {
        let conn = db.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT recipe_id FROM {} WHERE user_id = ?",
            self.table()
        ))?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(ids)
    }

    /// Put a recipe on the actor's list. Adding it twice is a [`WebError::DuplicateEntry`].
    pub fn add(self, db: &Database, actor: &Actor, recipe_id: i64) -> WebResult<Recipe> {
        let recipe = Recipe::require(db, recipe_id)?;
        let conn = db.pool.get()?;
        let inserted = conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (user_id, recipe_id) VALUES (?, ?)",
                self.table()
            ),
            params![actor.user_id, recipe_id],
        )?;
        if inserted == 0 {
            return Err(WebError::DuplicateEntry(self.already_there()));
        }
        Ok(recipe)
    }

    /// Take a recipe off the actor's list. Removing one that is not there is a
    /// [`WebError::NotFoundEntry`].
    pub fn remove(self, db: &Database, actor: &Actor, recipe_id: i64) -> WebResult<()> {
        Recipe::require(db, recipe_id)?;
        let conn = db.pool.get()?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
                self.table()
            ),
            params![actor.user_id, recipe_id],
        )?;
        if deleted == 0 {
            return Err(WebError::NotFoundEntry(self.not_there()));
        }
        Ok(())
    }
}

pub struct Subscription;

impl Subscription {
    pub fn exists(db: &Database, user_id: i64, author_id: i64) -> Result<bool> {
        db.exists(
            "SELECT 1 FROM Subscription WHERE user_id = ? AND author_id = ?",
            params![user_id, author_id],
        )
    }

    fn require_author(db: &Database, author_id: i64) -> WebResult<User> {
        User::get_by_id(db, author_id)?.ok_or(WebError::NotFound)
    }

    /// Subscribe the actor to an author.
    pub fn subscribe(db: &Database, actor: &Actor, author_id: i64) -> WebResult<User> {
        let author = Self::require_author(db, author_id)?;
        if author_id == actor.user_id {
            return Err(WebError::SelfReference("You cannot subscribe to yourself"));
        }
        let conn = db.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO Subscription (user_id, author_id) VALUES (?, ?)",
            params![actor.user_id, author_id],
        )?;
        if inserted == 0 {
            return Err(WebError::DuplicateEntry(
                "You are already subscribed to this author",
            ));
        }
        Ok(author)
    }

    pub fn unsubscribe(db: &Database, actor: &Actor, author_id: i64) -> WebResult<()> {
        Self::require_author(db, author_id)?;
        if author_id == actor.user_id {
            return Err(WebError::SelfReference("You cannot unsubscribe from yourself"));
        }
        let conn = db.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM Subscription WHERE user_id = ? AND author_id = ?",
            params![actor.user_id, author_id],
        )?;
        if deleted == 0 {
            return Err(WebError::NotFoundEntry(
                "You are not subscribed to this author",
            ));
        }
        Ok(())
    }

    /// The authors the actor subscribes to, in author id order.
    pub fn authors(db: &Database, actor: &Actor) -> Result<Vec<User>> {
        db.collect_rows(
            "SELECT User.* FROM User
                JOIN Subscription ON Subscription.author_id = User.user_id
                WHERE Subscription.user_id = ?
                ORDER BY User.user_id",
            params![actor.user_id],
        )
    }

    /// An author with a preview of their recipes, optionally cut to `recipes_limit`.
    pub fn with_recipes(
        db: &Database,
        viewer: &Actor,
        author: &User,
        recipes_limit: Option<usize>,
    ) -> Result<AuthorWithRecipes> {
        let recipes = Recipe::list_by_author(db, author.user_id)?;
        let recipes_count = recipes.len();
        Ok(AuthorWithRecipes {
            author: author.profile(db, Some(viewer))?,
            recipes: recipes
                .iter()
                .take(recipes_limit.unwrap_or(usize::MAX))
                .map(Recipe::short)
                .collect(),
            recipes_count,
        })
    }
}

/// Helpers for seeding a test database.
#[cfg(test)]
pub mod testing {
    use super::*;

    pub fn user(db: &Database, username: &str) -> Actor {
        let user_id = User::push(
            db,
            &User {
                user_id: 0,
                email: format!("{username}@example.com"),
                username: username.into(),
                first_name: username.into(),
                last_name: "Tester".into(),
                is_staff: false,
            },
            &format!("token-{username}"),
        )
        .unwrap();
        Actor {
            user_id,
            is_staff: false,
        }
    }

    /// Rows in a table, for checking that a failed call left it alone.
    pub fn row_count(db: &Database, table: &str) -> usize {
        let conn = db.pool.get().unwrap();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), params![], |row| {
                row.get(0)
            })
            .unwrap();
        count as usize
    }

    pub fn tag(db: &Database, name: &str, color: &str, slug: &str) -> i64 {
        Tags::push(db, name, color, slug).unwrap()
    }

    pub fn ingredient(db: &Database, name: &str, unit: &str) -> i64 {
        Ingredients::push(db, name, unit).unwrap()
    }

    pub fn recipe_body(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> RecipeForCreate {
        RecipeForCreate {
            name: name.into(),
            text: format!("How to make {name}"),
            cooking_time: 10,
            image: None,
            ingredients: ingredients
                .iter()
                .map(|&(id, amount)| IngredientAmount { id, amount })
                .collect(),
            tags: tags.to_vec(),
        }
    }

    pub fn recipe(
        db: &Database,
        author: &Actor,
        name: &str,
        ingredients: &[(i64, i64)],
        tags: &[i64],
    ) -> i64 {
        Recipe::create(db, author, recipe_body(name, ingredients, tags))
            .unwrap()
            .recipe_id
    }
}
