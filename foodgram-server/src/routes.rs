use axum::{
    extract::{FromRef, Path, RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_extra::extract::Query;
use foodgram::basic_models::{
    AuthorWithRecipes, Ingredient, Page, RecipeDetail, RecipeForCreate, RecipeForUpdate,
    RecipeShort, Tag, UserProfile,
};
use serde::Deserialize;

use crate::{
    auth::{Actor, MaybeActor},
    cache::{self, ReferenceCache},
    database::Database,
    errors::{WebError, WebResult},
    filters::{filter_recipes, RecipeFilter},
    models::{Ingredients, Recipe, RecipeList, Subscription, Tags, User},
    pagination::{paginate, PageParams},
    search::ranked_search,
    shopping_list,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: ReferenceCache,
    pub page_size: usize,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

/// Every route of the API.
pub fn router(state: AppState) -> Router {
    Router::new()
        // `GET /health` goes to `health`
        .route("/health", get(health))
        .route("/api/tags/", get(list_tags))
        .route("/api/tags/:tag_id/", get(get_tag))
        // `GET /api/ingredients/?name=` does the ranked search
        .route("/api/ingredients/", get(search_ingredients))
        .route("/api/ingredients/:ingredient_id/", get(get_ingredient))
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/:recipe_id/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/:recipe_id/favorite/",
            axum::routing::post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/:recipe_id/shopping_cart/",
            axum::routing::post(add_to_cart).delete(remove_from_cart),
        )
        .route("/api/users/", get(list_users))
        .route("/api/users/me/", get(me))
        .route("/api/users/subscriptions/", get(subscriptions))
        .route("/api/users/:user_id/", get(get_user))
        .route(
            "/api/users/:user_id/subscribe/",
            axum::routing::post(subscribe).delete(unsubscribe),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// Just reply that everything is okay
async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_tags(State(state): State<AppState>) -> WebResult<Json<Vec<Tag>>> {
    let tags = cache::tags(&state.cache, &state.db).await?;
    Ok(Json(tags.as_ref().clone()))
}

async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
) -> WebResult<Json<Tag>> {
    Ok(Json(
        Tags::get_by_id(&state.db, tag_id)?.ok_or(WebError::NotFound)?,
    ))
}

#[derive(Debug, Deserialize)]
struct IngredientQuery {
    #[serde(default)]
    name: String,
}

/// Ingredients whose names start with `name` first, then those that merely contain it.
async fn search_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> WebResult<Json<Vec<Ingredient>>> {
    let ingredients = cache::ingredients(&state.cache, &state.db).await?;
    Ok(Json(
        ranked_search(ingredients.as_slice(), &query.name)
            .into_iter()
            .cloned()
            .collect(),
    ))
}

async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i64>,
) -> WebResult<Json<Ingredient>> {
    Ok(Json(
        Ingredients::get_by_id(&state.db, ingredient_id)?.ok_or(WebError::NotFound)?,
    ))
}

async fn list_recipes(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Query(filter): Query<RecipeFilter>,
    Query(page): Query<PageParams>,
    RawQuery(raw): RawQuery,
) -> WebResult<Json<Page<RecipeDetail>>> {
    let recipes = filter_recipes(&state.db, actor.as_ref(), &filter)?;
    Ok(Json(paginate(
        recipes,
        page,
        state.page_size,
        raw.as_deref(),
        |recipe| recipe.detail(&state.db, actor.as_ref()),
    )?))
}

async fn get_recipe(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(recipe_id): Path<i64>,
) -> WebResult<Json<RecipeDetail>> {
    let recipe = Recipe::require(&state.db, recipe_id)?;
    Ok(Json(recipe.detail(&state.db, actor.as_ref())?))
}

async fn create_recipe(
    State(state): State<AppState>,
    actor: Actor,
    Json(upload): Json<RecipeForCreate>,
) -> WebResult<(StatusCode, Json<RecipeDetail>)> {
    let recipe = Recipe::create(&state.db, &actor, upload)?;
    Ok((
        StatusCode::CREATED,
        Json(recipe.detail(&state.db, Some(&actor))?),
    ))
}

async fn update_recipe(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
    Json(upload): Json<RecipeForUpdate>,
) -> WebResult<Json<RecipeDetail>> {
    let recipe = Recipe::update(&state.db, &actor, recipe_id, upload)?;
    Ok(Json(recipe.detail(&state.db, Some(&actor))?))
}

async fn delete_recipe(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
) -> WebResult<StatusCode> {
    Recipe::delete(&state.db, &actor, recipe_id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn add_to_list(
    state: &AppState,
    list: RecipeList,
    actor: &Actor,
    recipe_id: i64,
) -> WebResult<(StatusCode, Json<RecipeShort>)> {
    let recipe = list.add(&state.db, actor, recipe_id)?;
    Ok((StatusCode::CREATED, Json(recipe.short())))
}

async fn add_favorite(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
) -> WebResult<(StatusCode, Json<RecipeShort>)> {
    add_to_list(&state, RecipeList::Favorite, &actor, recipe_id)
}

async fn remove_favorite(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
) -> WebResult<StatusCode> {
    RecipeList::Favorite.remove(&state.db, &actor, recipe_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to_cart(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
) -> WebResult<(StatusCode, Json<RecipeShort>)> {
    add_to_list(&state, RecipeList::ShoppingCart, &actor, recipe_id)
}

async fn remove_from_cart(
    State(state): State<AppState>,
    actor: Actor,
    Path(recipe_id): Path<i64>,
) -> WebResult<StatusCode> {
    RecipeList::ShoppingCart.remove(&state.db, &actor, recipe_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the aggregated shopping list as a PDF attachment.
async fn download_shopping_cart(
    State(state): State<AppState>,
    actor: Actor,
) -> WebResult<impl IntoResponse> {
    let pdf = shopping_list::export_pdf(&state.db, &actor)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping_list::FILENAME),
            ),
        ],
        pdf,
    ))
}

async fn list_users(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Query(page): Query<PageParams>,
    RawQuery(raw): RawQuery,
) -> WebResult<Json<Page<UserProfile>>> {
    let users = User::list_all(&state.db)?;
    Ok(Json(paginate(
        users,
        page,
        state.page_size,
        raw.as_deref(),
        |user| Ok(user.profile(&state.db, actor.as_ref())?),
    )?))
}

async fn get_user(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(user_id): Path<i64>,
) -> WebResult<Json<UserProfile>> {
    let user = User::get_by_id(&state.db, user_id)?.ok_or(WebError::NotFound)?;
    Ok(Json(user.profile(&state.db, actor.as_ref())?))
}

async fn me(State(state): State<AppState>, actor: Actor) -> WebResult<Json<UserProfile>> {
    let user = User::get_by_id(&state.db, actor.user_id)?.ok_or(WebError::NotFound)?;
    Ok(Json(user.profile(&state.db, Some(&actor))?))
}

#[derive(Debug, Default, Deserialize)]
struct RecipesLimit {
    recipes_limit: Option<usize>,
}

async fn subscriptions(
    State(state): State<AppState>,
    actor: Actor,
    Query(page): Query<PageParams>,
    Query(limit): Query<RecipesLimit>,
    RawQuery(raw): RawQuery,
) -> WebResult<Json<Page<AuthorWithRecipes>>> {
    let authors = Subscription::authors(&state.db, &actor)?;
    Ok(Json(paginate(
        authors,
        page,
        state.page_size,
        raw.as_deref(),
        |author| {
            Ok(Subscription::with_recipes(
                &state.db,
                &actor,
                &author,
                limit.recipes_limit,
            )?)
        },
    )?))
}

async fn subscribe(
    State(state): State<AppState>,
    actor: Actor,
    Path(author_id): Path<i64>,
    Query(limit): Query<RecipesLimit>,
) -> WebResult<(StatusCode, Json<AuthorWithRecipes>)> {
    let author = Subscription::subscribe(&state.db, &actor, author_id)?;
    Ok((
        StatusCode::CREATED,
        Json(Subscription::with_recipes(
            &state.db,
            &actor,
            &author,
            limit.recipes_limit,
        )?),
    ))
}

async fn unsubscribe(
    State(state): State<AppState>,
    actor: Actor,
    Path(author_id): Path<i64>,
) -> WebResult<StatusCode> {
    Subscription::unsubscribe(&state.db, &actor, author_id)?;
    Ok(StatusCode::NO_CONTENT)
}
