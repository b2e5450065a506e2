use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CalorieRange, CreateRecipeRequest},
    repo::{self, NewRecipe, Recipe},
};
use crate::{auth::extractors::AuthUser, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/calories", get(recipes_by_calories))
        .route("/recipes/cuisine/:cuisine", get(recipes_by_cuisine))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", axum::routing::post(create_recipe))
        .route("/recipes/:id", axum::routing::delete(delete_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
) -> Result<Json<Vec<Recipe>>, (StatusCode, String)> {
    let recipes = repo::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, (StatusCode, String)> {
    match repo::find_by_id(&state.db, id).await.map_err(internal)? {
        Some(recipe) => Ok(Json(recipe)),
        None => Err((StatusCode::NOT_FOUND, "Recipe not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn recipes_by_cuisine(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Path(cuisine): Path<String>,
) -> Result<Json<Vec<Recipe>>, (StatusCode, String)> {
    let recipes = repo::find_by_cuisine(&state.db, &cuisine)
        .await
        .map_err(internal)?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn recipes_by_calories(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Query(range): Query<CalorieRange>,
) -> Result<Json<Vec<Recipe>>, (StatusCode, String)> {
    if !range.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            "lower must not exceed upper".into(),
        ));
    }
    let recipes = repo::find_by_calorie_range(&state.db, range.lower, range.upper)
        .await
        .map_err(internal)?;
    Ok(Json(recipes))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), (StatusCode, String)> {
    if let Err(msg) = body.validate() {
        warn!(%msg, "invalid recipe");
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    let author_id = state
        .accounts
        .get_user_id(&username)
        .await
        .map_err(|e| (e.status(), e.public_message()))?;

    let recipe = repo::create(
        &state.db,
        NewRecipe {
            author_id,
            name: body.name.trim(),
            cuisine: body.cuisine.trim(),
            calories: body.calories,
            ingredients: body.ingredients.as_deref(),
            instructions: body.instructions.as_deref(),
        },
    )
    .await
    .map_err(internal)?;

    info!(recipe_id = %recipe.id, %author_id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let author_id = state
        .accounts
        .get_user_id(&username)
        .await
        .map_err(|e| (e.status(), e.public_message()))?;

    if repo::delete(&state.db, author_id, id).await.map_err(internal)? {
        info!(recipe_id = %id, %author_id, "recipe deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Recipe not found".into()))
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "recipe query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".into(),
    )
}
