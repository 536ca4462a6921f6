//! Categories API endpoints.

use api_types::{
    Message,
    category::{CategoryUpsert, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{Principal, ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub async fn create(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryUpsert>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state.categories.create(user_id, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn list(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .categories
        .list_for_owner(user_id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(categories))
}

pub async fn update(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryUpsert>, JsonRejection>,
) -> Result<Json<Message>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    state
        .categories
        .update(id, user_id, &payload.name)
        .await?;

    Ok(Json(Message::new("Category updated successfully")))
}

pub async fn delete(
    Extension(Principal(user_id)): Extension<Principal>,
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Message>, ServerError> {
    let Path(id) = id?;
    state.categories.delete(id, user_id).await?;

    Ok(Json(Message::new("Category deleted successfully")))
}
