//! Transaction category API endpoints.

use api_types::category::{CategoryList, CategoryNew, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state.engine.new_category(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn read(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(category_id).await?;
    Ok(Json(map_category(category)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<CategoryList>, ServerError> {
    let categories = state
        .engine
        .categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(CategoryList { categories }))
}
