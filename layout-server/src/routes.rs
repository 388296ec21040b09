//! Template API route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use layout_core::{Category, Document, DocumentFilter, DocumentId, Repository};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for listing templates.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only templates in this category.
    pub category_id: Option<String>,
    /// Case-insensitive name search.
    pub q: Option<String>,
}

impl From<ListQuery> for DocumentFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            category_id: query.category_id.filter(|c| !c.is_empty()),
            name_contains: query.q.filter(|q| !q.trim().is_empty()),
        }
    }
}

fn parse_id(raw: &str) -> Result<DocumentId, ApiError> {
    DocumentId::parse(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// List available categories.
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.as_ref().clone())
}

/// List templates, optionally filtered by category and name.
///
/// # Errors
///
/// Returns [`ApiError::Store`] if the store cannot be read.
#[tracing::instrument(name = "list_templates", skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.store.load(&query.into())?;
    tracing::debug!(count = documents.len(), "Listed templates");
    Ok(Json(documents))
}

/// Fetch one template.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] or [`ApiError::NotFound`].
#[tracing::instrument(name = "get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

/// Create a template under a freshly assigned ID.
///
/// # Errors
///
/// Returns [`ApiError::Body`] for malformed documents and
/// [`ApiError::Validation`] if the name or category is missing.
#[tracing::instrument(name = "create_template", skip(state, payload))]
pub async fn create_template(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let Json(mut document) = payload?;
    document.id = DocumentId::new();
    document.validate(&state.categories)?;
    let saved = state.store.save(document)?;
    tracing::info!(template = %saved.id, name = %saved.name, "Template created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Replace an existing template. The ID in the path wins over the body.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for unknown IDs, [`ApiError::Body`] for
/// malformed documents and [`ApiError::Validation`] for invalid ones.
#[tracing::instrument(name = "update_template", skip(state, payload))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_id(&id)?;
    let Json(mut document) = payload?;
    document.id = id;
    document.validate(&state.categories)?;
    let saved = state.store.update(document)?;
    tracing::info!(template = %saved.id, "Template updated");
    Ok(Json(saved))
}

/// Delete a template.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the template does not exist.
#[tracing::instrument(name = "delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(id)?;
    tracing::info!(template = %id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}
