//! Notification handlers.

use axum::Json;
use axum::extract::State;
use bytes::Bytes;

use notihub_core::error::AppError;
use notihub_core::types::pagination::PageRequest;
use notihub_core::types::sorting::SortField;
use notihub_entity::Notification;
use notihub_service::RequestContext;

use crate::dto::request::NotificationParams;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{ApiQuery, RequestCredentials};
use crate::state::AppState;

/// PUT /api/v1/notifications/batch
///
/// The body is kept raw until the application signature over it is checked.
pub async fn save_batch(
    State(state): State<AppState>,
    credentials: RequestCredentials,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let caller = state.authorizer.internal(&credentials, &body)?;

    let records: Vec<Notification> = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("Invalid notification batch: {e}")))?;

    state
        .notification_service
        .save(&RequestContext::new(caller), records)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    credentials: RequestCredentials,
    ApiQuery(params): ApiQuery<NotificationParams>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let user = params.user()?;
    let query = params.list_query(&state.config.query)?;
    let caller = state.authorizer.external(&credentials, user)?;

    let page = state
        .notification_service
        .extract(&RequestContext::new(caller), user, &query)
        .await?;
    Ok(Json(ApiResponse::page(page)))
}

/// GET /api/v1/notifications/count
pub async fn count_notifications(
    State(state): State<AppState>,
    credentials: RequestCredentials,
    ApiQuery(params): ApiQuery<NotificationParams>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let user = params.user()?;
    let sort = SortField::new(
        state.config.query.default_sort_by.clone(),
        state.config.query.default_sort_order,
    );
    let query = params.query_with(sort, PageRequest::all())?;
    let caller = state.authorizer.external(&credentials, user)?;

    let count = state
        .notification_service
        .count(&RequestContext::new(caller), user, &query)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
