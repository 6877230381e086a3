use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use eventboard_types::api::{
    Claims, Envelope, EventCreatedResponse, EventDetailResponse, EventFields, EventListResponse,
    EventUpdatedResponse, MessageResponse,
};

use crate::auth::AppState;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::registry;
use crate::run_blocking;

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(fields): ApiJson<EventFields>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let event = run_blocking(move || registry::create_event(&db.db, claims.id, &fields)).await?;

    info!("User {} created event {}", claims.id, event.event_id);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(EventCreatedResponse {
            message: "Event created successfully".to_string(),
            event_id: event.event_id,
            event,
        })),
    ))
}

/// GET /api/events: events created by the caller.
pub async fn list_my_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let events = run_blocking(move || registry::list_owned_by(&db.db, claims.id)).await?;

    Ok(Json(Envelope::ok(EventListResponse { events })))
}

/// GET /api/events/all-events
pub async fn list_all_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let events = run_blocking(move || registry::list_all(&db.db)).await?;

    Ok(Json(Envelope::ok(EventListResponse { events })))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let event =
        run_blocking(move || registry::get_detail(&db.db, &event_id, Some(claims.id))).await?;

    Ok(Json(Envelope::ok(EventDetailResponse { event })))
}

/// PUT /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(claims): Extension<Claims>,
    ApiJson(fields): ApiJson<EventFields>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let event =
        run_blocking(move || registry::update_event(&db.db, &event_id, claims.id, &fields)).await?;

    info!("User {} updated event {}", claims.id, event.event_id);
    Ok(Json(Envelope::ok(EventUpdatedResponse {
        message: "Event updated successfully".to_string(),
        event,
    })))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let id = event_id.clone();
    run_blocking(move || registry::delete_event(&db.db, &id, claims.id)).await?;

    info!("User {} deleted event {}", claims.id, event_id);
    Ok(Json(Envelope::ok(MessageResponse::new("Event deleted successfully"))))
}
