use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::engagement;
use crate::error::AppError;
use crate::events;
use crate::middleware::require_auth;

/// Full HTTP surface. Open reads and the credential endpoints sit outside
/// the auth layer; everything else goes through `require_auth`. The auth
/// layer only wraps matched routes, so a wrong method on a protected path
/// is a 405 whether or not a token came with it.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/user/register", post(auth::register))
        .route("/api/user/login", post(auth::login))
        .route("/api/user/me", get(auth::me))
        .route("/api/events/all-events", get(events::list_all_events))
        .route("/api/events/questions", get(engagement::list_questions))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/events", post(events::create_event).get(events::list_my_events))
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/question", post(engagement::ask_question))
        .route("/api/events/attend", post(engagement::attend_event))
        .route("/api/events/vote", post(engagement::vote))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
