pub mod auth;
pub mod engagement;
pub mod error;
pub mod events;
pub mod extract;
pub mod ledger;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod token;

use tracing::error;
use uuid::Uuid;

use crate::error::AppError;

/// Runs a store call on the blocking pool so SQLite and Argon2 work never
/// stalls the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        AppError::Internal(anyhow::anyhow!("blocking task failed: {}", e))
    })?
}

/// Normalises a client-supplied id through `Uuid` so casing differences
/// still match. Text that is not an id resolves to nothing.
pub(crate) fn id_key(raw: &str) -> Option<String> {
    raw.trim().parse::<Uuid>().ok().map(|id| id.to_string())
}
