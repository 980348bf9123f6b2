use crate::state::AppState;
use axum::Router;

pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::upload_routes())
}
