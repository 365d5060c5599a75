use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/counters", get(handlers::list_counters).post(handlers::create_counter))
        .route("/api/counters/:id", delete(handlers::delete_counter))
        .route("/api/counters/:id/title", post(handlers::rename_counter))
        .route("/api/counters/:id/target", post(handlers::set_target))
        .route("/api/counters/:id/kind", post(handlers::set_kind))
        .route("/api/counters/:id/increment", post(handlers::increment))
        .route("/api/counters/:id/decrement", post(handlers::decrement))
        .route("/api/counters/:id/progress", post(handlers::set_progress))
        .route("/api/rollover", post(handlers::rollover))
        .route("/api/streaks", get(handlers::get_streaks))
        .with_state(state)
}
