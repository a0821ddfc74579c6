use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/onboarding", get(handlers::get_onboarding))
        .route("/api/onboarding/next", post(handlers::onboarding_next))
        .route("/api/onboarding/previous", post(handlers::onboarding_previous))
        .route("/api/onboarding/step", post(handlers::onboarding_step))
        .route("/api/onboarding/name", post(handlers::onboarding_name))
        .route("/api/onboarding/color", post(handlers::onboarding_color))
        .route("/api/onboarding/focus", post(handlers::onboarding_focus))
        .route("/api/onboarding/focus/:id/toggle", post(handlers::onboarding_toggle_focus))
        .route("/api/onboarding/complete", post(handlers::onboarding_complete))
        .route("/api/onboarding/reset", post(handlers::onboarding_reset))
        .route("/api/tasks", get(handlers::get_tasks))
        .route("/api/tasks/reset", post(handlers::tasks_reset))
        .route("/api/tasks/refresh", post(handlers::tasks_refresh))
        .route("/api/tasks/:id/toggle", post(handlers::task_toggle))
        .route("/api/tasks/:id/complete", post(handlers::task_complete))
        .route("/api/tasks/:id/uncomplete", post(handlers::task_uncomplete))
        .route("/api/cat", get(handlers::get_cat))
        .route("/api/cat/feed", post(handlers::cat_feed))
        .route("/api/cat/brush", post(handlers::cat_brush))
        .route("/api/cat/play", post(handlers::cat_play))
        .route("/api/charity", get(handlers::get_charity).put(handlers::put_charity))
        .route("/api/settings", get(handlers::get_settings).put(handlers::put_settings))
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/visibility", post(handlers::visibility))
        .route("/api/data", delete(handlers::clear_data))
        .with_state(state)
}
