use crate::{routes::teacher_email_list::get_teacher_email_list, state::AppState};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub mod teacher_email_list;

pub const FUNCTION_NAME: &str = "GetTeacherEmailListFunction";

/// The host forwards requests under its `api` prefix; the bare path is kept for local use.
pub fn router(state: AppState) -> Router {
    let handler = get(get_teacher_email_list).post(get_teacher_email_list);

    Router::new()
        .route(&format!("/api/{FUNCTION_NAME}"), handler.clone())
        .route(&format!("/{FUNCTION_NAME}"), handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
