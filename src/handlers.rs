use crate::errors::AppError;
use crate::models::{
    Activity, ActivityFilter, ActivityQuery, AddActivityRequest, DailySummary, DashboardResponse,
    Goal,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tokio::task::block_in_place;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.dashboard()))
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let filter = match query.kind.as_deref() {
        Some(kind) => kind.parse::<ActivityFilter>()?,
        None => ActivityFilter::All,
    };
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.list_activities_filtered(filter)))
}

pub async fn add_activity(
    State(state): State<AppState>,
    Json(payload): Json<AddActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let input = payload.into_new_activity()?;
    let mut tracker = state.tracker.lock().await;
    let activity = block_in_place(|| tracker.add_activity(&input))?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    block_in_place(|| tracker.delete_activity(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.list_goals().to_vec())
}

pub async fn get_summary(State(state): State<AppState>) -> Json<DailySummary> {
    let tracker = state.tracker.lock().await;
    Json(tracker.daily_summary())
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.dashboard())
}
