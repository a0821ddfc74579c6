use crate::catalog::{self, CatalogResponse};
use crate::companion::{can_brush, can_feed, can_play, is_unlocked};
use crate::errors::AppError;
use crate::models::{
    CareAction, CatColor, CatResponse, CharityCommitment, ColorRequest, FocusArea,
    FocusAreasRequest, NameRequest, OnboardingState, RolloverResponse, Settings, StepRequest,
    TasksResponse,
};
use crate::state::{AppState, Nafs};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn get_onboarding(State(state): State<AppState>) -> Json<OnboardingState> {
    let nafs = state.nafs.lock().await;
    Json(nafs.onboarding.state().clone())
}

pub async fn onboarding_next(State(state): State<AppState>) -> Json<OnboardingState> {
    let mut nafs = state.nafs.lock().await;
    nafs.next_step();
    Json(nafs.onboarding.state().clone())
}

pub async fn onboarding_previous(State(state): State<AppState>) -> Json<OnboardingState> {
    let mut nafs = state.nafs.lock().await;
    nafs.previous_step();
    Json(nafs.onboarding.state().clone())
}

pub async fn onboarding_step(
    State(state): State<AppState>,
    Json(payload): Json<StepRequest>,
) -> Result<Json<OnboardingState>, AppError> {
    if !(catalog::FIRST_STEP..=catalog::LAST_STEP).contains(&payload.step) {
        return Err(AppError::bad_request(format!(
            "step must be between {} and {}",
            catalog::FIRST_STEP,
            catalog::LAST_STEP
        )));
    }
    let mut nafs = state.nafs.lock().await;
    nafs.set_step(payload.step);
    Ok(Json(nafs.onboarding.state().clone()))
}

pub async fn onboarding_name(
    State(state): State<AppState>,
    Json(payload): Json<NameRequest>,
) -> Json<OnboardingState> {
    let mut nafs = state.nafs.lock().await;
    nafs.set_cat_name(payload.name.trim().to_string());
    Json(nafs.onboarding.state().clone())
}

pub async fn onboarding_color(
    State(state): State<AppState>,
    Json(payload): Json<ColorRequest>,
) -> Result<Json<OnboardingState>, AppError> {
    let color = parse_color(&payload.color)?;
    let mut nafs = state.nafs.lock().await;
    nafs.set_cat_color(color);
    Ok(Json(nafs.onboarding.state().clone()))
}

pub async fn onboarding_focus(
    State(state): State<AppState>,
    Json(payload): Json<FocusAreasRequest>,
) -> Result<Json<OnboardingState>, AppError> {
    let areas = payload
        .focus_areas
        .iter()
        .map(|id| parse_focus_area(id))
        .collect::<Result<Vec<_>, _>>()?;
    let mut nafs = state.nafs.lock().await;
    nafs.set_focus_areas(areas);
    Ok(Json(nafs.onboarding.state().clone()))
}

pub async fn onboarding_toggle_focus(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OnboardingState>, AppError> {
    let area = parse_focus_area(&id)?;
    let mut nafs = state.nafs.lock().await;
    nafs.toggle_focus_area(area);
    Ok(Json(nafs.onboarding.state().clone()))
}

pub async fn onboarding_complete(State(state): State<AppState>) -> Json<OnboardingState> {
    let mut nafs = state.nafs.lock().await;
    nafs.complete_onboarding();
    info!("onboarding completed for {:?}", nafs.onboarding.state().cat_name);
    Json(nafs.onboarding.state().clone())
}

pub async fn onboarding_reset(State(state): State<AppState>) -> Json<OnboardingState> {
    let mut nafs = state.nafs.lock().await;
    nafs.reset_onboarding();
    Json(nafs.onboarding.state().clone())
}

pub async fn get_tasks(State(state): State<AppState>) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.roll_to_today();
    Json(tasks_response(&nafs))
}

pub async fn task_toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.toggle_task(&id);
    Json(tasks_response(&nafs))
}

pub async fn task_complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.complete_task(&id);
    Json(tasks_response(&nafs))
}

pub async fn task_uncomplete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.uncomplete_task(&id);
    Json(tasks_response(&nafs))
}

pub async fn tasks_reset(State(state): State<AppState>) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.reset_tasks();
    Json(tasks_response(&nafs))
}

pub async fn tasks_refresh(State(state): State<AppState>) -> Json<TasksResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.refresh_tasks();
    Json(tasks_response(&nafs))
}

pub async fn get_cat(State(state): State<AppState>) -> Json<CatResponse> {
    let mut nafs = state.nafs.lock().await;
    nafs.roll_to_today();
    Json(cat_response(&nafs))
}

pub async fn cat_feed(State(state): State<AppState>) -> Result<Json<CatResponse>, AppError> {
    apply_care(&state, CareAction::Feed).await
}

pub async fn cat_brush(State(state): State<AppState>) -> Result<Json<CatResponse>, AppError> {
    apply_care(&state, CareAction::Brush).await
}

pub async fn cat_play(State(state): State<AppState>) -> Result<Json<CatResponse>, AppError> {
    apply_care(&state, CareAction::Play).await
}

async fn apply_care(state: &AppState, action: CareAction) -> Result<Json<CatResponse>, AppError> {
    let mut nafs = state.nafs.lock().await;
    nafs.roll_to_today();
    let completed = nafs.tasks_completed_today();
    if !is_unlocked(action, completed) {
        return Err(AppError::locked(format!(
            "{action:?} is locked with {completed} tasks completed today"
        )));
    }
    nafs.care(action);
    Ok(Json(cat_response(&nafs)))
}

pub async fn get_charity(State(state): State<AppState>) -> Json<CharityCommitment> {
    let mut nafs = state.nafs.lock().await;
    Json(nafs.charity())
}

pub async fn put_charity(
    State(state): State<AppState>,
    Json(payload): Json<CharityCommitment>,
) -> Result<Json<CharityCommitment>, AppError> {
    let mut nafs = state.nafs.lock().await;
    if !nafs.set_charity(&payload) {
        return Err(AppError::internal("failed to save charity commitment"));
    }
    Ok(Json(payload))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    let mut nafs = state.nafs.lock().await;
    Json(nafs.settings())
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(payload): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    let mut nafs = state.nafs.lock().await;
    if !nafs.set_settings(&payload) {
        return Err(AppError::internal("failed to save settings"));
    }
    Ok(Json(payload))
}

pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(catalog::describe())
}

pub async fn visibility(State(state): State<AppState>) -> Json<RolloverResponse> {
    let mut nafs = state.nafs.lock().await;
    Json(nafs.on_visibility_regained())
}

pub async fn clear_data(State(state): State<AppState>) -> StatusCode {
    let mut nafs = state.nafs.lock().await;
    nafs.clear_all();
    info!("all data cleared");
    StatusCode::NO_CONTENT
}

fn tasks_response(nafs: &Nafs) -> TasksResponse {
    TasksResponse {
        date: nafs.tasks.date().to_string(),
        tasks: nafs.tasks.tasks().to_vec(),
        tasks_by_category: nafs.tasks.tasks_by_category(),
        stats: nafs.tasks.stats(),
    }
}

fn cat_response(nafs: &Nafs) -> CatResponse {
    let completed = nafs.tasks_completed_today();
    CatResponse {
        cat: nafs.cat.cat().clone(),
        tasks_completed_today: completed,
        can_feed: can_feed(completed),
        can_brush: can_brush(completed),
        can_play: can_play(completed),
        should_show_banner: nafs.cat.should_show_banner(completed),
    }
}

fn parse_color(id: &str) -> Result<CatColor, AppError> {
    CatColor::parse(id.trim()).ok_or_else(|| AppError::bad_request(format!("unknown cat color '{id}'")))
}

fn parse_focus_area(id: &str) -> Result<FocusArea, AppError> {
    FocusArea::parse(id.trim())
        .ok_or_else(|| AppError::bad_request(format!("unknown focus area '{id}'")))
}
