use crate::counters;
use crate::errors::AppError;
use crate::models::{
    AppData, Counter, CounterResponse, CreateCounterRequest, KindRequest, PeriodKind,
    RolloverResponse, StreakResponse, TitleRequest, ValueRequest,
};
use crate::rollover::{preview_streak, run_rollover};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut data = state.data.lock().await;
    // A page load is a natural rollover trigger: the user may be opening
    // the widget for the first time in days.
    if run_rollover(&mut data, today()) {
        save(&state, &data).await;
    }
    Html(render_index(&data))
}

pub async fn list_counters(State(state): State<AppState>) -> Json<Vec<CounterResponse>> {
    let data = state.data.lock().await;
    Json(data.counters.iter().cloned().map(to_response).collect())
}

pub async fn create_counter(
    State(state): State<AppState>,
    Json(payload): Json<CreateCounterRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }

    let mut data = state.data.lock().await;
    let counter = counters::create_counter(&mut data, title, payload.kind, today());
    save(&state, &data).await;
    Ok(Json(to_response(counter)))
}

pub async fn delete_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if !counters::delete_counter(&mut data, &id) {
        return Err(unknown_counter());
    }
    save(&state, &data).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rename_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TitleRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let title = payload.value.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }

    let mut data = state.data.lock().await;
    let counter = counters::set_title(&mut data, &id, title).ok_or_else(unknown_counter)?;
    save(&state, &data).await;
    Ok(Json(to_response(counter)))
}

pub async fn set_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ValueRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let mut data = state.data.lock().await;
    let counter = counters::set_target(&mut data, &id, payload.value).ok_or_else(unknown_counter)?;
    save(&state, &data).await;
    Ok(Json(to_response(counter)))
}

pub async fn set_kind(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<KindRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let mut data = state.data.lock().await;
    let counter =
        counters::set_kind(&mut data, &id, payload.value, today()).ok_or_else(unknown_counter)?;
    save(&state, &data).await;
    Ok(Json(to_response(counter)))
}

pub async fn increment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CounterResponse>, AppError> {
    adjust(&state, &id, 1).await
}

pub async fn decrement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CounterResponse>, AppError> {
    adjust(&state, &id, -1).await
}

pub async fn set_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ValueRequest>,
) -> Result<Json<CounterResponse>, AppError> {
    let mut data = state.data.lock().await;
    let counter =
        counters::set_progress(&mut data, &id, payload.value).ok_or_else(unknown_counter)?;
    save(&state, &data).await;
    Ok(Json(to_response(counter)))
}

pub async fn rollover(State(state): State<AppState>) -> Json<RolloverResponse> {
    let mut data = state.data.lock().await;
    let changed = run_rollover(&mut data, today());
    if changed {
        save(&state, &data).await;
    }
    Json(RolloverResponse { changed })
}

pub async fn get_streaks(State(state): State<AppState>) -> Json<Vec<StreakResponse>> {
    let data = state.data.lock().await;
    Json(
        PeriodKind::ALL
            .iter()
            .map(|&kind| {
                let record = data.streaks.get(kind);
                StreakResponse {
                    kind,
                    current: record.current,
                    best: record.best,
                    preview: preview_streak(&data, kind),
                }
            })
            .collect(),
    )
}

async fn adjust(state: &AppState, id: &str, delta: i64) -> Result<Json<CounterResponse>, AppError> {
    let mut data = state.data.lock().await;
    let counter = counters::adjust_progress(&mut data, id, delta).ok_or_else(unknown_counter)?;
    save(state, &data).await;
    Ok(Json(to_response(counter)))
}

// A failed write must not fail the mutation: the in-memory state stays
// authoritative and the next successful write catches up.
async fn save(state: &AppState, data: &AppData) {
    if let Err(err) = persist_data(&state.data_path, data).await {
        error!("failed to persist state: {}", err.message);
    }
}

fn unknown_counter() -> AppError {
    AppError::not_found("no such counter")
}

fn to_response(counter: Counter) -> CounterResponse {
    CounterResponse {
        done: counter.progress >= counter.target,
        id: counter.id,
        title: counter.title,
        kind: counter.kind,
        progress: counter.progress,
        target: counter.target,
        period_key: counter.period_key,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
