use crate::actions::{self, SubmitError};
use crate::errors::AppError;
use crate::forms::{ParameterDraft, TankDraft, WaterChangeDraft};
use crate::shell::{ShellError, ViewSnapshot};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let shell = state.shell.lock().await;
    Html(render_index(&shell.snapshot()))
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.shell.lock().await.snapshot())
}

pub async fn api_refresh(State(state): State<AppState>) -> Result<Json<ViewSnapshot>, AppError> {
    match actions::refresh(&state).await {
        Ok(true) => Ok(Json(state.shell.lock().await.snapshot())),
        Ok(false) => Err(AppError::unauthorized("sign in before loading tanks")),
        Err(message) => Err(AppError::bad_gateway(message)),
    }
}

/// Failures are already on the shell's error line, so the page just reloads.
pub async fn refresh(State(state): State<AppState>) -> Redirect {
    let _ = actions::refresh(&state).await;
    Redirect::to("/")
}

pub async fn show_create_tank(State(state): State<AppState>) -> Redirect {
    state.shell.lock().await.show_create_tank();
    Redirect::to("/")
}

pub async fn cancel_create_tank(
    State(state): State<AppState>,
    Form(fields): Form<TankDraft>,
) -> Redirect {
    state.shell.lock().await.cancel_tank_form(fields);
    Redirect::to("/")
}

pub async fn create_tank(State(state): State<AppState>, Form(fields): Form<TankDraft>) -> Redirect {
    let _ = actions::submit_tank(&state, fields).await;
    Redirect::to("/")
}

pub async fn toggle_tank(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.shell.lock().await.toggle_tank(&tank_id)?;
    Ok(Redirect::to("/"))
}

pub async fn toggle_parameter_form(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.shell.lock().await.toggle_parameter_form(&tank_id)?;
    Ok(Redirect::to("/"))
}

pub async fn cancel_parameter_form(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
    Form(fields): Form<ParameterDraft>,
) -> Result<Redirect, AppError> {
    state
        .shell
        .lock()
        .await
        .cancel_parameter_form(&tank_id, fields)?;
    Ok(Redirect::to("/"))
}

pub async fn create_parameter(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
    Form(fields): Form<ParameterDraft>,
) -> Result<Redirect, AppError> {
    back_to_page(actions::submit_parameter(&state, &tank_id, fields).await)
}

pub async fn toggle_water_change_form(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.shell.lock().await.toggle_water_change_form(&tank_id)?;
    Ok(Redirect::to("/"))
}

pub async fn cancel_water_change_form(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
    Form(fields): Form<WaterChangeDraft>,
) -> Result<Redirect, AppError> {
    state
        .shell
        .lock()
        .await
        .cancel_water_change_form(&tank_id, fields)?;
    Ok(Redirect::to("/"))
}

pub async fn create_water_change(
    State(state): State<AppState>,
    Path(tank_id): Path<String>,
    Form(fields): Form<WaterChangeDraft>,
) -> Result<Redirect, AppError> {
    back_to_page(actions::submit_water_change(&state, &tank_id, fields).await)
}

/// Validation and upstream failures are shown inside the form; only a post
/// aimed at a tank the page cannot show is refused.
fn back_to_page(result: Result<(), SubmitError>) -> Result<Redirect, AppError> {
    match result {
        Err(SubmitError::Shell(
            err @ (ShellError::UnknownTank(_) | ShellError::TankClosed(_)),
        )) => Err(err.into()),
        _ => Ok(Redirect::to("/")),
    }
}

pub async fn sign_in(State(state): State<AppState>) -> Result<Redirect, AppError> {
    if state.identity.is_none() {
        return Err(AppError::not_found("sign-in is not enabled"));
    }
    actions::sign_in(&state)
        .await
        .map_err(|err| AppError::unauthorized(err.to_string()))?;
    Ok(Redirect::to("/"))
}

pub async fn sign_out(State(state): State<AppState>) -> Result<Redirect, AppError> {
    if state.identity.is_none() {
        return Err(AppError::not_found("sign-in is not enabled"));
    }
    actions::sign_out(&state).await;
    Ok(Redirect::to("/"))
}
