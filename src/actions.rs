use crate::api::ClientError;
use crate::auth::{AuthError, Identity};
use crate::forms::{ParameterDraft, TankDraft, WaterChangeDraft};
use crate::shell::ShellError;
use crate::state::AppState;
use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Re-fetches the tank list. Returns the failure message if the fetch failed,
/// `Ok(false)` if the sign-in gate kept it from being sent.
pub async fn refresh(state: &AppState) -> Result<bool, String> {
    {
        let mut shell = state.shell.lock().await;
        if !shell.may_fetch() {
            info!("skipping tank fetch until someone signs in");
            return Ok(false);
        }
        shell.begin_fetch();
    }

    let result = match state.credential() {
        Ok(token) => state
            .api
            .list_tanks(token.as_deref())
            .await
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    let outcome = match &result {
        Ok(tanks) => {
            info!(count = tanks.len(), "loaded tanks");
            Ok(true)
        }
        Err(message) => {
            error!("failed to load tanks: {message}");
            Err(message.clone())
        }
    };
    state
        .shell
        .lock()
        .await
        .finish_fetch(result.map_err(|message| format!("Failed to load tanks: {message}")));
    outcome
}

pub async fn submit_parameter(
    state: &AppState,
    tank_id: &str,
    fields: ParameterDraft,
) -> Result<(), SubmitError> {
    let (ticket, request) = state
        .shell
        .lock()
        .await
        .prepare_parameter(tank_id, fields.clone(), Utc::now())?;

    let created = match state.credential() {
        Ok(token) => state
            .api
            .create_parameter(&request, token.as_deref())
            .await
            .map_err(SubmitError::from),
        Err(err) => Err(err.into()),
    };

    match created {
        Ok(parameter) => {
            info!(tank_id, parameter_id = %parameter.id, "recorded parameter");
            state.shell.lock().await.parameter_created(&ticket, &fields);
            let _ = refresh(state).await;
            Ok(())
        }
        Err(err) => {
            error!(tank_id, "error adding tank parameter: {err}");
            state
                .shell
                .lock()
                .await
                .parameter_failed(&ticket, err.to_string());
            Err(err)
        }
    }
}

pub async fn submit_water_change(
    state: &AppState,
    tank_id: &str,
    fields: WaterChangeDraft,
) -> Result<(), SubmitError> {
    let (ticket, request) = state
        .shell
        .lock()
        .await
        .prepare_water_change(tank_id, fields.clone(), Utc::now())?;

    let created = match state.credential() {
        Ok(token) => state
            .api
            .create_water_change(&request, token.as_deref())
            .await
            .map_err(SubmitError::from),
        Err(err) => Err(err.into()),
    };

    match created {
        Ok(change) => {
            info!(tank_id, water_change_id = %change.id, "logged water change");
            state
                .shell
                .lock()
                .await
                .water_change_created(&ticket, &fields);
            let _ = refresh(state).await;
            Ok(())
        }
        Err(err) => {
            error!(tank_id, "error adding water change: {err}");
            state
                .shell
                .lock()
                .await
                .water_change_failed(&ticket, err.to_string());
            Err(err)
        }
    }
}

pub async fn submit_tank(state: &AppState, fields: TankDraft) -> Result<(), SubmitError> {
    let (ticket, request) = state.shell.lock().await.prepare_tank(fields.clone())?;

    let created = match state.credential() {
        Ok(token) => state
            .api
            .create_tank(&request, token.as_deref())
            .await
            .map_err(SubmitError::from),
        Err(err) => Err(err.into()),
    };

    match created {
        Ok(tank) => {
            info!(tank_id = %tank.id, name = %tank.name, "created tank");
            state.shell.lock().await.tank_created(&ticket, &fields);
            let _ = refresh(state).await;
            Ok(())
        }
        Err(err) => {
            error!("error creating tank: {err}");
            state.shell.lock().await.tank_failed(&ticket, err.to_string());
            Err(err)
        }
    }
}

/// Signs in through the provider and loads the list before returning, so the
/// next page render already shows the tanks.
pub async fn sign_in(state: &AppState) -> Result<Identity, AuthError> {
    let provider = state.identity.as_ref().ok_or(AuthError::NotSignedIn)?;
    let identity = provider.sign_in()?;
    info!(uid = %identity.uid, "signed in");
    state.shell.lock().await.set_identity(Some(identity.clone()));
    let _ = refresh(state).await;
    Ok(identity)
}

pub async fn sign_out(state: &AppState) {
    if let Some(provider) = state.identity.as_ref() {
        provider.sign_out();
    }
    if state.shell.lock().await.set_identity(None) {
        info!("signed out, tank list cleared");
    }
}

/// Copies the provider's current identity into the shell and fetches when it
/// changed to a signed-in user.
pub async fn sync_identity(state: &AppState) {
    let Some(provider) = state.identity.as_ref() else {
        return;
    };
    let identity = provider.current_identity();
    let signed_in = identity.is_some();

    let changed = state.shell.lock().await.set_identity(identity);
    if !changed {
        return;
    }
    if signed_in {
        let _ = refresh(state).await;
    } else {
        info!("signed out, tank list cleared");
    }
}

/// Follows the provider's auth-state subscription for the life of the process.
pub fn watch_identity(state: AppState) -> Option<JoinHandle<()>> {
    let mut changes = state.identity.as_ref()?.subscribe();
    Some(tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            sync_identity(&state).await;
        }
        warn!("identity provider closed its auth-state channel");
    }))
}
