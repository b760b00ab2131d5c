use crate::auth::Identity;
use crate::forms::{FormError, FormState, ParameterDraft, TankDraft, WaterChangeDraft};
use crate::models::{NewParameter, NewTank, NewWaterChange, Tank};
use crate::recent::{build_previews, TankPreview};
use crate::selection::{FormSlot, FormTicket, TankSelection};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    List,
    CreateTank,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShellError {
    #[error("no tank with id '{0}'")]
    UnknownTank(String),
    #[error("tank '{0}' is not expanded")]
    TankClosed(String),
    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// Everything the page is rendered from. Only the transition methods below
/// change it; the async layer never holds it across a network call.
#[derive(Debug, Default)]
pub struct Shell {
    tanks: Vec<Tank>,
    in_flight: usize,
    error: Option<String>,
    view: View,
    selection: TankSelection,
    tank_form: FormSlot<()>,
    identity: Option<Identity>,
    gated: bool,
    parameter_drafts: BTreeMap<String, FormState<ParameterDraft>>,
    water_change_drafts: BTreeMap<String, FormState<WaterChangeDraft>>,
    tank_draft: FormState<TankDraft>,
}

/// Read-only view handed to the renderer and the JSON endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub view: View,
    pub loading: bool,
    pub error: Option<String>,
    pub sign_in_required: bool,
    pub identity: Option<Identity>,
    pub open_tank: Option<String>,
    pub parameter_form: Option<OpenForm<ParameterDraft>>,
    pub water_change_form: Option<OpenForm<WaterChangeDraft>>,
    pub tank_form: Option<FormState<TankDraft>>,
    pub tanks: Vec<TankPreview>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenForm<D> {
    pub tank_id: String,
    pub state: FormState<D>,
}

impl Shell {
    pub fn new(gated: bool) -> Self {
        Self {
            gated,
            ..Self::default()
        }
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selection(&self) -> &TankSelection {
        &self.selection
    }

    /// No fetch may go out while the sign-in gate is closed.
    pub fn may_fetch(&self) -> bool {
        !self.gated || self.identity.is_some()
    }

    pub fn knows_tank(&self, tank_id: &str) -> bool {
        self.tanks.iter().any(|tank| tank.id == tank_id)
    }

    pub fn parameter_draft(&self, tank_id: &str) -> Option<&FormState<ParameterDraft>> {
        self.parameter_drafts.get(tank_id)
    }

    pub fn water_change_draft(&self, tank_id: &str) -> Option<&FormState<WaterChangeDraft>> {
        self.water_change_drafts.get(tank_id)
    }

    pub fn tank_draft(&self) -> &FormState<TankDraft> {
        &self.tank_draft
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view,
            loading: self.is_loading(),
            error: self.error.clone(),
            sign_in_required: !self.may_fetch(),
            identity: self.identity.clone(),
            open_tank: self.selection.open_tank().map(str::to_string),
            parameter_form: self.selection.parameter_form.key().map(|tank_id| OpenForm {
                tank_id: tank_id.clone(),
                state: self.parameter_drafts.get(tank_id).cloned().unwrap_or_default(),
            }),
            water_change_form: self
                .selection
                .water_change_form
                .key()
                .map(|tank_id| OpenForm {
                    tank_id: tank_id.clone(),
                    state: self
                        .water_change_drafts
                        .get(tank_id)
                        .cloned()
                        .unwrap_or_default(),
                }),
            tank_form: (self.view == View::CreateTank).then(|| self.tank_draft.clone()),
            tanks: build_previews(&self.tanks),
        }
    }

    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    /// Whichever fetch resolves last decides the list; there is no merging.
    pub fn finish_fetch(&mut self, result: Result<Vec<Tank>, String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !self.may_fetch() {
            // signed out while the request was in flight
            return;
        }
        match result {
            Ok(tanks) => {
                self.tanks = tanks;
                self.error = None;
                self.forget_missing_tanks();
            }
            Err(message) => self.error = Some(message),
        }
    }

    fn forget_missing_tanks(&mut self) {
        let tanks = &self.tanks;
        let is_known = |id: &str| tanks.iter().any(|tank| tank.id == id);
        self.parameter_drafts.retain(|id, _| is_known(id));
        self.water_change_drafts.retain(|id, _| is_known(id));
        if self.selection.open_tank().is_some_and(|id| !is_known(id)) {
            self.selection.clear();
        }
    }

    fn require_tank(&self, tank_id: &str) -> Result<(), ShellError> {
        if self.knows_tank(tank_id) {
            Ok(())
        } else {
            Err(ShellError::UnknownTank(tank_id.to_string()))
        }
    }

    /// Creation forms only live inside an expanded card.
    fn require_open_tank(&self, tank_id: &str) -> Result<(), ShellError> {
        self.require_tank(tank_id)?;
        if self.selection.is_open(tank_id) {
            Ok(())
        } else {
            Err(ShellError::TankClosed(tank_id.to_string()))
        }
    }

    /// Returns true when the identity actually changed.
    pub fn set_identity(&mut self, identity: Option<Identity>) -> bool {
        if self.identity == identity {
            return false;
        }
        if identity.is_none() {
            self.tanks.clear();
            self.error = None;
            self.show_list();
            self.selection.clear();
            self.parameter_drafts.clear();
            self.water_change_drafts.clear();
            self.tank_draft.reset();
        }
        self.identity = identity;
        true
    }

    pub fn show_create_tank(&mut self) {
        self.view = View::CreateTank;
        self.tank_form.open(());
    }

    pub fn show_list(&mut self) {
        self.view = View::List;
        self.tank_form.close();
    }

    /// Cancelling keeps whatever the user typed so reopening shows it again.
    pub fn cancel_tank_form(&mut self, fields: TankDraft) {
        self.tank_draft = FormState::with_fields(fields);
        self.show_list();
    }

    pub fn toggle_tank(&mut self, tank_id: &str) -> Result<(), ShellError> {
        self.require_tank(tank_id)?;
        self.selection.toggle_tank(tank_id);
        Ok(())
    }

    pub fn toggle_parameter_form(&mut self, tank_id: &str) -> Result<(), ShellError> {
        self.require_open_tank(tank_id)?;
        self.selection.toggle_parameter_form(tank_id);
        Ok(())
    }

    pub fn toggle_water_change_form(&mut self, tank_id: &str) -> Result<(), ShellError> {
        self.require_open_tank(tank_id)?;
        self.selection.toggle_water_change_form(tank_id);
        Ok(())
    }

    pub fn cancel_parameter_form(
        &mut self,
        tank_id: &str,
        fields: ParameterDraft,
    ) -> Result<(), ShellError> {
        self.require_tank(tank_id)?;
        self.parameter_drafts
            .insert(tank_id.to_string(), FormState::with_fields(fields));
        self.selection.close_parameter_form(tank_id);
        Ok(())
    }

    pub fn cancel_water_change_form(
        &mut self,
        tank_id: &str,
        fields: WaterChangeDraft,
    ) -> Result<(), ShellError> {
        self.require_tank(tank_id)?;
        self.water_change_drafts
            .insert(tank_id.to_string(), FormState::with_fields(fields));
        self.selection.close_water_change_form(tank_id);
        Ok(())
    }

    /// Stores the posted fields and validates them. On success the caller
    /// gets the request to send and a ticket for reporting the outcome.
    pub fn prepare_parameter(
        &mut self,
        tank_id: &str,
        fields: ParameterDraft,
        now: DateTime<Utc>,
    ) -> Result<(FormTicket<String>, NewParameter), ShellError> {
        self.require_open_tank(tank_id)?;
        if !self.selection.parameter_form.is_open_for(&tank_id.to_string()) {
            self.selection.parameter_form.open(tank_id.to_string());
        }
        let validated = fields.validate(tank_id, now);
        let draft = self
            .parameter_drafts
            .entry(tank_id.to_string())
            .or_default();
        draft.fields = fields;
        draft.error = validated.as_ref().err().map(ToString::to_string);

        let request = validated?;
        let ticket = self
            .selection
            .parameter_form
            .ticket()
            .ok_or(FormError::Missing("tank"))?;
        Ok((ticket, request))
    }

    /// The record exists upstream now, so the submitted values are cleared
    /// even if the form was closed meanwhile. A form reopened since then is
    /// left as the user sees it.
    pub fn parameter_created(&mut self, ticket: &FormTicket<String>, submitted: &ParameterDraft) {
        let form = &mut self.selection.parameter_form;
        if form.is_current(ticket) {
            form.close();
        }
        if form.is_open_for(&ticket.key) {
            return;
        }
        if self
            .parameter_drafts
            .get(&ticket.key)
            .is_some_and(|draft| draft.fields == *submitted)
        {
            self.parameter_drafts.remove(&ticket.key);
        }
    }

    pub fn parameter_failed(&mut self, ticket: &FormTicket<String>, message: String) {
        if self.selection.parameter_form.is_current(ticket) {
            self.parameter_drafts.entry(ticket.key.clone()).or_default().error = Some(message);
        }
    }

    pub fn prepare_water_change(
        &mut self,
        tank_id: &str,
        fields: WaterChangeDraft,
        now: DateTime<Utc>,
    ) -> Result<(FormTicket<String>, NewWaterChange), ShellError> {
        self.require_open_tank(tank_id)?;
        if !self.selection.water_change_form.is_open_for(&tank_id.to_string()) {
            self.selection.water_change_form.open(tank_id.to_string());
        }
        let validated = fields.validate(tank_id, now);
        let draft = self
            .water_change_drafts
            .entry(tank_id.to_string())
            .or_default();
        draft.fields = fields;
        draft.error = validated.as_ref().err().map(ToString::to_string);

        let request = validated?;
        let ticket = self
            .selection
            .water_change_form
            .ticket()
            .ok_or(FormError::Missing("tank"))?;
        Ok((ticket, request))
    }

    pub fn water_change_created(
        &mut self,
        ticket: &FormTicket<String>,
        submitted: &WaterChangeDraft,
    ) {
        let form = &mut self.selection.water_change_form;
        if form.is_current(ticket) {
            form.close();
        }
        if form.is_open_for(&ticket.key) {
            return;
        }
        if self
            .water_change_drafts
            .get(&ticket.key)
            .is_some_and(|draft| draft.fields == *submitted)
        {
            self.water_change_drafts.remove(&ticket.key);
        }
    }

    pub fn water_change_failed(&mut self, ticket: &FormTicket<String>, message: String) {
        if self.selection.water_change_form.is_current(ticket) {
            self.water_change_drafts
                .entry(ticket.key.clone())
                .or_default()
                .error = Some(message);
        }
    }

    pub fn prepare_tank(
        &mut self,
        fields: TankDraft,
    ) -> Result<(FormTicket<()>, NewTank), ShellError> {
        if self.view != View::CreateTank {
            self.show_create_tank();
        }
        let validated = fields.validate();
        self.tank_draft.fields = fields;
        self.tank_draft.error = validated.as_ref().err().map(ToString::to_string);

        let request = validated?;
        let ticket = self.tank_form.ticket().ok_or(FormError::Missing("form"))?;
        Ok((ticket, request))
    }

    pub fn tank_created(&mut self, ticket: &FormTicket<()>, submitted: &TankDraft) {
        if self.tank_form.is_current(ticket) {
            self.show_list();
        }
        if self.tank_form.key().is_none() && self.tank_draft.fields == *submitted {
            self.tank_draft.reset();
        }
    }

    pub fn tank_failed(&mut self, ticket: &FormTicket<()>, message: String) {
        if self.tank_form.is_current(ticket) {
            self.tank_draft.error = Some(message);
        }
    }
}
