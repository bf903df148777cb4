//! Personnel register controller
//!
//! Holds the last fetched register, derives the searched and sorted
//! projection, and runs the two edit workflows:
//!
//! - add: `Idle → Staged → Submitting → Idle`
//! - delete: `Idle → PendingConfirm → Submitting → Idle`
//!
//! Only one workflow can be active. Every mutation computes the complete new
//! register and submits it as a whole; the gateway never sees a delta.

use medtrack_config::{Config, GatewayFailurePolicy, SortMode};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::gateway::{GatewayError, GatewayRef};
use crate::models::PersonnelRecord;
use crate::notify::{Notification, NotificationStyle, NotifierRef};
use crate::projection::{
    project_personnel, with_candidate, without_first_named, LoadState, LoadStatus,
};
use crate::view::{delete_prompt, Draft, PersonnelFlags, PersonnelViewModel};

const VIEW: &str = "personnel";

/// Pending mutation of the register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    Add(PersonnelRecord),
    Delete(PersonnelRecord),
}

impl Submission {
    fn record(&self) -> &PersonnelRecord {
        match self {
            Submission::Add(record) | Submission::Delete(record) => record,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Submission::Add(_) => "add",
            Submission::Delete(_) => "delete",
        }
    }

    fn success_message(&self) -> String {
        match self {
            Submission::Add(_) => "Personnel successfully added.".to_string(),
            Submission::Delete(record) => format!("{} was successfully deleted.", record.name),
        }
    }

    fn failure_message(&self) -> String {
        match self {
            Submission::Add(record) => format!("Could not add {}.", record.name),
            Submission::Delete(record) => format!("Could not delete {}.", record.name),
        }
    }

    /// Edit state to return to when a failed submission is kept for retry
    fn retry_state(&self) -> EditState {
        match self {
            Submission::Add(record) => EditState::Staged(record.clone()),
            Submission::Delete(record) => EditState::PendingConfirm(record.clone()),
        }
    }
}

/// Edit workflow state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditState {
    Idle,
    /// Candidate confirmed by the user, inputs locked, not yet submitted
    Staged(PersonnelRecord),
    /// Record waiting for the delete confirmation
    PendingConfirm(PersonnelRecord),
    Submitting(Submission),
}

impl Default for EditState {
    fn default() -> Self {
        EditState::Idle
    }
}

impl EditState {
    fn workflow(&self) -> &'static str {
        match self {
            EditState::Idle => "nothing",
            EditState::Staged(_) | EditState::Submitting(Submission::Add(_)) => {
                "adding personnel"
            }
            EditState::PendingConfirm(_) | EditState::Submitting(Submission::Delete(_)) => {
                "deleting personnel"
            }
        }
    }
}

/// How a submission ended when the controller did not return an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The gateway accepted the new register
    Confirmed,
    /// The gateway failed; state was cleared anyway under the `clear` policy
    Unconfirmed { error: String },
}

/// Behaviour switches of the personnel controller
#[derive(Debug, Clone)]
pub struct PersonnelOptions {
    pub sort_mode: SortMode,
    pub on_gateway_failure: GatewayFailurePolicy,
    pub refetch_after_mutation: bool,
    /// How long add/delete notifications stay up
    pub notification_duration: Duration,
}

impl Default for PersonnelOptions {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            on_gateway_failure: GatewayFailurePolicy::default(),
            refetch_after_mutation: true,
            notification_duration: Duration::from_millis(3000),
        }
    }
}

impl PersonnelOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sort_mode: config.views.personnel_sort,
            on_gateway_failure: config.mutations.on_gateway_failure,
            refetch_after_mutation: config.mutations.refetch_after_mutation,
            notification_duration: Duration::from_millis(config.notifications.duration_ms),
        }
    }
}

#[derive(Debug, Default)]
struct PersonnelState {
    data: LoadState<PersonnelRecord>,
    search_term: String,
    sort_mode: SortMode,
    edit: EditState,
    draft: Draft,
    add_dialog_open: bool,
    removal_layout: bool,
    detached: bool,
}

impl PersonnelState {
    /// Reset every add/delete flag after a finished or abandoned submission
    fn clear_edits(&mut self) {
        self.edit = EditState::Idle;
        self.draft = Draft::default();
        self.add_dialog_open = false;
        self.removal_layout = false;
    }

    fn ensure_attached(&self) -> CoreResult<()> {
        if self.detached {
            Err(CoreError::Detached)
        } else {
            Ok(())
        }
    }
}

/// Controller behind the personnel register view
pub struct PersonnelView {
    gateway: GatewayRef,
    notifier: NotifierRef,
    error_logger: Arc<dyn ErrorLogger>,
    options: PersonnelOptions,
    state: RwLock<PersonnelState>,
}

impl PersonnelView {
    pub fn new(gateway: GatewayRef, notifier: NotifierRef, options: PersonnelOptions) -> Self {
        let state = PersonnelState {
            sort_mode: options.sort_mode,
            ..Default::default()
        };
        Self {
            gateway,
            notifier,
            error_logger: Arc::new(DefaultErrorLogger),
            options,
            state: RwLock::new(state),
        }
    }

    pub fn from_config(gateway: GatewayRef, notifier: NotifierRef, config: &Config) -> Self {
        Self::new(gateway, notifier, PersonnelOptions::from_config(config))
    }

    /// Replace the logger used for swallowed gateway failures
    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.error_logger = logger;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, PersonnelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PersonnelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Dataset ====================

    /// Fetch the register and replace the stored dataset
    pub async fn load(&self) -> CoreResult<Vec<PersonnelRecord>> {
        self.read().ensure_attached()?;

        let result = self.gateway.fetch_personnel().await;

        let mut state = self.write();
        if state.detached {
            log::debug!(
                target: "medtrack::personnel",
                "Discarding fetch result for detached view"
            );
            return Err(CoreError::Detached);
        }
        match result {
            Ok(payload) => {
                log::info!(
                    target: "medtrack::personnel",
                    "Loaded {} personnel",
                    payload.personnel.len()
                );
                state.data = LoadState::Ready(payload.personnel.clone());
                Ok(payload.personnel)
            }
            Err(err) => {
                log::warn!(target: "medtrack::personnel", "Failed to fetch personnel: {}", err);
                state.data = LoadState::Failed(err.to_string());
                Err(CoreError::LoadFailed {
                    message: err.to_string(),
                })
            }
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.read().data.status()
    }

    /// The last fetched register, unfiltered and in fetched order
    pub fn records(&self) -> CoreResult<Vec<PersonnelRecord>> {
        Ok(self.read().data.records()?.to_vec())
    }

    // ==================== Projection ====================

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.write().search_term = term.into();
    }

    pub fn search_term(&self) -> String {
        self.read().search_term.clone()
    }

    pub fn set_sort_mode(&self, mode: SortMode) {
        self.write().sort_mode = mode;
    }

    pub fn sort_mode(&self) -> SortMode {
        self.read().sort_mode
    }

    /// Filtered then sorted register
    pub fn projection(&self) -> CoreResult<Vec<PersonnelRecord>> {
        let state = self.read();
        let records = state.data.records()?;
        Ok(project_personnel(records, &state.search_term, state.sort_mode))
    }

    pub fn edit_state(&self) -> EditState {
        self.read().edit.clone()
    }

    pub fn flags(&self) -> PersonnelFlags {
        let state = self.read();
        PersonnelFlags {
            removal_layout: state.removal_layout,
            add_dialog_open: state.add_dialog_open,
            inputs_locked: matches!(
                state.edit,
                EditState::Staged(_) | EditState::Submitting(Submission::Add(_))
            ),
            add_enabled: matches!(state.edit, EditState::Staged(_)),
            delete_prompt: match &state.edit {
                EditState::PendingConfirm(record) => Some(delete_prompt(&record.name)),
                _ => None,
            },
            submitting: matches!(state.edit, EditState::Submitting(_)),
        }
    }

    pub fn view_model(&self) -> CoreResult<PersonnelViewModel> {
        let rows = self.projection()?;
        let flags = self.flags();
        let state = self.read();
        Ok(PersonnelViewModel {
            search_term: state.search_term.clone(),
            sort_mode: state.sort_mode,
            rows,
            draft: state.draft.clone(),
            flags,
        })
    }

    // ==================== Add workflow ====================

    pub fn open_add_dialog(&self) {
        self.write().add_dialog_open = true;
    }

    pub fn draft(&self) -> Draft {
        self.read().draft.clone()
    }

    pub fn set_draft_name(&self, name: impl Into<String>) -> CoreResult<()> {
        let mut state = self.write();
        Self::ensure_inputs_editable(&state.edit)?;
        state.draft.name = name.into();
        Ok(())
    }

    pub fn set_draft_affiliation(&self, affiliation: impl Into<String>) -> CoreResult<()> {
        let mut state = self.write();
        Self::ensure_inputs_editable(&state.edit)?;
        state.draft.affiliation = affiliation.into();
        Ok(())
    }

    fn ensure_inputs_editable(edit: &EditState) -> CoreResult<()> {
        match edit {
            EditState::Staged(_) => Err(CoreError::InputsLocked),
            EditState::Submitting(_) => Err(CoreError::Busy),
            EditState::Idle | EditState::PendingConfirm(_) => Ok(()),
        }
    }

    /// Stage the current contents of the draft inputs
    pub fn stage_draft(&self) -> CoreResult<PersonnelRecord> {
        let draft = self.draft();
        self.stage_candidate(&draft.name, &draft.affiliation)
    }

    /// Validate and stage one candidate, locking the inputs until it is
    /// submitted or cancelled
    pub fn stage_candidate(&self, name: &str, affiliation: &str) -> CoreResult<PersonnelRecord> {
        let mut state = self.write();
        match &state.edit {
            EditState::Idle => {}
            EditState::Staged(_) => return Err(CoreError::InputsLocked),
            EditState::Submitting(_) => return Err(CoreError::Busy),
            EditState::PendingConfirm(_) => {
                return Err(CoreError::WorkflowConflict {
                    requested: "adding personnel".to_string(),
                    active: state.edit.workflow().to_string(),
                })
            }
        }

        if name.trim().is_empty() || affiliation.trim().is_empty() {
            return Err(CoreError::incomplete_input());
        }

        let candidate = PersonnelRecord::new(name, affiliation);
        log::debug!(target: "medtrack::personnel", "Staged candidate {}", candidate.name);
        state.draft = Draft {
            name: candidate.name.clone(),
            affiliation: candidate.affiliation.clone(),
        };
        state.edit = EditState::Staged(candidate.clone());
        Ok(candidate)
    }

    /// Submit the register with the staged candidate appended
    pub async fn confirm_and_submit(&self) -> CoreResult<MutationOutcome> {
        let (submission, next) = {
            let mut state = self.write();
            state.ensure_attached()?;
            let candidate = match &state.edit {
                EditState::Staged(candidate) => candidate.clone(),
                EditState::Submitting(_) => return Err(CoreError::Busy),
                EditState::Idle | EditState::PendingConfirm(_) => {
                    return Err(CoreError::unconfirmed_candidate())
                }
            };
            let next = with_candidate(state.data.records()?, &candidate);
            let submission = Submission::Add(candidate);
            state.edit = EditState::Submitting(submission.clone());
            (submission, next)
        };

        self.submit(submission, next).await
    }

    /// Drop the staged candidate and close the dialog without submitting
    pub fn cancel_add(&self) -> CoreResult<()> {
        let mut state = self.write();
        match &state.edit {
            EditState::Submitting(_) => return Err(CoreError::Busy),
            EditState::Staged(_) => state.edit = EditState::Idle,
            EditState::Idle | EditState::PendingConfirm(_) => {}
        }
        state.draft = Draft::default();
        state.add_dialog_open = false;
        Ok(())
    }

    // ==================== Delete workflow ====================

    /// Show or hide the per-row delete buttons
    pub fn toggle_removal_layout(&self) -> bool {
        let mut state = self.write();
        state.removal_layout = !state.removal_layout;
        state.removal_layout
    }

    /// Mark `record` for deletion and open the confirmation dialog
    pub fn select_for_deletion(&self, record: PersonnelRecord) -> CoreResult<()> {
        let mut state = self.write();
        match &state.edit {
            EditState::Idle | EditState::PendingConfirm(_) => {}
            EditState::Submitting(_) => return Err(CoreError::Busy),
            EditState::Staged(_) => {
                return Err(CoreError::WorkflowConflict {
                    requested: "deleting personnel".to_string(),
                    active: state.edit.workflow().to_string(),
                })
            }
        }
        log::debug!(target: "medtrack::personnel", "Selected {} for deletion", record.name);
        state.edit = EditState::PendingConfirm(record);
        Ok(())
    }

    /// Submit the register without the first entry named like the selection
    pub async fn confirm_delete(&self) -> CoreResult<MutationOutcome> {
        let (submission, next) = {
            let mut state = self.write();
            state.ensure_attached()?;
            let selected = match &state.edit {
                EditState::PendingConfirm(record) => record.clone(),
                EditState::Submitting(_) => return Err(CoreError::Busy),
                EditState::Idle | EditState::Staged(_) => return Err(CoreError::NoSelection),
            };
            let current = state.data.records()?;
            if !current.iter().any(|p| p.name == selected.name) {
                log::warn!(
                    target: "medtrack::personnel",
                    "{} is not in the register; submitting it unchanged",
                    selected.name
                );
            }
            let next = without_first_named(current, &selected.name);
            let submission = Submission::Delete(selected);
            state.edit = EditState::Submitting(submission.clone());
            (submission, next)
        };

        self.submit(submission, next).await
    }

    /// Close the confirmation dialog without submitting
    pub fn cancel_delete(&self) -> CoreResult<()> {
        let mut state = self.write();
        match &state.edit {
            EditState::Submitting(_) => Err(CoreError::Busy),
            EditState::PendingConfirm(_) => {
                state.edit = EditState::Idle;
                Ok(())
            }
            EditState::Idle | EditState::Staged(_) => Ok(()),
        }
    }

    // ==================== Submission pipeline ====================

    /// Submit `next`, then notify and reset according to the outcome.
    ///
    /// The caller has already moved the edit state to `Submitting`.
    async fn submit(
        &self,
        submission: Submission,
        next: Vec<PersonnelRecord>,
    ) -> CoreResult<MutationOutcome> {
        log::info!(
            target: "medtrack::personnel",
            "Submitting register of {} personnel ({} {})",
            next.len(),
            submission.kind(),
            submission.record().name
        );

        let result = match self.gateway.submit_personnel(next.clone()).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(GatewayError::Rejected {
                status: response.status,
            }),
            Err(err) => Err(err),
        };

        if self.read().detached {
            log::debug!(
                target: "medtrack::personnel",
                "Discarding submit result for detached view"
            );
            return Err(CoreError::Detached);
        }

        match result {
            Ok(()) => {
                self.send(submission.success_message(), NotificationStyle::Success);
                {
                    let mut state = self.write();
                    state.data = LoadState::Ready(next);
                    state.clear_edits();
                }
                if self.options.refetch_after_mutation {
                    self.refetch_after_mutation().await;
                }
                Ok(MutationOutcome::Confirmed)
            }
            Err(err) => self.handle_failed_submit(submission, err),
        }
    }

    fn handle_failed_submit(
        &self,
        submission: Submission,
        err: GatewayError,
    ) -> CoreResult<MutationOutcome> {
        let context = ErrorContext::new(VIEW, "submit_personnel")
            .with_data("record", serde_json::json!(submission.record().name))
            .with_data(
                "policy",
                serde_json::json!(self.options.on_gateway_failure.to_string()),
            );

        match self.options.on_gateway_failure {
            GatewayFailurePolicy::Clear => {
                self.error_logger
                    .log_warning(&format!("Submit failed, clearing anyway: {}", err), &context);
                self.send(submission.success_message(), NotificationStyle::Success);
                self.write().clear_edits();
                Ok(MutationOutcome::Unconfirmed {
                    error: err.to_string(),
                })
            }
            GatewayFailurePolicy::Retain => {
                let error = CoreError::Gateway(err);
                self.error_logger.log_error(&error, &context);
                self.send(submission.failure_message(), NotificationStyle::Warning);
                self.write().edit = submission.retry_state();
                Err(error)
            }
        }
    }

    fn send(&self, message: String, style: NotificationStyle) {
        self.notifier.notify(Notification {
            message,
            style,
            duration: self.options.notification_duration,
        });
    }

    async fn refetch_after_mutation(&self) {
        match self.gateway.fetch_personnel().await {
            Ok(payload) => {
                let mut state = self.write();
                if !state.detached {
                    state.data = LoadState::Ready(payload.personnel);
                }
            }
            Err(err) => {
                log::warn!(
                    target: "medtrack::personnel",
                    "Refetch after mutation failed, keeping submitted register: {}",
                    err
                );
            }
        }
    }

    /// Stop applying gateway results; the view has gone away
    pub fn detach(&self) {
        self.write().detached = true;
    }
}
