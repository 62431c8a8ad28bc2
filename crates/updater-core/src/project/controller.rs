use super::api::{Confirmation, ProjectApi, TokenSource};
use super::model::{Attachment, Draft, DraftField, ProjectSubmission};
use super::services::{join_services, parse_services, reconcile_details};
use crate::config::FormConfig;
use crate::error::{Result, UpdaterError};
use crate::session::AuthSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub const CONFIRM_PROMPT: &str = "Are you sure you want to add this project?";

/// Result of a [`ProjectFormController::submit`] call that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored by the backend; the draft has been reset.
    Success,
    /// The server no longer recognises the session. Nothing was sent and the
    /// draft is kept; the view should send the operator to login.
    ExpiredSession,
    /// The operator declined the confirmation prompt.
    Cancelled,
    /// Required fields are blank. Nothing was sent.
    Incomplete { missing: Vec<&'static str> },
    /// Another submission of this draft is still pending.
    AlreadyInFlight,
    /// The backend rejected or never received the submission. Draft kept
    /// for retry.
    SubmitFailed(UpdaterError),
}

/// What happened to each file offered to [`ProjectFormController::add_images`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAdmission {
    pub added: Vec<String>,
    /// Names already staged; the earlier file was kept
    pub duplicates: Vec<String>,
    /// Names whose MIME type is not an accepted image type
    pub rejected: Vec<String>,
}

#[derive(Default)]
struct FormState {
    draft: Draft,
    details_visible: bool,
}

/// Owns the draft project and drives the confirm-then-submit transaction.
///
/// All edit operations are synchronous and local. [`submit`](Self::submit) is
/// the only operation that touches the network, and it always re-verifies
/// the session first.
pub struct ProjectFormController {
    session: Arc<AuthSession>,
    projects: Arc<dyn ProjectApi>,
    tokens: Arc<dyn TokenSource>,
    confirmation: Arc<dyn Confirmation>,
    form: FormConfig,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl ProjectFormController {
    pub fn new(
        session: Arc<AuthSession>,
        projects: Arc<dyn ProjectApi>,
        tokens: Arc<dyn TokenSource>,
        confirmation: Arc<dyn Confirmation>,
        form: FormConfig,
    ) -> Self {
        Self {
            session,
            projects,
            tokens,
            confirmation,
            form,
            state: Mutex::new(FormState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    /// Snapshot of the current draft.
    pub fn draft(&self) -> Draft {
        self.state().draft.clone()
    }

    pub fn details_visible(&self) -> bool {
        self.state().details_visible
    }

    /// Form settings this controller validates against.
    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Committed services paired with their detail text.
    pub fn service_rows(&self) -> Vec<(String, String)> {
        let state = self.state();
        state
            .draft
            .services
            .iter()
            .cloned()
            .zip(state.draft.service_details.iter().cloned())
            .collect()
    }

    // ============================================================================
    // Edits
    // ============================================================================

    /// Sets a scalar field verbatim.
    pub fn edit_field(&self, field: DraftField, value: impl Into<String>) {
        *self.state().draft.field_mut(field) = value.into();
    }

    /// Stages files, skipping names already present and non-image types.
    pub fn add_images(&self, files: impl IntoIterator<Item = Attachment>) -> ImageAdmission {
        let mut admission = ImageAdmission::default();
        let mut state = self.state();

        for file in files {
            if !self.form.accepts_mime(&file.mime_type) {
                debug!(name = %file.name, mime_type = %file.mime_type, "Rejected non-image attachment");
                admission.rejected.push(file.name);
            } else if state.draft.has_image(&file.name) {
                debug!(name = %file.name, "Skipped duplicate attachment");
                admission.duplicates.push(file.name);
            } else {
                admission.added.push(file.name.clone());
                state.draft.images.push(file);
            }
        }

        admission
    }

    /// Removes the attachment at `index`; the remaining order is preserved.
    pub fn remove_image(&self, index: usize) -> Result<Attachment> {
        let mut state = self.state();
        let len = state.draft.images.len();
        if index >= len {
            return Err(UpdaterError::index_out_of_range("images", index, len));
        }
        Ok(state.draft.images.remove(index))
    }

    pub fn clear_all_images(&self) {
        self.state().draft.images.clear();
    }

    /// Commits the raw services text and resizes the detail list to match.
    ///
    /// Details are carried over by position. Text that yields no services
    /// leaves the committed pair untouched. Returns the committed count.
    pub fn commit_services(&self, raw_text: &str) -> usize {
        let delimiter = self.form.service_delimiter;
        let services = parse_services(raw_text, delimiter);
        let mut state = self.state();

        if services.is_empty() {
            debug!("Services text has no entries, commit skipped");
            return state.draft.services.len();
        }

        let details = reconcile_details(&state.draft.service_details, services.len());
        state.draft.services_text = join_services(&services, delimiter);
        state.draft.services = services;
        state.draft.service_details = details;
        state.details_visible = true;

        state.draft.services.len()
    }

    pub fn clear_services(&self) {
        let mut state = self.state();
        state.draft.services_text.clear();
        state.draft.services.clear();
        state.draft.service_details.clear();
        state.details_visible = false;
    }

    pub fn edit_service_detail(&self, index: usize, value: impl Into<String>) -> Result<()> {
        let mut state = self.state();
        let len = state.draft.service_details.len();
        let slot = state
            .draft
            .service_details
            .get_mut(index)
            .ok_or_else(|| UpdaterError::index_out_of_range("service details", index, len))?;
        *slot = value.into();
        Ok(())
    }

    // ============================================================================
    // Submission
    // ============================================================================

    /// Validates, re-verifies the session, asks for confirmation, then sends
    /// the draft.
    ///
    /// # Returns
    ///
    /// - `Ok(outcome)`: see [`SubmitOutcome`]
    /// - `Err(TransportFault)`: the session check itself failed
    /// - `Err(TokenMissing)`: no bearer cookie to authorize the request
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("Submission already in flight");
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        let missing = self.state().draft.missing_fields();
        if !missing.is_empty() {
            debug!(?missing, "Draft incomplete");
            return Ok(SubmitOutcome::Incomplete { missing });
        }

        if !self.session.verify().await? {
            info!("Session expired, submission aborted");
            return Ok(SubmitOutcome::ExpiredSession);
        }

        if !self.confirmation.confirm(CONFIRM_PROMPT) {
            debug!("Submission cancelled by operator");
            return Ok(SubmitOutcome::Cancelled);
        }

        let token = self
            .tokens
            .bearer_token()
            .ok_or_else(|| UpdaterError::token_missing(self.tokens.cookie_name()))?;

        let submission = ProjectSubmission::from(&self.state().draft);
        info!(
            title = %submission.project_title,
            services = submission.services.len(),
            images = submission.images.len(),
            "Submitting project"
        );

        match self.projects.add_project(&submission, &token).await {
            Ok(()) => {
                *self.state() = FormState::default();
                info!("Project added");
                Ok(SubmitOutcome::Success)
            }
            Err(err) => {
                warn!(error = %err, "Project submission failed, draft kept");
                Ok(SubmitOutcome::SubmitFailed(err))
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the in-flight flag for the duration of one submission.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
