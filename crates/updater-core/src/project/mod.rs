//! Project draft module.
//!
//! # Module Structure
//!
//! - `model`: Draft, attachments and the submission snapshot
//! - `services`: Services text parsing and detail reconciliation
//! - `api`: Catalog, token and confirmation seams
//! - `controller`: The `ProjectFormController`

mod api;
mod controller;
mod model;
pub mod services;

pub use api::{Confirmation, ProjectApi, TokenSource};
pub use controller::{CONFIRM_PROMPT, ImageAdmission, ProjectFormController, SubmitOutcome};
pub use model::{Attachment, Draft, DraftField, ProjectSubmission};
