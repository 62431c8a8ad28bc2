//! Hand-written test doubles for the core's seams.

use crate::error::Result;
use crate::project::{Confirmation, ProjectApi, ProjectSubmission, TokenSource};
use crate::session::{IdentityApi, LoginResponse, Navigator, Route};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// Mock identity endpoint. Verify answers are queued; an empty queue answers `true`.
pub struct MockIdentity {
    login: Mutex<Result<LoginResponse>>,
    logout: Mutex<Result<()>>,
    verify: Mutex<VecDeque<Result<bool>>>,
    credentials: Mutex<Vec<String>>,
    verify_calls: AtomicUsize,
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self {
            login: Mutex::new(Ok(LoginResponse::Accepted)),
            logout: Mutex::new(Ok(())),
            verify: Mutex::new(VecDeque::new()),
            credentials: Mutex::new(Vec::new()),
            verify_calls: AtomicUsize::new(0),
        }
    }
}

impl MockIdentity {
    pub fn set_login(&self, result: Result<LoginResponse>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn set_logout(&self, result: Result<()>) {
        *self.logout.lock().unwrap() = result;
    }

    pub fn push_verify(&self, result: Result<bool>) {
        self.verify.lock().unwrap().push_back(result);
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityApi for MockIdentity {
    async fn login(&self, credential: &str) -> Result<LoginResponse> {
        self.credentials.lock().unwrap().push(credential.to_string());
        self.login.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<()> {
        self.logout.lock().unwrap().clone()
    }

    async fn verify_token(&self) -> Result<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify.lock().unwrap().pop_front().unwrap_or(Ok(true))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

// Mock catalog endpoint. With a gate set, each call parks until notified.
pub struct MockProjects {
    submissions: Mutex<Vec<(ProjectSubmission, String)>>,
    result: Mutex<Result<()>>,
    gate: Option<Arc<Notify>>,
}

impl Default for MockProjects {
    fn default() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            result: Mutex::new(Ok(())),
            gate: None,
        }
    }
}

impl MockProjects {
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn set_result(&self, result: Result<()>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<(ProjectSubmission, String)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProjectApi for MockProjects {
    async fn add_project(&self, submission: &ProjectSubmission, bearer_token: &str) -> Result<()> {
        self.submissions
            .lock()
            .unwrap()
            .push((submission.clone(), bearer_token.to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.lock().unwrap().clone()
    }
}

pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn cookie_name(&self) -> &str {
        "auth_token"
    }

    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

pub struct ScriptedConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
