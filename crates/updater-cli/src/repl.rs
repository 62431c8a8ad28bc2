use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing::debug;

use updater_core::project::{ProjectFormController, SubmitOutcome};
use updater_core::session::{AuthSession, Navigator, Route};
use updater_infrastructure::load_attachments;

use crate::commands::{self, Command, HELP};
use crate::helper::CliHelper;
use crate::render::{render_admission, render_draft};
use crate::screens::{ScreenNavigator, read_credential};

enum Flow {
    Continue,
    Quit,
}

/// The operator's terminal front-end: a login screen and a guarded project
/// form screen.
pub struct Repl {
    session: Arc<AuthSession>,
    controller: ProjectFormController,
    navigator: Arc<ScreenNavigator>,
}

impl Repl {
    pub fn new(
        session: Arc<AuthSession>,
        controller: ProjectFormController,
        navigator: Arc<ScreenNavigator>,
    ) -> Self {
        Self {
            session,
            controller,
            navigator,
        }
    }

    /// The form is shown only while the session flag is set and the operator
    /// has not been sent back to login.
    fn on_form(&self) -> bool {
        self.session.is_authenticated() && self.navigator.current() == Route::Main
    }

    pub async fn run(&self) -> Result<()> {
        let mut rl = Editor::new()?;
        rl.set_helper(Some(CliHelper::new()));

        println!("{}", "=== Portfolio Updater ===".bright_magenta().bold());
        println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());
        println!();

        loop {
            let prompt = if self.on_form() { "project> " } else { "login> " };

            match rl.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match commands::parse(trimmed) {
                        Ok(command) => command,
                        Err(message) => {
                            println!("{}", message.red());
                            continue;
                        }
                    };

                    // Keep credentials out of history
                    if !matches!(command, Command::Login(_)) {
                        let _ = rl.add_history_entry(trimmed);
                    }

                    if let Flow::Quit = self.dispatch(command).await {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }

        Ok(())
    }

    async fn dispatch(&self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => println!("{HELP}"),
            Command::Login(credential) => self.login(credential).await,
            command if !self.on_form() => {
                debug!(?command, "Form command without a session");
                if self.navigator.current() == Route::Main {
                    self.navigator.navigate(Route::Login);
                }
                println!("{}", "Please log in first.".yellow());
            }
            Command::Logout => match self.session.logout().await {
                Ok(()) => println!("{}", "Logged out successfully.".bright_green()),
                Err(e) => println!("{}", format!("Logout failed: {e}. Please try again.").red()),
            },
            Command::Verify => match self.session.verify().await {
                Ok(true) => println!("{}", "Session is valid.".bright_green()),
                Ok(false) => self.expire("Session expired. Please login again."),
                Err(e) => self.expire(&format!("Session check failed: {e}")),
            },
            Command::Set(field, value) => self.controller.edit_field(field, value),
            Command::Services(raw) => {
                let count = self.controller.commit_services(&raw);
                if count == 0 {
                    println!("{}", "No services entered.".yellow());
                } else {
                    self.print_service_rows();
                }
            }
            Command::ClearServices => self.controller.clear_services(),
            Command::Detail(index, text) => {
                if let Err(e) = self.controller.edit_service_detail(index, text) {
                    println!("{}", e.to_string().red());
                }
            }
            Command::Images(paths) => match load_attachments(&paths).await {
                Ok(files) => {
                    let admission = self.controller.add_images(files);
                    let allowed = &self.controller.form().allowed_image_types;
                    for line in render_admission(&admission, allowed) {
                        println!("{}", line.bright_blue());
                    }
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::RemoveImage(index) => match self.controller.remove_image(index) {
                Ok(removed) => println!("{}", format!("Removed {}", removed.name).bright_blue()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::ClearImages => self.controller.clear_all_images(),
            Command::Show => print!(
                "{}",
                render_draft(&self.controller.draft(), self.controller.details_visible())
            ),
            Command::Submit => self.submit().await,
        }
        Flow::Continue
    }

    async fn login(&self, credential: Option<String>) {
        if self.on_form() {
            println!("{}", "Already logged in.".bright_black());
            return;
        }

        let credential = match credential {
            Some(credential) => credential,
            None => match read_credential() {
                Ok(credential) => credential,
                Err(e) => {
                    println!("{}", format!("Could not read credential: {e}").red());
                    return;
                }
            },
        };

        match self.session.login(&credential).await {
            Ok(true) => println!("{}", "Logged in.".bright_green()),
            Ok(false) => println!("{}", "Invalid credential. Please try again.".red()),
            Err(e) => println!("{}", format!("Login failed: {e}").red()),
        }
    }

    async fn submit(&self) {
        match self.controller.submit().await {
            Ok(SubmitOutcome::Success) => {
                println!("{}", "Project added successfully!".bright_green())
            }
            Ok(SubmitOutcome::ExpiredSession) => {
                self.expire("Session expired. Please login again. Your draft has been kept.")
            }
            Ok(SubmitOutcome::Cancelled) => println!("{}", "Submission cancelled.".bright_black()),
            Ok(SubmitOutcome::Incomplete { missing }) => println!(
                "{}",
                format!("Missing required fields: {}", missing.join(", ")).yellow()
            ),
            Ok(SubmitOutcome::AlreadyInFlight) => {
                println!("{}", "A submission is already in progress.".yellow())
            }
            Ok(SubmitOutcome::SubmitFailed(e)) => println!(
                "{}",
                format!("Failed to add project: {e}. Please try again.").red()
            ),
            Err(e) if e.is_token_missing() || !self.session.is_authenticated() => {
                self.expire(&format!("{e}. Please login again."));
            }
            Err(e) => println!("{}", format!("Submission aborted: {e}").red()),
        }
    }

    fn print_service_rows(&self) {
        for (i, (service, detail)) in self.controller.service_rows().iter().enumerate() {
            let detail = if detail.is_empty() { "-" } else { detail.as_str() };
            println!("{}", format!("  {}. {service}: {detail}", i + 1).bright_blue());
        }
    }

    fn expire(&self, message: &str) {
        println!("{}", message.red());
        self.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use updater_core::config::FormConfig;
    use updater_core::project::{
        Attachment, Confirmation, DraftField, ProjectApi, ProjectSubmission, TokenSource,
    };
    use updater_core::session::{IdentityApi, LoginResponse};
    use updater_core::{Result, UpdaterError};

    // Accepts every login; verify answers with whatever is set.
    struct Identity {
        verify: Mutex<Result<bool>>,
        logins: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IdentityApi for Identity {
        async fn login(&self, _credential: &str) -> Result<LoginResponse> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            Ok(LoginResponse::Accepted)
        }

        async fn logout(&self) -> Result<()> {
            Ok(())
        }

        async fn verify_token(&self) -> Result<bool> {
            self.verify.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct Projects {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ProjectApi for Projects {
        async fn add_project(&self, _submission: &ProjectSubmission, _token: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Token(Option<String>);

    impl TokenSource for Token {
        fn cookie_name(&self) -> &str {
            "auth_token"
        }

        fn bearer_token(&self) -> Option<String> {
            self.0.clone()
        }
    }

    struct Yes;

    impl Confirmation for Yes {
        fn confirm(&self, _prompt: &str) -> bool {
            true
        }
    }

    struct Fixture {
        identity: Arc<Identity>,
        projects: Arc<Projects>,
        repl: Repl,
    }

    fn fixture(verify: Result<bool>, token: Option<&str>) -> Fixture {
        let identity = Arc::new(Identity {
            verify: Mutex::new(verify),
            logins: AtomicUsize::new(0),
        });
        let projects = Arc::new(Projects::default());
        let navigator = Arc::new(ScreenNavigator::new());
        let session = Arc::new(AuthSession::new(identity.clone(), navigator.clone()));
        let controller = ProjectFormController::new(
            session.clone(),
            projects.clone(),
            Arc::new(Token(token.map(String::from))),
            Arc::new(Yes),
            FormConfig::default(),
        );
        Fixture {
            identity,
            projects,
            repl: Repl::new(session, controller, navigator),
        }
    }

    fn set(field: DraftField, value: &str) -> Command {
        Command::Set(field, value.to_string())
    }

    async fn login(repl: &Repl) {
        repl.dispatch(Command::Login(Some("s3cret".into()))).await;
    }

    async fn fill_form(repl: &Repl) {
        repl.dispatch(set(DraftField::Heading, "Certification Services")).await;
        repl.dispatch(set(DraftField::ProjectTitle, "Tank Farm Inspection")).await;
        repl.dispatch(set(DraftField::Year, "2024")).await;
        repl.dispatch(set(DraftField::Location, "Warri")).await;
        repl.controller
            .add_images([Attachment::new("front.png", "image/png", vec![1, 2, 3])]);
    }

    #[tokio::test]
    async fn test_form_commands_refused_before_login() {
        let f = fixture(Ok(true), Some("tok-1"));

        f.repl.dispatch(set(DraftField::Heading, "Too early")).await;

        assert!(f.repl.controller.draft().heading.is_empty());
        assert!(!f.repl.on_form());
    }

    #[tokio::test]
    async fn test_login_opens_form() {
        let f = fixture(Ok(true), Some("tok-1"));

        login(&f.repl).await;
        f.repl.dispatch(set(DraftField::Heading, "Certification Services")).await;

        assert!(f.repl.on_form());
        assert_eq!(f.repl.controller.draft().heading, "Certification Services");
    }

    #[tokio::test]
    async fn test_verify_fault_during_submit_returns_to_login() {
        let f = fixture(Err(UpdaterError::transport(Some(502), "bad gateway")), Some("tok-1"));
        login(&f.repl).await;
        fill_form(&f.repl).await;

        f.repl.dispatch(Command::Submit).await;

        assert!(!f.repl.session.is_authenticated());
        assert_eq!(f.repl.navigator.current(), Route::Login);
        assert_eq!(f.projects.calls.load(Ordering::SeqCst), 0);

        f.repl.dispatch(set(DraftField::Heading, "Edited without session")).await;
        assert_eq!(f.repl.controller.draft().heading, "Certification Services");

        login(&f.repl).await;
        assert_eq!(f.identity.logins.load(Ordering::SeqCst), 2);
        assert_eq!(f.repl.navigator.current(), Route::Main);
    }

    #[tokio::test]
    async fn test_expired_session_keeps_draft_and_allows_relogin() {
        let f = fixture(Ok(false), Some("tok-1"));
        login(&f.repl).await;
        fill_form(&f.repl).await;

        f.repl.dispatch(Command::Submit).await;

        assert_eq!(f.repl.navigator.current(), Route::Login);
        assert!(!f.repl.on_form());
        assert_eq!(f.repl.controller.draft().year, "2024");

        login(&f.repl).await;
        assert_eq!(f.identity.logins.load(Ordering::SeqCst), 2);
        assert!(f.repl.on_form());
    }

    #[tokio::test]
    async fn test_missing_token_sends_operator_to_login() {
        let f = fixture(Ok(true), None);
        login(&f.repl).await;
        fill_form(&f.repl).await;

        f.repl.dispatch(Command::Submit).await;

        assert!(!f.repl.on_form());
        assert_eq!(f.projects.calls.load(Ordering::SeqCst), 0);

        login(&f.repl).await;
        assert_eq!(f.identity.logins.load(Ordering::SeqCst), 2);
        assert!(f.repl.on_form());
    }

    #[tokio::test]
    async fn test_logout_closes_form() {
        let f = fixture(Ok(true), Some("tok-1"));
        login(&f.repl).await;

        f.repl.dispatch(Command::Logout).await;
        f.repl.dispatch(set(DraftField::Location, "Lagos")).await;

        assert!(!f.repl.on_form());
        assert!(f.repl.controller.draft().location.is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_stays_on_form() {
        let f = fixture(Ok(true), Some("tok-1"));
        login(&f.repl).await;
        fill_form(&f.repl).await;

        f.repl.dispatch(Command::Submit).await;

        assert_eq!(f.projects.calls.load(Ordering::SeqCst), 1);
        assert!(f.repl.on_form());
        assert!(f.repl.controller.draft().is_empty());
    }
}
