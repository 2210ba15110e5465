//! Application context
//!
//! [`Portal`] owns the session manager and the router and wires the form
//! flows (register, verify, login, logout) to notifications and navigation.
//! Every flow finishes its state mutation and persistence before it
//! navigates, so render hooks always observe the new state.

use crate::config::Config;
use crate::error::AuthError;
use crate::model::Account;
use crate::persistence::Store;
use crate::platform::KeyValueStore;
use crate::router::{Navigation, RenderContext, Route, Router, Severity, Shell};
use crate::session::{Session, SessionManager};

/// Registration form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct Portal<S> {
    sessions: SessionManager<S>,
    router: Router,
}

impl<S: KeyValueStore> Portal<S> {
    /// Load (or seed) state from `backend` and restore any remembered session.
    pub fn new(backend: S, config: &Config) -> Self {
        let mut sessions = SessionManager::new(Store::new(backend, config));
        sessions.restore_session();
        Self {
            sessions,
            router: Router::new(),
        }
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager<S> {
        &mut self.sessions
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    /// Route the location present at startup. An empty location is
    /// normalised to home.
    pub fn start(&mut self, location: &str, shell: &mut impl Shell) -> Navigation {
        let location = location.trim();
        if location.is_empty() || location == "#" {
            shell.set_location(Route::Home);
        }
        self.handle_location(location, shell)
    }

    /// Route a location reported by the host (startup, `hashchange`,
    /// back/forward, or the result of [`Portal::navigate`]).
    pub fn handle_location(&mut self, fragment: &str, shell: &mut impl Shell) -> Navigation {
        let sessions = &self.sessions;
        let ctx = RenderContext::new(
            sessions.session(),
            sessions.database(),
            sessions.pending_email(),
        );
        self.router.handle(fragment, &ctx, shell)
    }

    /// Programmatic navigation. The host routes once the location changes.
    pub fn navigate(&self, route: Route, shell: &mut impl Shell) {
        shell.set_location(route);
    }

    pub fn register(
        &mut self,
        form: &RegisterForm,
        shell: &mut impl Shell,
    ) -> Result<Account, AuthError> {
        match self
            .sessions
            .register(&form.first_name, &form.last_name, &form.email, &form.password)
        {
            Ok(account) => {
                shell.notify("Account created! Please verify your email.", Severity::Success);
                self.navigate(Route::VerifyEmail, shell);
                Ok(account)
            }
            Err(e) => {
                shell.notify("Email already registered!", Severity::Danger);
                Err(e)
            }
        }
    }

    /// Simulated click on the emailed verification link.
    pub fn verify_email(&mut self, shell: &mut impl Shell) -> Result<Account, AuthError> {
        match self.sessions.verify_pending() {
            Ok(account) => {
                shell.notify("Email verified successfully! You can now login.", Severity::Success);
                self.navigate(Route::Login, shell);
                Ok(account)
            }
            Err(e) => {
                let message = match e {
                    AuthError::NoPendingVerification => "No email to verify",
                    _ => "Account not found",
                };
                shell.notify(message, Severity::Danger);
                Err(e)
            }
        }
    }

    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        shell: &mut impl Shell,
    ) -> Result<Account, AuthError> {
        match self.sessions.login(email, password) {
            Ok(account) => {
                shell.notify(&format!("Welcome back, {}!", account.first_name), Severity::Success);
                self.navigate(Route::Profile, shell);
                Ok(account)
            }
            Err(e) => {
                shell.notify("Invalid credentials or email not verified", Severity::Danger);
                Err(e)
            }
        }
    }

    pub fn logout(&mut self, shell: &mut impl Shell) {
        self.sessions.logout();
        shell.notify("Logged out successfully", Severity::Info);
        self.navigate(Route::Home, shell);
    }
}

impl<S> std::fmt::Debug for Portal<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
