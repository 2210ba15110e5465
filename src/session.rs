//! Authentication state
//!
//! Two states, [`Session::Anonymous`] and [`Session::Authenticated`]. The
//! session itself is never persisted; it is rebuilt at startup from the
//! remembered identity token. Every mutation of the [`Database`] is written
//! through to the store before the call returns.

use chrono::Utc;

use crate::error::AuthError;
use crate::model::{Account, Database, Role, normalize_email};
use crate::persistence::Store;
use crate::platform::KeyValueStore;

/// Current identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Account),
}

impl Session {
    pub fn current(&self) -> Option<&Account> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(account) => Some(account),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.current().is_some_and(Account::is_admin)
    }
}

/// Owns the in-memory database, its store, and the session.
#[derive(Debug)]
pub struct SessionManager<S> {
    store: Store<S>,
    db: Database,
    session: Session,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Load (or seed) the database. The session starts anonymous; call
    /// [`SessionManager::restore_session`] to pick up a remembered identity.
    pub fn new(mut store: Store<S>) -> Self {
        let db = store.load();
        Self {
            store,
            db,
            session: Session::Anonymous,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current(&self) -> Option<&Account> {
        self.session.current()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<S> {
        &mut self.store
    }

    /// Email set by the last registration and not yet verified.
    pub fn pending_email(&self) -> Option<String> {
        self.store.pending_verification()
    }

    /// Create an unverified user account. Never signs the user in.
    pub fn register(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let email = normalize_email(email);
        if self.db.find_account(&email).is_some() {
            log::info!("Registration rejected, {} already exists", email);
            return Err(AuthError::DuplicateEmail);
        }

        let account = Account {
            id: self.db.next_account_id(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.clone(),
            password: password.to_string(),
            role: Role::User,
            verified: false,
            created_at: Utc::now(),
        };
        self.db.accounts.push(account.clone());
        self.store.save(&self.db);
        self.store.set_pending_verification(&email);

        log::info!("Registered account {} ({})", account.id, email);
        Ok(account)
    }

    /// Mark the pending registration's account as verified.
    pub fn verify_pending(&mut self) -> Result<Account, AuthError> {
        let email = self
            .store
            .pending_verification()
            .ok_or(AuthError::NoPendingVerification)?;

        let account = self
            .db
            .find_account_mut(&email)
            .ok_or(AuthError::AccountNotFound)?;
        account.verified = true;
        let account = account.clone();

        self.store.save(&self.db);
        self.store.clear_pending_verification();

        log::info!("Verified {}", email);
        Ok(account)
    }

    /// Authenticate with email and password.
    ///
    /// The error is the same whether the email is unknown, the password is
    /// wrong or the account is unverified.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = normalize_email(email);
        let account = self
            .db
            .find_account(&email)
            .filter(|a| a.password == password && a.verified)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        self.store.remember_identity(&account.email);
        log::info!("Signed in as {}", account.email);
        self.session = Session::Authenticated(account.clone());
        Ok(account)
    }

    pub fn logout(&mut self) {
        self.store.forget_identity();
        if let Session::Authenticated(account) = &self.session {
            log::info!("Signed out {}", account.email);
        }
        self.session = Session::Anonymous;
    }

    /// Rebuild the session from the remembered identity token.
    ///
    /// A token pointing at a missing or unverified account is discarded.
    pub fn restore_session(&mut self) {
        let Some(email) = self.store.remembered_identity() else {
            return;
        };

        match self.db.find_account(&email).filter(|a| a.verified) {
            Some(account) => {
                log::info!("Restored session for {}", account.email);
                self.session = Session::Authenticated(account.clone());
            }
            None => {
                log::info!("Discarding stale auth token for {}", email);
                self.store.forget_identity();
                self.session = Session::Anonymous;
            }
        }
    }
}
