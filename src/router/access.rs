//! Access control as a pure function of route name and session

use super::route::{Access, Route, classify};
use crate::session::Session;

/// Notification severity, mirroring the toast colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A message for the notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(Route, Notice),
}

pub const LOGIN_REQUIRED: &str = "Please login to access this page";
pub const ADMIN_REQUIRED: &str = "Access denied. Admin privileges required.";

/// Decide whether `name` may be opened with `session`.
pub fn check_access(name: &str, session: &Session) -> Decision {
    let access = classify(name);
    if access == Access::Public {
        return Decision::Allow;
    }
    if !session.is_authenticated() {
        return Decision::RedirectTo(Route::Login, Notice::new(LOGIN_REQUIRED, Severity::Warning));
    }
    if access == Access::AdminOnly && !session.is_admin() {
        return Decision::RedirectTo(Route::Home, Notice::new(ADMIN_REQUIRED, Severity::Danger));
    }
    Decision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, Role};
    use chrono::Utc;

    fn signed_in(role: Role) -> Session {
        Session::Authenticated(Account {
            id: 7,
            first_name: "T".to_string(),
            last_name: "U".to_string(),
            email: "t@u.v".to_string(),
            password: "p".to_string(),
            role,
            verified: true,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_public_routes_always_allowed() {
        for name in ["home", "login", "register", "verify-email", "foobar"] {
            assert_eq!(check_access(name, &Session::Anonymous), Decision::Allow);
            assert_eq!(check_access(name, &signed_in(Role::User)), Decision::Allow);
        }
    }

    #[test]
    fn test_anonymous_sent_to_login() {
        for name in ["profile", "requests", "employees", "accounts", "departments"] {
            match check_access(name, &Session::Anonymous) {
                Decision::RedirectTo(Route::Login, notice) => {
                    assert_eq!(notice.severity, Severity::Warning);
                    assert_eq!(notice.message, LOGIN_REQUIRED);
                }
                other => panic!("{name}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_user_denied_admin_routes() {
        let user = signed_in(Role::User);
        assert_eq!(check_access("profile", &user), Decision::Allow);
        assert_eq!(check_access("requests", &user), Decision::Allow);
        for name in ["employees", "accounts", "departments"] {
            assert_eq!(
                check_access(name, &user),
                Decision::RedirectTo(Route::Home, Notice::new(ADMIN_REQUIRED, Severity::Danger))
            );
        }
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let admin = signed_in(Role::Admin);
        for route in Route::ALL {
            assert_eq!(check_access(route.name(), &admin), Decision::Allow);
        }
    }
}
