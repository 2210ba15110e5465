//! Hash-based client-side routing
//!
//! One entry point, [`Router::handle`], serves every navigation trigger:
//! programmatic navigation, back/forward/`hashchange`, and startup. It
//! resolves the route name, applies [`check_access`], and either redirects
//! through the [`Navigator`] or activates the page and runs its render hook.
//!
//! Redirects only set the location. Hosts report location changes back by
//! calling the router again, the way a browser fires `hashchange`.

pub mod access;
pub mod memory;
pub mod route;

pub use access::{Decision, Notice, Severity, check_access};
pub use memory::MemoryShell;
pub use route::{Access, Route, classify, route_name};

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::model::{Account, Database};
use crate::session::Session;

/// Displays transient feedback messages.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Changes the navigable location.
pub trait Navigator {
    fn set_location(&mut self, route: Route);
}

/// Shows and hides page containers.
pub trait PageHost {
    fn deactivate_all(&mut self);
    fn activate(&mut self, page: Route);
}

/// Everything the router drives
pub trait Shell: Notifier + Navigator + PageHost {}

impl<T: Notifier + Navigator + PageHost> Shell for T {}

/// Read-only view handed to render hooks
pub struct RenderContext<'a> {
    pub session: &'a Session,
    pub database: &'a Database,
    pub pending_email: Option<String>,
    redirect: Cell<Option<Route>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        session: &'a Session,
        database: &'a Database,
        pending_email: Option<String>,
    ) -> Self {
        Self {
            session,
            database,
            pending_email,
            redirect: Cell::new(None),
        }
    }

    pub fn current(&self) -> Option<&'a Account> {
        self.session.current()
    }

    /// Ask the router to navigate elsewhere once the hook returns.
    pub fn redirect(&self, route: Route) {
        self.redirect.set(Some(route));
    }

    fn take_redirect(&self) -> Option<Route> {
        self.redirect.take()
    }
}

pub type RenderHook = Box<dyn FnMut(&RenderContext<'_>)>;

/// Why a navigation did not land on the requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Protected or admin-only route without a session
    Unauthenticated,
    /// Admin-only route for a non-admin
    Forbidden,
    /// No page by that name
    NotFound,
}

/// Result of handling one location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Activated(Route),
    Redirected { to: Route, reason: RedirectReason },
}

/// Route table of render hooks
#[derive(Default)]
pub struct Router {
    hooks: BTreeMap<Route, RenderHook>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the render hook for `route`, replacing any previous one.
    pub fn register(&mut self, route: Route, hook: impl FnMut(&RenderContext<'_>) + 'static) {
        self.hooks.insert(route, Box::new(hook));
    }

    pub fn has_hook(&self, route: Route) -> bool {
        self.hooks.contains_key(&route)
    }

    /// Route `fragment` for the session in `ctx`.
    pub fn handle(
        &mut self,
        fragment: &str,
        ctx: &RenderContext<'_>,
        shell: &mut impl Shell,
    ) -> Navigation {
        let name = route_name(fragment);
        log::debug!("Navigating to: {}", name);

        if let Decision::RedirectTo(to, notice) = check_access(name, ctx.session) {
            let reason = if ctx.session.is_authenticated() {
                RedirectReason::Forbidden
            } else {
                RedirectReason::Unauthenticated
            };
            log::info!("Access to {} denied ({:?}), redirecting to {}", name, reason, to.name());
            shell.set_location(to);
            shell.notify(&notice.message, notice.severity);
            return Navigation::Redirected { to, reason };
        }

        let Some(route) = Route::from_name(name) else {
            log::info!("Unknown route {}, redirecting home", name);
            shell.set_location(Route::Home);
            return Navigation::Redirected {
                to: Route::Home,
                reason: RedirectReason::NotFound,
            };
        };

        shell.deactivate_all();
        shell.activate(route);

        if let Some(hook) = self.hooks.get_mut(&route) {
            hook(ctx);
            if let Some(to) = ctx.take_redirect() {
                log::debug!("Render hook for {} redirected to {}", route.name(), to.name());
                shell.set_location(to);
            }
        }

        Navigation::Activated(route)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn account(role: Role) -> Account {
        Account {
            id: 3,
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            email: "sam@x.com".to_string(),
            password: "pw".to_string(),
            role,
            verified: true,
            created_at: Utc::now(),
        }
    }

    fn dispatch(
        router: &mut Router,
        fragment: &str,
        session: &Session,
        shell: &mut MemoryShell,
    ) -> Navigation {
        let db = Database::seed(Utc::now());
        let ctx = RenderContext::new(session, &db, None);
        router.handle(fragment, &ctx, shell)
    }

    #[test]
    fn test_anonymous_admin_route_redirects_to_login() {
        let mut router = Router::new();
        let mut shell = MemoryShell::at("#/employees");
        let nav = dispatch(&mut router, "#/employees", &Session::Anonymous, &mut shell);

        assert_eq!(
            nav,
            Navigation::Redirected {
                to: Route::Login,
                reason: RedirectReason::Unauthenticated
            }
        );
        assert_eq!(shell.location(), "#/login");
        assert_eq!(shell.active(), None);
        let notice = shell.last_notice().unwrap();
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn test_user_admin_route_redirects_home() {
        let mut router = Router::new();
        let mut shell = MemoryShell::new();
        let session = Session::Authenticated(account(Role::User));
        let nav = dispatch(&mut router, "#/accounts", &session, &mut shell);

        assert_eq!(
            nav,
            Navigation::Redirected {
                to: Route::Home,
                reason: RedirectReason::Forbidden
            }
        );
        assert_eq!(shell.last_notice().unwrap().severity, Severity::Danger);
        assert_eq!(shell.active(), None);
    }

    #[test]
    fn test_unknown_route_redirects_home_quietly() {
        let mut router = Router::new();
        let mut shell = MemoryShell::at("#/foobar");
        let nav = dispatch(&mut router, "#/foobar", &Session::Anonymous, &mut shell);

        assert_eq!(
            nav,
            Navigation::Redirected {
                to: Route::Home,
                reason: RedirectReason::NotFound
            }
        );
        assert_eq!(shell.location(), "#/");
        assert!(shell.notices().is_empty());
    }

    #[test]
    fn test_empty_fragment_is_home() {
        let mut router = Router::new();
        let mut shell = MemoryShell::new();
        let nav = dispatch(&mut router, "", &Session::Anonymous, &mut shell);
        assert_eq!(nav, Navigation::Activated(Route::Home));
        assert_eq!(shell.active(), Some(Route::Home));
    }

    #[test]
    fn test_render_hook_runs_after_activation() {
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let mut router = Router::new();
        {
            let rendered = rendered.clone();
            router.register(Route::Profile, move |ctx| {
                let name = ctx.current().map(|a| a.first_name.clone());
                rendered.borrow_mut().push(name);
            });
        }
        assert!(router.has_hook(Route::Profile));
        assert!(!router.has_hook(Route::Login));

        let session = Session::Authenticated(account(Role::User));
        let mut shell = MemoryShell::new();

        // No hook registered: page is only activated
        assert_eq!(
            dispatch(&mut router, "#/login", &session, &mut shell),
            Navigation::Activated(Route::Login)
        );
        assert!(rendered.borrow().is_empty());

        assert_eq!(
            dispatch(&mut router, "#/profile", &session, &mut shell),
            Navigation::Activated(Route::Profile)
        );
        assert_eq!(shell.active(), Some(Route::Profile));
        assert_eq!(*rendered.borrow(), vec![Some("Sam".to_string())]);
    }

    #[test]
    fn test_render_hook_redirect() {
        let mut router = Router::new();
        router.register(Route::VerifyEmail, |ctx| {
            if ctx.pending_email.is_none() {
                ctx.redirect(Route::Home);
            }
        });
        let mut shell = MemoryShell::at("#/verify-email");
        let nav = dispatch(&mut router, "#/verify-email", &Session::Anonymous, &mut shell);

        assert_eq!(nav, Navigation::Activated(Route::VerifyEmail));
        assert_eq!(shell.take_location_change().as_deref(), Some("#/"));
    }

    #[test]
    fn test_admin_reaches_admin_pages() {
        let mut router = Router::new();
        let session = Session::Authenticated(account(Role::Admin));
        for target in [Route::Employees, Route::Accounts, Route::Departments] {
            let mut shell = MemoryShell::new();
            let nav = dispatch(&mut router, &target.fragment(), &session, &mut shell);
            assert_eq!(nav, Navigation::Activated(target));
            assert_eq!(shell.active(), Some(target));
        }
    }
}
