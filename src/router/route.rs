//! Route names and their access classes

/// Who may open a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    /// Any signed-in account
    Protected,
    /// Signed-in admins only
    AdminOnly,
}

/// Known pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    Home,
    Login,
    Register,
    VerifyEmail,
    Profile,
    Requests,
    Employees,
    Accounts,
    Departments,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::VerifyEmail,
        Route::Profile,
        Route::Requests,
        Route::Employees,
        Route::Accounts,
        Route::Departments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Login => "login",
            Route::Register => "register",
            Route::VerifyEmail => "verify-email",
            Route::Profile => "profile",
            Route::Requests => "requests",
            Route::Employees => "employees",
            Route::Accounts => "accounts",
            Route::Departments => "departments",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Profile | Route::Requests => Access::Protected,
            Route::Employees | Route::Accounts | Route::Departments => Access::AdminOnly,
            _ => Access::Public,
        }
    }

    /// Location fragment that navigates here
    pub fn fragment(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            route => format!("#/{}", route.name()),
        }
    }

    /// DOM id of the page container
    pub fn page_id(&self) -> String {
        format!("{}-page", self.name())
    }
}

/// Route name encoded in a location fragment.
///
/// Drops a leading `#`, then a single leading `/`. Empty maps to `home`.
pub fn route_name(fragment: &str) -> &str {
    let path = fragment.strip_prefix('#').unwrap_or(fragment);
    let name = path.strip_prefix('/').unwrap_or(path);
    if name.is_empty() { Route::Home.name() } else { name }
}

/// Access class of an arbitrary route name. Unknown names are public.
pub fn classify(name: &str) -> Access {
    Route::from_name(name).map_or(Access::Public, |r| r.access())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_name_parsing() {
        assert_eq!(route_name(""), "home");
        assert_eq!(route_name("#"), "home");
        assert_eq!(route_name("#/"), "home");
        assert_eq!(route_name("#/login"), "login");
        assert_eq!(route_name("/verify-email"), "verify-email");
        assert_eq!(route_name("profile"), "profile");
        // Only one separator is stripped
        assert_eq!(route_name("#//profile"), "/profile");
    }

    #[test]
    fn test_names_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_name(route.name()), Some(route));
            assert_eq!(Route::from_name(route_name(&route.fragment())), Some(route));
        }
        assert_eq!(Route::from_name("foobar"), None);
        assert_eq!(Route::from_name("Home"), None);
    }

    #[test]
    fn test_access_classes() {
        assert_eq!(classify("home"), Access::Public);
        assert_eq!(classify("verify-email"), Access::Public);
        assert_eq!(classify("profile"), Access::Protected);
        assert_eq!(classify("requests"), Access::Protected);
        assert_eq!(classify("employees"), Access::AdminOnly);
        assert_eq!(classify("accounts"), Access::AdminOnly);
        assert_eq!(classify("departments"), Access::AdminOnly);
        assert_eq!(classify("foobar"), Access::Public);
    }

    #[test]
    fn test_page_ids() {
        assert_eq!(Route::VerifyEmail.page_id(), "verify-email-page");
        assert_eq!(Route::Home.fragment(), "#/");
        assert_eq!(Route::Accounts.fragment(), "#/accounts");
    }
}
