//! Headless shell for native runs and tests

use super::{Navigator, Notice, Notifier, PageHost, Route, Severity};

/// Records location, active page and notices in memory.
///
/// Setting the location to its current value is not reported as a change,
/// matching how browsers only fire `hashchange` on an actual change.
#[derive(Debug, Clone, Default)]
pub struct MemoryShell {
    location: String,
    changed: bool,
    active: Option<Route>,
    notices: Vec<Notice>,
}

impl MemoryShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shell whose location starts at `fragment`.
    pub fn at(fragment: &str) -> Self {
        Self {
            location: fragment.to_string(),
            ..Self::default()
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Type a location, as a user would in the address bar.
    pub fn visit(&mut self, fragment: &str) {
        if fragment != self.location {
            self.location = fragment.to_string();
            self.changed = true;
        }
    }

    /// New location, if it changed since the last call.
    pub fn take_location_change(&mut self) -> Option<String> {
        std::mem::take(&mut self.changed).then(|| self.location.clone())
    }

    pub fn active(&self) -> Option<Route> {
        self.active
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Navigator for MemoryShell {
    fn set_location(&mut self, route: Route) {
        let fragment = route.fragment();
        self.visit(&fragment);
    }
}

impl PageHost for MemoryShell {
    fn deactivate_all(&mut self) {
        self.active = None;
    }

    fn activate(&mut self, page: Route) {
        self.active = Some(page);
    }
}

impl Notifier for MemoryShell {
    fn notify(&mut self, message: &str, severity: Severity) {
        log::debug!("[{}] {}", severity.as_str(), message);
        self.notices.push(Notice::new(message, severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_changes_only_when_different() {
        let mut shell = MemoryShell::at("#/");
        shell.set_location(Route::Home);
        assert_eq!(shell.take_location_change(), None);

        shell.set_location(Route::Login);
        assert_eq!(shell.take_location_change().as_deref(), Some("#/login"));
        assert_eq!(shell.take_location_change(), None);

        shell.visit("#/profile");
        assert_eq!(shell.location(), "#/profile");
        assert_eq!(shell.take_location_change().as_deref(), Some("#/profile"));
    }

    #[test]
    fn test_notices_are_recorded() {
        let mut shell = MemoryShell::new();
        shell.notify("hello", Severity::Info);
        assert_eq!(shell.last_notice(), Some(&Notice::new("hello", Severity::Info)));
        assert_eq!(shell.take_notices().len(), 1);
        assert!(shell.notices().is_empty());
    }
}
