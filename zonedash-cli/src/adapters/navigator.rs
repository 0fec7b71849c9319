//! Terminal navigator
//!
//! A command has no screens; the current route only tells the unauthorized
//! hook where the user "is". Redirects are remembered so the command can tell
//! the user what to do next.

use std::sync::{Mutex, MutexGuard, PoisonError};

use zonedash_api::{Navigator, Route};

pub struct TerminalNavigator {
    current: Mutex<Route>,
    redirects: Mutex<Vec<Route>>,
}

impl TerminalNavigator {
    #[must_use]
    pub fn at(route: Route) -> Self {
        Self {
            current: Mutex::new(route),
            redirects: Mutex::new(Vec::new()),
        }
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        Self::lock(&self.current).clone()
    }

    /// Whether the session was dropped and the user sent to the login page.
    pub fn sent_to_login(&self) -> bool {
        Self::lock(&self.redirects).contains(&Route::Login)
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        Self::lock(&self.current).path()
    }

    fn navigate(&self, route: Route) {
        tracing::debug!("Navigate to {}", route.path());
        *Self::lock(&self.current) = route.clone();
        Self::lock(&self.redirects).push(route);
    }
}
