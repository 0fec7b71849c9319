//! Routes of the dashboard and the unauthorized-response hook.

use std::sync::Arc;

/// Entry points of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    OAuthCallback,
    Dashboard,
    /// Detail view of one zone, by id.
    Zone(String),
    DnsChecker,
    Settings,
}

impl Route {
    /// Canonical path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::OAuthCallback => "/auth/callback".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Zone(id) => format!("/zones/{id}"),
            Self::DnsChecker => "/dns-checker".to_string(),
            Self::Settings => "/settings".to_string(),
        }
    }

    /// Inverse of [`path`](Self::path). Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Landing),
            "/login" => Some(Self::Login),
            "/signup" => Some(Self::Signup),
            "/auth/callback" => Some(Self::OAuthCallback),
            "/dashboard" => Some(Self::Dashboard),
            "/dns-checker" => Some(Self::DnsChecker),
            "/settings" => Some(Self::Settings),
            other => other
                .strip_prefix("/zones/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::Zone(id.to_string())),
        }
    }

    /// Whether the route is one of the sign-in entry points.
    pub fn is_auth_entry(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the user currently is, and how to move them elsewhere.
///
/// The CLI implements this with a terminal message; tests use a recording double.
pub trait Navigator: Send + Sync {
    /// Path of the current location.
    fn current_path(&self) -> String;

    /// Move to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that only remembers the last route. Used when no frontend is attached.
#[derive(Debug, Default)]
pub struct NullNavigator {
    current: std::sync::Mutex<Option<Route>>,
}

impl Navigator for NullNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map_or_else(|| Route::Landing.path(), Route::path)
    }

    fn navigate(&self, route: Route) {
        *self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(route);
    }
}

/// Single funnel for every unauthorized response.
#[derive(Clone)]
pub struct AuthGuard {
    session: crate::Session,
    navigator: Arc<dyn Navigator>,
}

impl AuthGuard {
    pub fn new(session: crate::Session, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Discard the token and send the user to the login page.
    ///
    /// Does nothing while the user is already on the login or signup page, so a
    /// failed sign-in attempt does not bounce back to itself.
    pub async fn on_unauthorized(&self) {
        let path = self.navigator.current_path();
        if path.contains("/login") || path.contains("/signup") {
            log::debug!("Unauthorized response on {path}, staying put");
            return;
        }

        log::warn!("Session rejected by server, redirecting to login");
        if let Err(e) = self.session.clear().await {
            log::error!("Failed to discard session token: {e}");
        }
        self.navigator.navigate(Route::Login);
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard").finish_non_exhaustive()
    }
}
