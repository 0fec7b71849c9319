//! Dependencies shared by every controller and service.

use std::sync::Arc;

use zonedash_api::{AuthApi, Navigator, PublicApi, Session, ZoneApi};

use crate::notify::Notifier;
use crate::options::ControllerOptions;
use crate::traits::ExportSink;

/// Service context - holds all dependencies
///
/// The platform layer builds this once and injects its own API client,
/// navigator and export destination.
pub struct ServiceContext {
    /// Zone and record endpoints
    pub zone_api: Arc<dyn ZoneApi>,
    /// Account endpoints
    pub auth_api: Arc<dyn AuthApi>,
    /// Endpoints usable without a session
    pub public_api: Arc<dyn PublicApi>,
    /// Process-wide bearer token
    pub session: Session,
    /// Where the user is and how to move them
    pub navigator: Arc<dyn Navigator>,
    /// Toast queue every controller reports into
    pub notifier: Notifier,
    /// Destination of exported zone files
    pub exports: Arc<dyn ExportSink>,
    pub options: ControllerOptions,
}

impl ServiceContext {
    /// Context whose three API seams are served by one client.
    pub fn from_client<C>(
        client: Arc<C>,
        session: Session,
        navigator: Arc<dyn Navigator>,
        exports: Arc<dyn ExportSink>,
        options: ControllerOptions,
    ) -> Self
    where
        C: ZoneApi + AuthApi + PublicApi + 'static,
    {
        Self {
            zone_api: client.clone(),
            auth_api: client.clone(),
            public_api: client,
            session,
            navigator,
            notifier: Notifier::new(options.toast_duration),
            exports,
            options,
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
