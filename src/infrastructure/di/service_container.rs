//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CampaignService;
use crate::config::Settings;
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::session_guard::SessionGuard;
use crate::infrastructure::traits::{HttpTransport, SessionRedirect};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Backend transport, already wrapped in the session guard
    pub api: Arc<dyn HttpTransport>,

    pub campaigns: CampaignService,
}

impl ServiceContainer {
    /// Create a new service container talking to the configured backend.
    pub fn new(settings: Settings, redirect: Arc<dyn SessionRedirect>) -> InfraResult<Self> {
        let transport = Arc::new(ReqwestTransport::from_settings(&settings)?);
        Ok(Self::with_deps(settings, transport, redirect))
    }

    /// Create a service container with a custom transport (for testing).
    ///
    /// The session guard is always layered on top of `transport`.
    pub fn with_deps(
        settings: Settings,
        transport: Arc<dyn HttpTransport>,
        redirect: Arc<dyn SessionRedirect>,
    ) -> Self {
        let api: Arc<dyn HttpTransport> =
            Arc::new(SessionGuard::from_settings(transport, redirect, &settings));
        let campaigns = CampaignService::new(api.clone());

        Self {
            settings: Arc::new(settings),
            api,
            campaigns,
        }
    }
}
