//! Command implementations.
//!
//! Each command builds an [`App`] positioned at the route the dashboard would
//! show, drives one controller or service, and returns the [`Outcome`].

pub mod auth;
pub mod check;
pub mod records;
pub mod stats;
pub mod zones;

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use zonedash_api::{ApiClient, Route, Session};
use zonedash_core::controllers::{PendingAction, ZoneDetailController};
use zonedash_core::notify::ConfirmRequest;
use zonedash_core::{ControllerOptions, CoreError, ExportSink, Outcome, ServiceContext};

use crate::adapters::{DirectoryExportSink, FileTokenStore, TerminalNavigator};
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::print_toasts;

/// Everything one invocation needs.
pub struct App {
    pub ctx: Arc<ServiceContext>,
    pub navigator: Arc<TerminalNavigator>,
    pub json: bool,
    pub assume_yes: bool,
}

impl App {
    /// Restore the session and wire the client, starting at `route`.
    pub async fn connect(settings: &Settings, global: &GlobalOptions, route: Route) -> Result<Self> {
        Self::connect_with(
            settings,
            global,
            route,
            ControllerOptions::default(),
            Arc::new(DirectoryExportSink::new(".")),
        )
        .await
    }

    pub async fn connect_with(
        settings: &Settings,
        global: &GlobalOptions,
        route: Route,
        options: ControllerOptions,
        exports: Arc<dyn ExportSink>,
    ) -> Result<Self> {
        let store = FileTokenStore::new(&settings.token_path);
        let token_path = store.path().display().to_string();
        let session = Session::new(Arc::new(store));
        match session.restore().await {
            Ok(true) => tracing::debug!("Restored session from {token_path}"),
            Ok(false) => tracing::debug!("No stored session"),
            Err(e) => tracing::warn!("Ignoring unreadable session: {e}"),
        }

        let navigator = Arc::new(TerminalNavigator::at(route));
        let client = ApiClient::new(settings.api.clone(), session.clone(), navigator.clone())
            .context("Failed to create API client")?;

        let ctx = Arc::new(ServiceContext::from_client(
            Arc::new(client),
            session,
            navigator.clone(),
            exports,
            options,
        ));

        Ok(Self {
            ctx,
            navigator,
            json: global.is_json,
            assume_yes: global.assume_yes,
        })
    }

    /// Print raised toasts and a sign-in hint when the session was dropped.
    pub fn finish(&self, outcome: Outcome) -> Outcome {
        print_toasts(&self.ctx.notifier.drain());
        tracing::debug!("Finished at {}", self.navigator.current().path());
        if self.navigator.sent_to_login() && !outcome.is_success() {
            eprintln!("Not signed in or session expired. Run `zonedash login`.");
        }
        outcome
    }

    /// Report a service error on stderr.
    pub fn fail(&self, err: &CoreError) -> Outcome {
        eprintln!("Error: {err}");
        match err {
            CoreError::Validation(_) | CoreError::InvalidInput(_) => Outcome::Rejected(err.reason()),
            _ => Outcome::Failed(err.reason()),
        }
    }

    /// Answer the zone's pending confirmation, prompting unless `--yes`.
    pub async fn settle_confirmation(&self, detail: &ZoneDetailController) -> Result<Outcome> {
        let Some(request) = detail.pending_confirmation().await else {
            return Ok(Outcome::Rejected("Nothing to confirm".to_string()));
        };
        if !self.assume_yes && !prompt(&request).await? {
            detail.cancel_confirmation().await;
            eprintln!("Cancelled.");
            return Ok(Outcome::Rejected("Cancelled".to_string()));
        }
        Ok(detail.confirm().await)
    }
}

async fn prompt(request: &ConfirmRequest<PendingAction>) -> Result<bool> {
    let question = format!(
        "{}\n{}\n{}? [y/N] ",
        request.title, request.message, request.confirm_label
    );
    tokio::task::spawn_blocking(move || -> std::io::Result<bool> {
        let mut stderr = std::io::stderr();
        stderr.write_all(question.as_bytes())?;
        stderr.flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    })
    .await
    .context("Prompt task failed")?
    .context("Failed to read the answer")
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read a secret from stdin when it was not given as a flag.
pub async fn read_line(label: &str) -> Result<String> {
    let label = format!("{label}: ");
    tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        stderr.write_all(label.as_bytes())?;
        stderr.flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await
    .context("Input task failed")?
    .context("Failed to read from stdin")
}
