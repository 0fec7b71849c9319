//! Zone commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use zonedash_api::Route;
use zonedash_core::controllers::{ZoneDetailController, ZoneListController};
use zonedash_core::{ControllerOptions, Outcome};

use super::App;
use crate::adapters::DirectoryExportSink;
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::{VerificationOutput, ZoneListOutput, ZoneOutput, print_output};

/// Zone commands.
#[derive(Subcommand)]
pub enum ZoneCommand {
    /// List your zones.
    List {
        /// Only show zones whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Add a zone to your account.
    Create {
        /// Domain name, e.g. example.com.
        name: String,
    },

    /// Show a zone and its records.
    Show {
        /// Zone ID.
        id: String,
    },

    /// Delete a zone and all of its records.
    Delete {
        /// Zone ID.
        id: String,
    },

    /// Check that the domain is delegated to our nameservers.
    Verify {
        /// Zone ID.
        id: String,
    },

    /// Download the zone file as `<name>.zone`.
    Export {
        /// Zone ID.
        id: String,

        /// Directory to write the file to.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

impl ZoneCommand {
    pub async fn run(self, settings: &Settings, global: &GlobalOptions) -> Result<Outcome> {
        match self {
            Self::List { filter } => {
                let app = App::connect(settings, global, Route::Dashboard).await?;
                let list = ZoneListController::new(app.ctx.clone());
                let outcome = list.list_zones().await;
                if !outcome.is_success() {
                    report(&outcome);
                    return Ok(app.finish(outcome));
                }
                if let Some(filter) = filter {
                    list.set_filter(filter).await;
                }
                print_output(
                    &ZoneListOutput {
                        zones: list.visible_zones().await,
                        summary: list.summary().await,
                    },
                    app.json,
                );
                Ok(app.finish(outcome))
            }
            Self::Create { name } => {
                let app = App::connect(settings, global, Route::Dashboard).await?;
                let list = ZoneListController::new(app.ctx.clone());
                let outcome = list.create_zone(&name).await;
                if let Outcome::Rejected(reason) = &outcome {
                    eprintln!("Error: {reason}");
                }
                if outcome.is_success() {
                    print_output(
                        &ZoneListOutput {
                            zones: list.visible_zones().await,
                            summary: list.summary().await,
                        },
                        app.json,
                    );
                }
                Ok(app.finish(outcome))
            }
            Self::Show { id } => {
                let app = App::connect(settings, global, Route::Zone(id.clone())).await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), id);
                let outcome = detail.mount().await;
                let view = detail.snapshot().await;
                match (&outcome, view.zone) {
                    (Outcome::Succeeded, Some(zone)) => {
                        if let Some(err) = &view.records_error {
                            eprintln!("Failed to load records: {err}");
                        }
                        print_output(
                            &ZoneOutput {
                                zone,
                                usage: detail.record_usage().await,
                                records: view.records,
                            },
                            app.json,
                        );
                    }
                    _ => report(&outcome),
                }
                Ok(app.finish(outcome))
            }
            Self::Delete { id } => {
                let app = App::connect(settings, global, Route::Zone(id.clone())).await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), id);
                let loaded = detail.refresh_metadata().await;
                if !loaded.is_success() {
                    report(&loaded);
                    return Ok(app.finish(loaded));
                }
                if !detail.request_delete_zone().await {
                    return Ok(app.finish(Outcome::Failed("Zone details are not loaded".to_string())));
                }
                let outcome = app.settle_confirmation(&detail).await?;
                Ok(app.finish(outcome))
            }
            Self::Verify { id } => {
                let app = App::connect(settings, global, Route::Zone(id.clone())).await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), id);
                let outcome = detail.verify_zone().await;
                if let Some(failure) = detail.snapshot().await.verification_failure {
                    print_output(&VerificationOutput(&failure), app.json);
                }
                Ok(app.finish(outcome))
            }
            Self::Export { id, out_dir } => {
                let app = App::connect_with(
                    settings,
                    global,
                    Route::Zone(id.clone()),
                    ControllerOptions::default(),
                    Arc::new(DirectoryExportSink::new(out_dir)),
                )
                .await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), id);
                let loaded = detail.refresh_metadata().await;
                if !loaded.is_success() {
                    report(&loaded);
                    return Ok(app.finish(loaded));
                }
                let outcome = detail.export_zone().await;
                Ok(app.finish(outcome))
            }
        }
    }
}

/// Print the reason of an outcome that raised no toast.
fn report(outcome: &Outcome) {
    if let Some(reason) = outcome.message() {
        eprintln!("Error: {reason}");
    }
}
