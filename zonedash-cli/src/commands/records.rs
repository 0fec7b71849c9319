//! Record commands.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use zonedash_api::{RecordKey, RecordType, Route};
use zonedash_core::controllers::ZoneDetailController;
use zonedash_core::validation::MIN_TTL;
use zonedash_core::{ControllerOptions, Outcome, RecordDraft};

use super::App;
use crate::adapters::DirectoryExportSink;
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::{RecordListOutput, print_output};

/// Record commands.
#[derive(Subcommand)]
pub enum RecordCommand {
    /// List or search the records of a zone.
    List(ListArgs),

    /// Add a record to an active zone.
    Add(AddArgs),

    /// Delete every record of one name and type.
    Delete {
        /// Zone ID.
        zone: String,
        /// Record name, e.g. `www` or `@`.
        name: String,
        /// Record type, e.g. A or TXT.
        record_type: RecordType,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Zone ID.
    pub zone: String,

    /// Server-side search on name and content.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Maximum number of record sets to fetch.
    #[arg(long)]
    pub max: Option<u32>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Zone ID.
    pub zone: String,

    /// Record type.
    #[arg(long = "type")]
    pub record_type: RecordType,

    /// Record name; `@` is the zone apex.
    #[arg(long, default_value = "@")]
    pub name: String,

    /// Record content. MX takes `<priority> <target>`.
    #[arg(long)]
    pub content: String,

    /// Time to live in seconds.
    #[arg(long, default_value_t = MIN_TTL.to_string())]
    pub ttl: String,
}

impl RecordCommand {
    pub async fn run(self, settings: &Settings, global: &GlobalOptions) -> Result<Outcome> {
        match self {
            Self::List(args) => {
                let mut options = ControllerOptions::default();
                if let Some(max) = args.max {
                    options.max_records = max;
                }
                let app = App::connect_with(
                    settings,
                    global,
                    Route::Zone(args.zone.clone()),
                    options,
                    Arc::new(DirectoryExportSink::new(".")),
                )
                .await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), args.zone);
                let outcome = detail.search_now(args.query).await;
                match &outcome {
                    Outcome::Succeeded => print_output(
                        &RecordListOutput {
                            records: detail.snapshot().await.records,
                        },
                        app.json,
                    ),
                    other => {
                        if let Some(reason) = other.message() {
                            eprintln!("Failed to load records: {reason}");
                        }
                    }
                }
                Ok(app.finish(outcome))
            }
            Self::Add(args) => {
                let app = App::connect(settings, global, Route::Zone(args.zone.clone())).await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), args.zone);
                let loaded = detail.refresh_metadata().await;
                if let Some(reason) = loaded.message() {
                    eprintln!("Error: {reason}");
                    return Ok(app.finish(loaded));
                }
                let draft = RecordDraft::new(args.record_type, args.name, args.content, args.ttl);
                let outcome = detail.submit_record(draft).await;
                Ok(app.finish(outcome))
            }
            Self::Delete {
                zone,
                name,
                record_type,
            } => {
                let app = App::connect(settings, global, Route::Zone(zone.clone())).await?;
                let detail = ZoneDetailController::new(app.ctx.clone(), zone);
                let loaded = detail.refresh_metadata().await;
                if let Some(reason) = loaded.message() {
                    eprintln!("Error: {reason}");
                    return Ok(app.finish(loaded));
                }
                if !detail
                    .request_delete_record(RecordKey::new(name, record_type))
                    .await
                {
                    return Ok(app.finish(Outcome::Rejected(
                        "Record cannot be deleted".to_string(),
                    )));
                }
                let outcome = app.settle_confirmation(&detail).await?;
                Ok(app.finish(outcome))
            }
        }
    }
}
