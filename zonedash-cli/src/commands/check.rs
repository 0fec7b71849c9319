//! Public DNS checker commands.

use anyhow::Result;
use clap::Subcommand;
use zonedash_api::Route;
use zonedash_core::Outcome;
use zonedash_core::services::{DEFAULT_LOOKUP_TYPE, DnsChecker};

use super::App;
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::{LookupOutput, PropagationOutput, print_output};

/// DNS checker commands.
#[derive(Subcommand)]
pub enum CheckCommand {
    /// Resolve a record through several public resolvers.
    Lookup {
        /// Domain to look up.
        domain: String,

        /// Record type (A, AAAA, CNAME, MX, TXT, NS, SOA, SRV, CAA, PTR, NAPTR).
        #[arg(long = "type", default_value = DEFAULT_LOOKUP_TYPE)]
        record_type: String,
    },

    /// Check whether public resolvers see our nameservers for a domain.
    Propagation {
        /// Domain to check.
        domain: String,
    },
}

impl CheckCommand {
    pub async fn run(self, settings: &Settings, global: &GlobalOptions) -> Result<Outcome> {
        let app = App::connect(settings, global, Route::DnsChecker).await?;
        let checker = DnsChecker::new(app.ctx.clone());

        let outcome = match self {
            Self::Lookup {
                domain,
                record_type,
            } => match checker.lookup(&domain, &record_type).await {
                Ok(report) => {
                    print_output(&LookupOutput(report), app.json);
                    Outcome::Succeeded
                }
                Err(e) => app.fail(&e),
            },
            Self::Propagation { domain } => match checker.propagation(&domain).await {
                Ok(report) => {
                    print_output(&PropagationOutput(report), app.json);
                    Outcome::Succeeded
                }
                Err(e) => app.fail(&e),
            },
        };
        Ok(app.finish(outcome))
    }
}
