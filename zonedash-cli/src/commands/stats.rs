//! Public stats command.

use anyhow::Result;
use zonedash_api::Route;
use zonedash_core::Outcome;
use zonedash_core::controllers::StatsController;

use super::App;
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::{StatsOutput, print_output};

pub async fn run(settings: &Settings, global: &GlobalOptions) -> Result<Outcome> {
    let app = App::connect(settings, global, Route::Landing).await?;
    let stats = StatsController::new(app.ctx.clone());
    let outcome = stats.refresh().await;

    if stats.rate_limit_notice_visible().await {
        eprintln!("Stats are rate limited; data may be outdated.");
    } else if let Some(reason) = outcome.message() {
        eprintln!("Error: {reason}");
        return Ok(app.finish(outcome));
    }

    print_output(
        &StatsOutput {
            raw: stats.stats().await,
            view: stats.view().await,
        },
        app.json,
    );
    Ok(app.finish(outcome))
}
