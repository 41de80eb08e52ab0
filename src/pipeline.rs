// src/pipeline.rs

use tracing::info;
use url::Url;

use crate::collect::{collect_athlete, discover_athletes, Accumulator};
use crate::config::RunPlan;
use crate::dataset::{assemble, Dataset};
use crate::fetch::SiteSession;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub athletes: usize,
    pub skipped_athletes: usize,
    pub failed_years: usize,
    pub batches: usize,
    pub raw_rows: usize,
    pub trials: usize,
}

/// Discover athletes over the leaderboard years, then collect every data
/// year for each of them, one at a time.
pub async fn collect_all<S: SiteSession>(
    session: &S,
    base: &Url,
    sex: &str,
    plan: &RunPlan,
) -> (usize, Accumulator) {
    let athletes = discover_athletes(session, base, sex, &plan.leaderboard_years).await;
    let total = athletes.len();

    let mut acc = Accumulator::default();
    for (i, athlete) in athletes.iter().enumerate() {
        info!(
            "[{}/{}] {} ({})",
            i + 1,
            total,
            athlete.display_name,
            athlete.id
        );
        acc = collect_athlete(session, athlete, &plan.data_years, acc).await;
    }
    (total, acc)
}

/// Run a whole scrape on `session` and close it afterwards.
///
/// The session is consumed: collection cannot fail past its per-athlete
/// isolation, so `close` is reached on every path that returns.
pub async fn run_with_session<S: SiteSession>(
    session: S,
    base: &Url,
    sex: &str,
    plan: &RunPlan,
) -> (Dataset, RunSummary) {
    let (athletes, acc) = collect_all(&session, base, sex, plan).await;
    session.close().await;

    let mut summary = RunSummary {
        athletes,
        skipped_athletes: acc.skipped_athletes,
        failed_years: acc.failed_years,
        batches: acc.batches.len(),
        raw_rows: acc.raw_rows(),
        trials: 0,
    };
    let dataset = assemble(acc.batches);
    summary.trials = dataset.len();

    info!(
        athletes = summary.athletes,
        skipped = summary.skipped_athletes,
        failed_years = summary.failed_years,
        batches = summary.batches,
        raw_rows = summary.raw_rows,
        trials = summary.trials,
        "scraping done"
    );
    (dataset, summary)
}
