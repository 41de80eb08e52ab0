// src/collect.rs

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::fetch::SiteSession;
use crate::process::{extract_table_rows, AthleteDirectory, AthleteRef, RawBatch};

/// Raw batches gathered so far, in append order.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub batches: Vec<RawBatch>,
    pub failed_years: usize,
    pub skipped_athletes: usize,
}

impl Accumulator {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn raw_rows(&self) -> usize {
        self.batches.iter().map(RawBatch::len).sum()
    }
}

/// Walk the leaderboard years in ascending order and collapse every
/// athlete found into one directory. A year that fails to load is skipped.
#[instrument(level = "info", skip(session, base, years))]
pub async fn discover_athletes<S: SiteSession>(
    session: &S,
    base: &Url,
    sex: &str,
    years: &[String],
) -> Vec<AthleteRef> {
    let mut directory = AthleteDirectory::new(base.clone(), sex);
    for year in years {
        info!(%year, "fetching athletes from leaderboard");
        match session.fetch_leaderboard_links(year).await {
            Ok(links) => {
                directory.absorb(&links);
            }
            Err(e) => warn!(%year, error = %e, "leaderboard failed; skipping year"),
        }
    }
    info!(total = directory.len(), "unique athletes across all years");
    directory.into_athletes()
}

/// Collect every requested year for one athlete into `acc`.
///
/// The profile is loaded once; if that fails the whole athlete is skipped.
/// Each year is isolated: a failed year is logged and the next one runs.
#[instrument(level = "info", skip_all, fields(athlete = %athlete.display_name, id = %athlete.id))]
pub async fn collect_athlete<S: SiteSession>(
    session: &S,
    athlete: &AthleteRef,
    years: &[String],
    mut acc: Accumulator,
) -> Accumulator {
    let profile = match session.fetch_athlete_profile(&athlete.profile_url).await {
        Ok(p) => p,
        Err(e) => {
            let err = ScrapeError::per_athlete(&athlete.display_name, e);
            warn!(error = %err, cause = %source_of(&err), "athlete skipped");
            acc.skipped_athletes += 1;
            return acc;
        }
    };
    debug!(dob = ?profile.date_of_birth, seasons = profile.seasons.len(), "profile loaded");

    for year in years {
        if !profile.offers(year) {
            let err = ScrapeError::per_year(
                &athlete.display_name,
                year,
                ScrapeError::SeasonUnavailable {
                    year: year.clone(),
                    url: athlete.profile_url.clone(),
                },
            );
            warn!(error = %err, cause = %source_of(&err), "year skipped");
            acc.failed_years += 1;
            continue;
        }

        let rows = match session
            .fetch_year_result_rows(&athlete.profile_url, year)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                let err = ScrapeError::per_year(&athlete.display_name, year, e);
                warn!(error = %err, cause = %source_of(&err), "year skipped");
                acc.failed_years += 1;
                continue;
            }
        };

        let mut batch = extract_table_rows(&rows, year, &athlete.display_name);
        if batch.is_empty() {
            debug!(%year, "no rows");
            continue;
        }
        batch.set_date_of_birth(profile.date_of_birth.as_deref());
        info!(%year, rows = batch.len(), "collected");
        acc.batches.push(batch);
    }

    acc
}

fn source_of(err: &ScrapeError) -> String {
    std::error::Error::source(err)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
