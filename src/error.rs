// src/error.rs

use thiserror::Error;

/// Failures raised while talking to the statistics site or while collecting
/// one athlete's results. None of these abort a run on their own: the
/// collector catches them at the narrowest scope and logs them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("login rejected: {0}")]
    Login(String),

    #[error("GET {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("non-success status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{what} not found on {url}")]
    MissingElement { what: &'static str, url: String },

    #[error("season {year} is not offered on {url}")]
    SeasonUnavailable { year: String, url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// One (athlete, year) unit failed; other years still run.
    #[error("year {year} failed for {athlete}")]
    PerYearFetch {
        athlete: String,
        year: String,
        #[source]
        source: Box<ScrapeError>,
    },

    /// The athlete's profile could not be loaded; the whole athlete is skipped.
    #[error("skipping athlete {athlete}")]
    PerAthleteFetch {
        athlete: String,
        #[source]
        source: Box<ScrapeError>,
    },
}

impl ScrapeError {
    pub fn per_year(athlete: &str, year: &str, source: ScrapeError) -> Self {
        ScrapeError::PerYearFetch {
            athlete: athlete.to_string(),
            year: year.to_string(),
            source: Box::new(source),
        }
    }

    pub fn per_athlete(athlete: &str, source: ScrapeError) -> Self {
        ScrapeError::PerAthleteFetch {
            athlete: athlete.to_string(),
            source: Box::new(source),
        }
    }
}
