// src/fetch/mod.rs

use crate::error::ScrapeError;
use crate::process::{LeaderboardLink, RawTableRow};

pub mod html;
pub mod session;

pub use session::HttpSession;

/// What the collector needs from an athlete's profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AthleteProfile {
    pub date_of_birth: Option<String>,
    /// Season values the profile's year dropdown offers. Empty when the page
    /// has no dropdown; every requested year is then attempted.
    pub seasons: Vec<String>,
}

impl AthleteProfile {
    pub fn offers(&self, year: &str) -> bool {
        self.seasons.is_empty() || self.seasons.iter().any(|s| s == year)
    }
}

/// The logged-in browsing session every page fetch goes through.
///
/// A run owns exactly one session and drives it sequentially. `close`
/// consumes the session; see `pipeline::run_with_session`.
#[allow(async_fn_in_trait)]
pub trait SiteSession {
    /// All anchors on the `year` leaderboard page.
    async fn fetch_leaderboard_links(&self, year: &str)
        -> Result<Vec<LeaderboardLink>, ScrapeError>;

    async fn fetch_athlete_profile(&self, athlete_url: &str)
        -> Result<AthleteProfile, ScrapeError>;

    /// Rendered rows of the athlete's results table for `year`.
    async fn fetch_year_result_rows(
        &self,
        athlete_url: &str,
        year: &str,
    ) -> Result<Vec<RawTableRow>, ScrapeError>;

    async fn close(self)
    where
        Self: Sized;
}
