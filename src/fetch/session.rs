// src/fetch/session.rs

use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, trace};
use url::Url;

use super::{html, AthleteProfile, SiteSession};
use crate::config::SiteConfig;
use crate::error::ScrapeError;
use crate::process::{LeaderboardLink, RawTableRow};

const LOGIN_PATH: &str = "/login.php";
const LEADERBOARD_PATH: &str = "/db/topeventall.php";

/// A cookie-carrying HTTP session against the statistics site.
pub struct HttpSession {
    client: Client,
    site: SiteConfig,
    closed: bool,
}

impl HttpSession {
    pub fn new(site: SiteConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|source| ScrapeError::Http {
                url: site.base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            site,
            closed: false,
        })
    }

    /// Open a session and log in. A response that still shows the login
    /// form means the credentials were refused.
    #[instrument(level = "info", skip(site, password), fields(base = %site.base_url))]
    pub async fn login(site: SiteConfig, username: &str, password: &str) -> Result<Self, ScrapeError> {
        let session = Self::new(site)?;
        let url = session.site.base_url.join(LOGIN_PATH)?;

        // first visit sets the session cookie
        session.get_text(&url).await?;

        let resp = session
            .client
            .post(url.clone())
            .form(&[("user", username), ("password", password)])
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_string(),
                source,
            })?;
        let body = read_body(&url, resp).await?;
        session.settle().await;

        if html::has_login_form(&body) {
            return Err(ScrapeError::Login(format!(
                "{} still shows the login form",
                url
            )));
        }
        info!("logged in");
        Ok(session)
    }

    pub fn leaderboard_url(&self, year: &str) -> Result<Url, ScrapeError> {
        let mut url = self.site.base_url.join(LEADERBOARD_PATH)?;
        url.query_pairs_mut()
            .append_pair("type", "senior")
            .append_pair("Ind", "0")
            .append_pair("Season", year)
            .append_pair("event", &self.site.event)
            .append_pair("sex", &self.site.sex)
            .append_pair("top", "100")
            .append_pair("limit", "0");
        Ok(url)
    }

    pub fn season_url(&self, athlete_url: &str, year: &str) -> Result<Url, ScrapeError> {
        let mut url = Url::parse(athlete_url)?;
        url.query_pairs_mut()
            .append_pair(&self.site.season_param, year);
        Ok(url)
    }

    /// Fixed wait after a navigation.
    async fn settle(&self) {
        if self.site.page_delay > Duration::ZERO {
            sleep(self.site.page_delay).await;
        }
    }

    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        debug!("fetching {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_string(),
                source,
            })?;
        let body = read_body(url, resp).await?;
        self.settle().await;
        trace!(url = %url, bytes = body.len(), "page loaded");
        Ok(body)
    }
}

async fn read_body(url: &Url, resp: reqwest::Response) -> Result<String, ScrapeError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status,
        });
    }
    resp.text().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })
}

impl SiteSession for HttpSession {
    #[instrument(level = "info", skip(self))]
    async fn fetch_leaderboard_links(
        &self,
        year: &str,
    ) -> Result<Vec<LeaderboardLink>, ScrapeError> {
        let url = self.leaderboard_url(year)?;
        let body = self.get_text(&url).await?;
        Ok(html::parse_anchor_links(&body, &url))
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_athlete_profile(&self, athlete_url: &str) -> Result<AthleteProfile, ScrapeError> {
        let url = Url::parse(athlete_url)?;
        let body = self.get_text(&url).await?;
        Ok(AthleteProfile {
            date_of_birth: html::parse_date_of_birth(&body),
            seasons: html::parse_seasons(&body),
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_year_result_rows(
        &self,
        athlete_url: &str,
        year: &str,
    ) -> Result<Vec<RawTableRow>, ScrapeError> {
        let url = self.season_url(athlete_url, year)?;
        let body = self.get_text(&url).await?;
        html::parse_season_rows(&body).ok_or_else(|| ScrapeError::MissingElement {
            what: "#seasonDiv table",
            url: url.to_string(),
        })
    }

    async fn close(mut self) {
        self.closed = true;
        info!("session closed");
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        if !self.closed {
            debug!("session released without close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: Url::parse("https://www.tilastopaja.info").unwrap(),
            event: "330".into(),
            sex: "2".into(),
            season_param: "Season".into(),
            page_delay: Duration::ZERO,
        }
    }

    #[test]
    fn builds_leaderboard_url() {
        let session = HttpSession::new(site()).unwrap();
        let url = session.leaderboard_url("2023").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.tilastopaja.info/db/topeventall.php?type=senior&Ind=0&Season=2023&event=330&sex=2&top=100&limit=0"
        );
    }

    #[test]
    fn builds_season_url() {
        let session = HttpSession::new(site()).unwrap();
        let url = session
            .season_url("https://www.tilastopaja.info/db/at.php?Sex=2&ID=501", "2024")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.tilastopaja.info/db/at.php?Sex=2&ID=501&Season=2024"
        );
    }

    #[test]
    fn rejects_malformed_athlete_urls() {
        let session = HttpSession::new(site()).unwrap();
        assert!(matches!(
            session.season_url("not a url", "2024"),
            Err(ScrapeError::InvalidUrl(_))
        ));
    }
}
