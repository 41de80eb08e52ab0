// src/process/directory.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

/// An anchor found on a leaderboard page: resolved `href` plus trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardLink {
    pub href: String,
    pub text: String,
}

impl LeaderboardLink {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteRef {
    pub id: String,
    pub display_name: String,
    pub profile_url: String,
}

static ATHLETE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ID=(\d+)").expect("athlete id regex should compile"));

/// Canonical profile URL for an athlete id.
pub fn profile_url(base: &Url, sex: &str, id: &str) -> String {
    let mut url = base.join("/db/at.php").unwrap_or_else(|_| base.clone());
    url.query_pairs_mut()
        .clear()
        .append_pair("Sex", sex)
        .append_pair("ID", id);
    url.to_string()
}

/// Deduplicates athletes found across several year-scoped leaderboards.
///
/// The first sighting of an id fixes its display name and profile URL;
/// iteration order is first-discovery order.
#[derive(Debug)]
pub struct AthleteDirectory {
    base: Url,
    sex: String,
    profile_link: Regex,
    seen: HashSet<String>,
    athletes: Vec<AthleteRef>,
}

impl AthleteDirectory {
    pub fn new(base: Url, sex: &str) -> Self {
        let pattern = format!(r"/db/at\.php\?Sex={}&ID=\d+", regex::escape(sex));
        Self {
            base,
            sex: sex.to_string(),
            profile_link: Regex::new(&pattern).expect("escaped profile pattern should compile"),
            seen: HashSet::new(),
            athletes: Vec::new(),
        }
    }

    /// Absorb one leaderboard page's anchors; returns how many ids were new.
    pub fn absorb(&mut self, links: &[LeaderboardLink]) -> usize {
        let before = self.athletes.len();
        for link in links {
            if !self.profile_link.is_match(&link.href) {
                continue;
            }
            let Some(caps) = ATHLETE_ID.captures(&link.href) else {
                continue;
            };
            let id = &caps[1];
            if self.seen.insert(id.to_string()) {
                trace!(id, name = %link.text, "new athlete");
                self.athletes.push(AthleteRef {
                    id: id.to_string(),
                    display_name: link.text.clone(),
                    profile_url: profile_url(&self.base, &self.sex, id),
                });
            }
        }
        let added = self.athletes.len() - before;
        debug!(added, total = self.athletes.len(), "absorbed leaderboard links");
        added
    }

    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    pub fn into_athletes(self) -> Vec<AthleteRef> {
        self.athletes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.tilastopaja.info").unwrap()
    }

    fn link(id: &str, sex: &str, name: &str) -> LeaderboardLink {
        LeaderboardLink::new(
            format!("https://www.tilastopaja.info/db/at.php?Sex={}&ID={}", sex, id),
            name,
        )
    }

    #[test]
    fn first_sighting_wins_across_years() {
        let mut dir = AthleteDirectory::new(base(), "2");

        let y2023 = vec![link("501", "2", "J. Doe"), link("777", "2", "A. Smith")];
        let y2024 = vec![link("501", "2", "Jane Doe"), link("900", "2", "B. Jones")];

        assert_eq!(dir.absorb(&y2023), 2);
        assert_eq!(dir.absorb(&y2024), 1);

        let athletes = dir.into_athletes();
        let ids: Vec<_> = athletes.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["501", "777", "900"]);

        let doe: Vec<_> = athletes.iter().filter(|a| a.id == "501").collect();
        assert_eq!(doe.len(), 1);
        assert_eq!(doe[0].display_name, "J. Doe");
        assert_eq!(
            doe[0].profile_url,
            "https://www.tilastopaja.info/db/at.php?Sex=2&ID=501"
        );
    }

    #[test]
    fn ignores_other_sex_and_unrelated_links() {
        let mut dir = AthleteDirectory::new(base(), "2");
        let links = vec![
            link("501", "1", "Men's athlete"),
            LeaderboardLink::new("https://www.tilastopaja.info/db/topeventall.php?Season=2024", "Next"),
            LeaderboardLink::new("https://www.tilastopaja.info/db/at.php?Sex=2", "No id"),
            link("42", "2", "Kept"),
        ];
        assert_eq!(dir.absorb(&links), 1);
        assert_eq!(dir.into_athletes()[0].id, "42");
    }

    #[test]
    fn sex_code_is_matched_literally() {
        let mut dir = AthleteDirectory::new(base(), "1");
        assert_eq!(dir.absorb(&[link("5", "12", "x")]), 0);
        assert!(dir.is_empty());
    }
}
