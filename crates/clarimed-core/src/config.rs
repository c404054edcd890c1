use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::search::SearchOptions;

pub const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

const BASE_URL_VAR: &str = "CLARIMED_RXNAV_BASE_URL";
const TIMEOUT_VAR: &str = "CLARIMED_RXNAV_TIMEOUT_SECS";
const MAX_ENTRIES_VAR: &str = "CLARIMED_RXNAV_MAX_ENTRIES";
const FANOUT_VAR: &str = "CLARIMED_RXNAV_FANOUT";

/// RxNav connection and search tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct RxNavConfig {
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub approximate_max_entries: usize,
    pub fallback_fanout: usize,
}

impl Default for RxNavConfig {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            approximate_max_entries: options.approximate_max_entries,
            fallback_fanout: options.fallback_fanout,
        }
    }
}

impl RxNavConfig {
    /// Read overrides from `CLARIMED_RXNAV_*` variables.
    ///
    /// Unset variables keep their defaults. Unparseable ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| {
                info!("{BASE_URL_VAR} not set, using default: {DEFAULT_BASE_URL}");
                defaults.base_url.clone()
            });

        let timeout = parse_var::<u64>(&lookup, TIMEOUT_VAR)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            base_url,
            timeout,
            approximate_max_entries: parse_var(&lookup, MAX_ENTRIES_VAR)
                .unwrap_or(defaults.approximate_max_entries),
            fallback_fanout: parse_var(&lookup, FANOUT_VAR).unwrap_or(defaults.fallback_fanout),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            approximate_max_entries: self.approximate_max_entries,
            fallback_fanout: self.fallback_fanout,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T::Err: Display,
{
    let raw = lookup(key)?;
    raw.trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> RxNavConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RxNavConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, RxNavConfig::default());
        assert_eq!(config.base_url, "https://rxnav.nlm.nih.gov/REST");
        assert_eq!(config.timeout, None);
        assert_eq!(config.approximate_max_entries, 10);
        assert_eq!(config.fallback_fanout, 5);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (BASE_URL_VAR, " http://localhost:4000/REST "),
            (TIMEOUT_VAR, "15"),
            (MAX_ENTRIES_VAR, "20"),
            (FANOUT_VAR, "3"),
        ]);

        assert_eq!(config.base_url, "http://localhost:4000/REST");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.search_options().approximate_max_entries, 20);
        assert_eq!(config.search_options().fallback_fanout, 3);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (BASE_URL_VAR, "   "),
            (TIMEOUT_VAR, "soon"),
            (MAX_ENTRIES_VAR, "-1"),
            (FANOUT_VAR, "five"),
        ]);

        assert_eq!(config, RxNavConfig::default());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = config_from(&[(TIMEOUT_VAR, "0")]);
        assert_eq!(config.timeout, None);
    }
}
