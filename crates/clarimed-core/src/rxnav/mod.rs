//! HTTP client for the NLM RxNav REST API.

pub mod wire;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::RxNavConfig;
use crate::models::{ConceptGroup, ConceptProperties, InteractionGroup, TermType};
use crate::search::{LookupError, LookupResult, VocabularySource};

use wire::{
    ApproximateResponse, DrugsResponse, InteractionResponse, PropertiesResponse, RelatedResponse,
    SpellingResponse,
};

/// [`VocabularySource`] backed by RxNav.
#[derive(Debug, Clone)]
pub struct RxNavClient {
    http: Client,
    base_url: String,
}

impl RxNavClient {
    /// Build a client with the configured base URL and timeout.
    pub fn new(config: &RxNavConfig) -> LookupResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, &config.base_url))
    }

    /// Wrap an existing HTTP client.
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> LookupResult<T> {
        debug!(endpoint = path, ?query, "RxNav request");

        let response = self.http.get(self.url(path)).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LookupError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// RxCUIs are numeric strings. Anything else would change the request path.
fn check_rxcui(rxcui: &str) -> LookupResult<&str> {
    if !rxcui.is_empty() && rxcui.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(rxcui)
    } else {
        Err(LookupError::InvalidConceptId(rxcui.to_string()))
    }
}

/// Space-separated list; the query encoder renders the spaces as `+`.
fn term_type_list(term_types: &[TermType]) -> String {
    term_types
        .iter()
        .map(TermType::code)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl VocabularySource for RxNavClient {
    async fn find_drugs(&self, name: &str) -> LookupResult<Vec<ConceptGroup>> {
        let response: DrugsResponse = self.get_json("/drugs.json", &[("name", name)]).await?;
        Ok(response.into_groups())
    }

    async fn approximate_term(&self, term: &str, max_entries: usize) -> LookupResult<Vec<String>> {
        let max_entries = max_entries.to_string();
        let response: ApproximateResponse = self
            .get_json(
                "/approximateTerm.json",
                &[("term", term), ("maxEntries", max_entries.as_str())],
            )
            .await?;
        Ok(response.into_rxcuis())
    }

    async fn related_by_type(
        &self,
        rxcui: &str,
        term_types: &[TermType],
    ) -> LookupResult<Vec<ConceptGroup>> {
        let path = format!("/rxcui/{}/related.json", check_rxcui(rxcui)?);
        let tty = term_type_list(term_types);
        let response: RelatedResponse = self.get_json(&path, &[("tty", tty.as_str())]).await?;
        Ok(response.into_groups())
    }

    async fn properties(&self, rxcui: &str) -> LookupResult<Option<ConceptProperties>> {
        let path = format!("/rxcui/{}/properties.json", check_rxcui(rxcui)?);
        let response: PropertiesResponse = self.get_json(&path, &[]).await?;
        Ok(response.properties)
    }

    async fn interactions(&self, rxcuis: &[String]) -> LookupResult<Vec<InteractionGroup>> {
        for rxcui in rxcuis {
            check_rxcui(rxcui)?;
        }
        let joined = rxcuis.join(" ");
        let response: InteractionResponse = self
            .get_json("/interaction/list.json", &[("rxcuis", joined.as_str())])
            .await?;
        Ok(response.full_interaction_type_group)
    }

    async fn spelling_suggestions(&self, name: &str) -> LookupResult<Vec<String>> {
        let response: SpellingResponse = self
            .get_json("/spellingsuggestions.json", &[("name", name)])
            .await?;
        Ok(response.into_suggestions())
    }
}
