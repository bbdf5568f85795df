use std::time::Duration;

use async_trait::async_trait;
use offerly_core::config::CatalogConfig;
use offerly_core::{Criteria, Offer};
use reqwest::Client;
use tracing::warn;

use crate::{CatalogClient, CatalogError};

/// REST client for the offers catalog. Criteria fields become query
/// parameters; absent fields are omitted entirely.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    async fn fetch_inner(&self, criteria: &Criteria) -> Result<Vec<Offer>, CatalogError> {
        let response = self
            .client
            .get(format!("{}/offers", self.base_url))
            .query(criteria)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<Vec<Offer>>().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch(&self, criteria: &Criteria) -> Vec<Offer> {
        match self.fetch_inner(criteria).await {
            Ok(offers) => offers,
            Err(error) => {
                warn!(%error, "offer fetch failed, degrading to empty result set");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use offerly_core::config::CatalogConfig;
    use offerly_core::{Category, Criteria};

    use super::HttpCatalogClient;
    use crate::CatalogClient;

    fn test_config(base_url: &str) -> CatalogConfig {
        CatalogConfig { base_url: base_url.to_string(), timeout_secs: 1 }
    }

    #[tokio::test]
    async fn unreachable_catalog_degrades_to_empty() {
        // Port 9 (discard) is a safe never-listening target.
        let client = HttpCatalogClient::new(&test_config("http://127.0.0.1:9"))
            .expect("client should build");

        let criteria = Criteria {
            category: Some(Category::Fashion),
            max_price: Some(60.0),
            ..Criteria::default()
        };
        assert!(client.fetch(&criteria).await.is_empty());
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let client = HttpCatalogClient::new(&test_config("http://localhost:8001/"))
            .expect("client should build");
        assert_eq!(client.base_url, "http://localhost:8001");
    }
}
