/*!
 * Fetching registry collections over HTTP
 *
 * Pulls the three collections from a registry export API that serves them as
 * JSON arrays. Requires the `fetch` feature.
 */

use log::info;

use crate::data_types::{Hospital, HospitalAddress, SpecialtyOffering};
use crate::dataset::RegistryDataset;
use crate::error::{MatrixError, Result};

/// Fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the registry export API
    pub base_url: String,
    /// Timeout for HTTP requests in seconds
    pub timeout_seconds: u64,
    /// Custom user agent string
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://registry.example.org/api/v1".to_string(),
            timeout_seconds: 120,
            user_agent: Some(format!("specmatrix/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Fetches registry collections from the export API
pub struct RegistryFetcher {
    config: FetchConfig,
    client: Option<reqwest::Client>,
}

impl RegistryFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
            client: None,
        }
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: FetchConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Create a fetcher against a specific base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_config(FetchConfig {
            base_url: base_url.into(),
            ..FetchConfig::default()
        })
    }

    /// Get or create the HTTP client
    fn client(&mut self) -> Result<&reqwest::Client> {
        if self.client.is_none() {
            let mut builder = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(self.config.timeout_seconds));

            if let Some(user_agent) = &self.config.user_agent {
                builder = builder.user_agent(user_agent.as_str());
            }

            self.client = Some(builder.build().map_err(|e| MatrixError::Fetch {
                message: format!("Failed to create HTTP client: {}", e),
                suggestion: Some("Check your network configuration".to_string()),
            })?);
        }

        Ok(self.client.as_ref().unwrap())
    }

    async fn fetch_collection<T: serde::de::DeserializeOwned>(
        client: &reqwest::Client,
        base_url: &str,
        endpoint: &str,
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), endpoint);

        let response = client.get(&url).send().await.map_err(|e| MatrixError::Fetch {
            message: format!("Failed to connect to {}: {}", url, e),
            suggestion: Some("Check the URL and your internet connection".to_string()),
        })?;

        if !response.status().is_success() {
            return Err(MatrixError::Fetch {
                message: format!("HTTP error {}: {}", response.status(), url),
                suggestion: Some("Check if the registry API is reachable".to_string()),
            });
        }

        response.json().await.map_err(|e| MatrixError::Fetch {
            message: format!("Failed to parse response from {}: {}", url, e),
            suggestion: Some("Check if the endpoint serves a JSON array".to_string()),
        })
    }

    /// Fetch the hospital master collection
    pub async fn fetch_hospitals(&mut self) -> Result<Vec<Hospital>> {
        let base_url = self.config.base_url.clone();
        let client = self.client()?;
        Self::fetch_collection(client, &base_url, "hospitals").await
    }

    /// Fetch the hospital address collection
    pub async fn fetch_addresses(&mut self) -> Result<Vec<HospitalAddress>> {
        let base_url = self.config.base_url.clone();
        let client = self.client()?;
        Self::fetch_collection(client, &base_url, "hospital_addresses").await
    }

    /// Fetch the specialty offering collection
    pub async fn fetch_offerings(&mut self) -> Result<Vec<SpecialtyOffering>> {
        let base_url = self.config.base_url.clone();
        let client = self.client()?;
        Self::fetch_collection(client, &base_url, "specialty_offerings").await
    }

    /// Fetch all three collections concurrently into a dataset
    pub async fn fetch_all(&mut self) -> Result<RegistryDataset> {
        let base_url = self.config.base_url.clone();
        let client = self.client()?.clone();

        let (hospitals, addresses, offerings) = tokio::try_join!(
            Self::fetch_collection::<Hospital>(&client, &base_url, "hospitals"),
            Self::fetch_collection::<HospitalAddress>(&client, &base_url, "hospital_addresses"),
            Self::fetch_collection::<SpecialtyOffering>(&client, &base_url, "specialty_offerings"),
        )?;

        info!(
            "fetched {} hospital(s), {} address(es), {} offering(s) from {}",
            hospitals.len(),
            addresses.len(),
            offerings.len(),
            base_url
        );

        Ok(RegistryDataset::new(hospitals, addresses, offerings))
    }
}

impl Default for RegistryFetcher {
    fn default() -> Self {
        Self::new()
    }
}
