//! HTTP client for the studies API.

use crate::config::{Credential, PollerConfig};
use crate::error::{FetchError, FetchResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use shared_types::{ListingsResponse, ReservationRequest, StudyListing};

/// Somewhere study listings can be fetched from and reserved against.
#[async_trait]
pub trait ListingSource {
    /// Fetch the currently available studies.
    async fn fetch_listings(&self) -> FetchResult<StudyListing>;

    /// Try to reserve a study. Failures are logged, never returned.
    async fn attempt_reservation(&self, study_id: &str);
}

pub struct ProlificClient {
    http: Client,
    credential: Credential,
    listings_url: String,
    reservation_url: String,
    participant_id: Option<String>,
}

impl ProlificClient {
    pub fn new(config: &PollerConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("study-poller/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            credential: config.credential.clone(),
            listings_url: config.listings_url(),
            reservation_url: config.reservation_url(),
            participant_id: config.participant_id.clone(),
        })
    }

    async fn post_reservation(&self, request: &ReservationRequest) -> Result<StatusCode, reqwest::Error> {
        let response = self
            .http
            .post(&self.reservation_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.credential.header_value())
            .json(request)
            .send()
            .await?;

        Ok(response.status())
    }
}

#[async_trait]
impl ListingSource for ProlificClient {
    async fn fetch_listings(&self) -> FetchResult<StudyListing> {
        let response = self
            .http
            .get(&self.listings_url)
            .query(&[("current", "1")])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.credential.header_value())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::api(status));
        }

        let body: ListingsResponse = response.json().await?;
        tracing::debug!("Fetched {} studies", body.results.len());

        Ok(body.results)
    }

    async fn attempt_reservation(&self, study_id: &str) {
        let Some(participant_id) = &self.participant_id else {
            tracing::debug!("No participant id configured, not reserving {}", study_id);
            return;
        };

        let request = ReservationRequest {
            study_id: study_id.to_string(),
            participant_id: participant_id.clone(),
        };

        match self.post_reservation(&request).await {
            Ok(status) if status.is_success() => {
                tracing::info!("Reserved study {} ({})", study_id, status);
            }
            Ok(status) => {
                tracing::warn!("Reservation of study {} rejected: {}", study_id, status);
            }
            Err(e) => {
                tracing::warn!("Reservation of study {} failed: {}", study_id, e);
            }
        }
    }
}
