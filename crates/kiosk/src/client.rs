//! # API Client
//!
//! [`BookingBackend`] over the booking API. Transport problems never escape as
//! errors: an availability check that cannot be answered is `Unverified`, a
//! create that cannot be completed is a `Failure`, and a listing that cannot be
//! fetched comes back empty with its error set.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::{Result, WrapErr, eyre};
use reqwest::{Client, StatusCode};
use roombook_core::{
    models::{
        api::{ApiResponse, AvailabilityResponse, CreateReservationRequest},
        booking::{Availability, BookingOutcome, FailureReason, ReservationListing},
        reservation::{NewReservation, Reservation},
        time_slot::SlotTime,
    },
    services::{BookingBackend, listing::LISTING_FAILED_MESSAGE},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Reads the response envelope, whatever the status code.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(StatusCode, ApiResponse<T>)> {
    let status = response.status();
    let body = response
        .json::<ApiResponse<T>>()
        .await
        .wrap_err_with(|| format!("Unreadable response body (HTTP {status})"))?;
    Ok((status, body))
}

#[async_trait]
impl BookingBackend for ApiClient {
    async fn check_availability(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> Availability {
        let request = self
            .http
            .get(self.url("/api/availability"))
            .query(&[
                ("date", date.to_string()),
                ("startTime", start.to_string()),
                ("endTime", end.to_string()),
            ])
            .send();

        let result = match request.await {
            Ok(response) => read_envelope::<AvailabilityResponse>(response).await,
            Err(e) => Err(eyre!(e)),
        };

        match result {
            Ok((_, ApiResponse { data: Some(data), .. })) => data.into(),
            Ok((status, body)) => {
                let reason = body
                    .error
                    .unwrap_or_else(|| format!("availability request failed (HTTP {status})"));
                warn!("Availability check rejected: {}", reason);
                Availability::Unverified(reason)
            }
            Err(e) => {
                warn!("Availability check failed: {:#}", e);
                Availability::Unverified(e.to_string())
            }
        }
    }

    async fn create_reservation(&self, reservation: &NewReservation) -> BookingOutcome {
        let payload = CreateReservationRequest::from(reservation);
        let request = self
            .http
            .post(self.url("/api/reservations"))
            .json(&payload)
            .send();

        let (status, body) = match request.await {
            Ok(response) => match read_envelope::<Reservation>(response).await {
                Ok(parts) => parts,
                Err(e) => return transport_failure(e),
            },
            Err(e) => return transport_failure(eyre!(e)),
        };

        debug!("Create reservation answered with HTTP {}", status);
        match (status, body) {
            (_, ApiResponse { data: Some(created), success: true, .. }) => {
                BookingOutcome::Success(created)
            }
            (status, body) if status == StatusCode::CONFLICT => {
                BookingOutcome::Conflict(body.conflicts)
            }
            (_, ApiResponse { failure: Some(reason), .. }) => BookingOutcome::Failure(reason),
            (status, body) => transport_failure(eyre!(
                "{}",
                body.error
                    .unwrap_or_else(|| format!("unexpected HTTP {status}"))
            )),
        }
    }

    async fn list_reservations(&self) -> ReservationListing {
        let request = self.http.get(self.url("/api/reservations")).send();

        let result = match request.await {
            Ok(response) => read_envelope::<Vec<Reservation>>(response).await,
            Err(e) => Err(eyre!(e)),
        };

        match result {
            Ok((_, ApiResponse { data: Some(reservations), success: true, .. })) => {
                ReservationListing {
                    reservations,
                    error: None,
                }
            }
            Ok((status, body)) => {
                warn!(
                    "Reservation listing failed (HTTP {}): {}",
                    status,
                    body.error.unwrap_or_default()
                );
                ReservationListing::failed(LISTING_FAILED_MESSAGE)
            }
            Err(e) => {
                warn!("Reservation listing failed: {:#}", e);
                ReservationListing::failed(LISTING_FAILED_MESSAGE)
            }
        }
    }
}

fn transport_failure(error: eyre::Report) -> BookingOutcome {
    warn!("Reservation request failed: {:#}", error);
    BookingOutcome::Failure(FailureReason::Transport {
        detail: error.to_string(),
    })
}
