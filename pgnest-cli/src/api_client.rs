use pgnest_core::chat::{ChatReply, ChatRequest};
use pgnest_core::models::{
    AuditQuery, BlacklistRequest, Booking, BookingStatus, BookingStatusUpdate, NewBooking,
    NewPromotionRequest, OwnerPromotionRequest, Property, PropertyQuery, PromotionFilter,
    PromotionReview, ReviewDecision, User, UserFilter,
};
use pgnest_core::services::DashboardStats;
use pgnest_http::models::{
    AuditLogResponse, BookingListResponse, PromotionListResponse, PropertySearchResponse,
    UserListResponse,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Thin typed wrapper over the `/api/v1` endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            request
        } else {
            request.bearer_auth(key)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> CliResult<T> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        debug!("{} {}", status, response.url());
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    async fn send_empty(&self, request: RequestBuilder) -> CliResult<()> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    pub async fn health_check(&self) -> CliResult<()> {
        let url = format!("{}/health", self.base_url);
        self.send_empty(self.client.get(url)).await
    }

    pub async fn me(&self) -> CliResult<User> {
        self.send(self.client.get(self.url("/me"))).await
    }

    pub async fn search_properties(
        &self,
        query: &PropertyQuery,
    ) -> CliResult<PropertySearchResponse> {
        self.send(self.client.get(self.url("/properties")).query(query))
            .await
    }

    pub async fn get_property(&self, id: &str) -> CliResult<Property> {
        self.send(self.client.get(self.url(&format!("/properties/{}", id))))
            .await
    }

    pub async fn chat(&self, message: &str) -> CliResult<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        self.send(self.client.post(self.url("/chat")).json(&body))
            .await
    }

    pub async fn my_bookings(&self) -> CliResult<BookingListResponse> {
        self.send(self.client.get(self.url("/bookings"))).await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> CliResult<Booking> {
        self.send(self.client.post(self.url("/bookings")).json(booking))
            .await
    }

    pub async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> CliResult<Booking> {
        let url = self.url(&format!("/bookings/{}/status", id));
        self.send(self.client.patch(url).json(&BookingStatusUpdate { status }))
            .await
    }

    pub async fn request_promotion(
        &self,
        request: &NewPromotionRequest,
    ) -> CliResult<OwnerPromotionRequest> {
        self.send(self.client.post(self.url("/promotion-requests")).json(request))
            .await
    }

    pub async fn list_users(&self, filter: &UserFilter) -> CliResult<UserListResponse> {
        self.send(self.client.get(self.url("/admin/users")).query(filter))
            .await
    }

    pub async fn blacklist_user(&self, id: &str, reason: &str) -> CliResult<User> {
        let url = self.url(&format!("/admin/users/{}/blacklist", id));
        let body = BlacklistRequest {
            reason: reason.to_string(),
        };
        self.send(self.client.post(url).json(&body)).await
    }

    pub async fn unblacklist_user(&self, id: &str) -> CliResult<User> {
        let url = self.url(&format!("/admin/users/{}/blacklist", id));
        self.send(self.client.delete(url)).await
    }

    pub async fn review_property(
        &self,
        id: &str,
        decision: &ReviewDecision,
    ) -> CliResult<Property> {
        let url = self.url(&format!("/admin/properties/{}/review", id));
        self.send(self.client.post(url).json(decision)).await
    }

    pub async fn promotion_requests(
        &self,
        filter: &PromotionFilter,
    ) -> CliResult<PromotionListResponse> {
        self.send(self.client.get(self.url("/admin/promotion-requests")).query(filter))
            .await
    }

    pub async fn review_promotion(
        &self,
        id: &str,
        review: &PromotionReview,
    ) -> CliResult<OwnerPromotionRequest> {
        let url = self.url(&format!("/admin/promotion-requests/{}/review", id));
        self.send(self.client.post(url).json(review)).await
    }

    pub async fn audit_logs(&self, query: &AuditQuery) -> CliResult<AuditLogResponse> {
        self.send(self.client.get(self.url("/admin/audit-logs")).query(query))
            .await
    }

    pub async fn stats(&self) -> CliResult<DashboardStats> {
        self.send(self.client.get(self.url("/admin/stats"))).await
    }
}

/// Prefer the server's `{"error": ...}` message over the raw body.
fn api_error(status: StatusCode, body: &str) -> CliError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    CliError::Api {
        status: status.as_u16(),
        message,
    }
}
