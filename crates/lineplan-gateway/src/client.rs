//! `ManufacturingApiGateway`: the real `Gateway` implementation over the
//! manufacturing system-of-record's REST API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use lineplan_core::{
    PhaseId, Product, ProductId, ProductionOrderId, ProductionPhase, SalesOrder, SalesOrderId, SalesOrderStatus,
};

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::retry::RetryPolicy;
use crate::types::{CreateProductionOrderRequest, SalesOrderUpdate};

/// Refreshes the bearer token used to authenticate against the
/// manufacturing API. Invoked once, silently, on `AuthExpired`.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<String, GatewayError>;
}

/// A `TokenRefresher` that always fails; used when no refresh endpoint is
/// configured and an expired token is therefore a permanent failure.
pub struct NoRefresh;

#[async_trait]
impl TokenRefresher for NoRefresh {
    async fn refresh(&self) -> Result<String, GatewayError> {
        Err(GatewayError::Permanent("no token refresher configured".into()))
    }
}

/// The real `Gateway`: a `reqwest::Client` plus bearer-token auth, retry
/// with capped exponential backoff, and one silent token refresh on
/// authentication expiry.
pub struct ManufacturingApiGateway {
    client: Client,
    base_url: String,
    token: RwLock<String>,
    retry_policy: RetryPolicy,
    token_refresher: Box<dyn TokenRefresher>,
}

impl ManufacturingApiGateway {
    /// `timeout` defaults to 30s when not overridden.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, token_refresher: Box<dyn TokenRefresher>) -> Result<Self, GatewayError> {
        Self::with_timeout(base_url, token, token_refresher, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        token_refresher: Box<dyn TokenRefresher>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| GatewayError::Permanent(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: RwLock::new(token.into()),
            retry_policy: RetryPolicy::default(),
            token_refresher,
        })
    }

    async fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.read().await)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn classify_status(status: StatusCode, body: &str) -> GatewayError {
        if status == StatusCode::UNAUTHORIZED {
            GatewayError::AuthExpired
        } else if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::TOO_MANY_REQUESTS {
            GatewayError::Transient(format!("{status}: {body}"))
        } else {
            GatewayError::Permanent(format!("{status}: {body}"))
        }
    }

    /// Run `op` through the retry policy, refreshing the token exactly once
    /// and retrying on `AuthExpired` before giving up.
    async fn call<F, Fut, T>(&self, op: F) -> Result<T, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, GatewayError>>,
    {
        let auth_refreshed = std::sync::atomic::AtomicBool::new(false);
        self.retry_policy
            .execute(|| async {
                match op().await {
                    Err(GatewayError::AuthExpired)
                        if !auth_refreshed.swap(true, std::sync::atomic::Ordering::SeqCst) =>
                    {
                        warn!("gateway token expired; refreshing");
                        let fresh = self.token_refresher.refresh().await?;
                        *self.token.write().await = fresh;
                        op().await
                    }
                    other => other,
                }
            })
            .await
    }
}

#[async_trait]
impl Gateway for ManufacturingApiGateway {
    #[instrument(skip(self))]
    async fn list_sales_orders(&self, status: SalesOrderStatus) -> Result<Vec<SalesOrder>, GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .get(self.url("/sales-orders"))
                .query(&[("status", status.to_string())])
                .header("Authorization", self.auth_header().await)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            let status_code = resp.status();
            let body = resp.text().await.map_err(|e| GatewayError::Transient(e.to_string()))?;
            if !status_code.is_success() {
                return Err(Self::classify_status(status_code, &body));
            }
            serde_json::from_str(&body).map_err(|e| GatewayError::Permanent(e.to_string()))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: &ProductId) -> Result<Product, GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .get(self.url(&format!("/products/{product_id}")))
                .header("Authorization", self.auth_header().await)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            let status_code = resp.status();
            let body = resp.text().await.map_err(|e| GatewayError::Transient(e.to_string()))?;
            if !status_code.is_success() {
                return Err(Self::classify_status(status_code, &body));
            }
            serde_json::from_str(&body).map_err(|e| GatewayError::Permanent(e.to_string()))
        })
        .await
    }

    #[instrument(skip(self, update))]
    async fn update_sales_order(&self, id: &SalesOrderId, update: SalesOrderUpdate) -> Result<(), GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .patch(self.url(&format!("/sales-orders/{id}")))
                .header("Authorization", self.auth_header().await)
                .json(&update)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            finish(resp).await
        })
        .await
    }

    #[instrument(skip(self, request))]
    async fn create_production_order(
        &self,
        request: CreateProductionOrderRequest,
    ) -> Result<ProductionOrderId, GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .post(self.url("/production-orders"))
                .header("Authorization", self.auth_header().await)
                .json(&request)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            let status_code = resp.status();
            let body = resp.text().await.map_err(|e| GatewayError::Transient(e.to_string()))?;
            if !status_code.is_success() {
                return Err(Self::classify_status(status_code, &body));
            }
            let value: serde_json::Value =
                serde_json::from_str(&body).map_err(|e| GatewayError::Permanent(e.to_string()))?;
            value["id"]
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| GatewayError::Permanent("response missing production order id".into()))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn schedule_production_order(&self, po_id: &ProductionOrderId) -> Result<Vec<ProductionPhase>, GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .post(self.url(&format!("/production-orders/{po_id}/schedule")))
                .header("Authorization", self.auth_header().await)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            let status_code = resp.status();
            let body = resp.text().await.map_err(|e| GatewayError::Transient(e.to_string()))?;
            if !status_code.is_success() {
                return Err(Self::classify_status(status_code, &body));
            }
            serde_json::from_str(&body).map_err(|e| GatewayError::Permanent(e.to_string()))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn update_phase_window(
        &self,
        phase_id: &PhaseId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .patch(self.url(&format!("/phases/{phase_id}/window")))
                .header("Authorization", self.auth_header().await)
                .json(&json!({ "starts_at": starts_at, "ends_at": ends_at }))
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            finish(resp).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn update_po_window(
        &self,
        po_id: &ProductionOrderId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .patch(self.url(&format!("/production-orders/{po_id}/window")))
                .header("Authorization", self.auth_header().await)
                .json(&json!({ "starts_at": starts_at, "ends_at": ends_at }))
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            finish(resp).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn confirm_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .post(self.url(&format!("/production-orders/{po_id}/confirm")))
                .header("Authorization", self.auth_header().await)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            finish(resp).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError> {
        self.call(|| async {
            let resp = self
                .client
                .delete(self.url(&format!("/production-orders/{po_id}")))
                .header("Authorization", self.auth_header().await)
                .send()
                .await
                .map_err(|e| GatewayError::Transient(e.to_string()))?;
            finish(resp).await
        })
        .await
    }
}

async fn finish(resp: reqwest::Response) -> Result<(), GatewayError> {
    let status_code = resp.status();
    if status_code.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ManufacturingApiGateway::classify_status(status_code, &body))
}
