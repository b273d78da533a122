//! A reqwest-backed `AiAdvisor` that calls a chat-completions-shaped
//! endpoint. Times out at 60s and lets the orchestrator's EDF fallback
//! handle anything else.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use lineplan_orchestrator::{AiAdvice, AiAdviceRequest, AiAdvisor, AIError, PriorityUpdate};

pub struct HttpAiAdvisor {
    client: Client,
    api_key: String,
    model: String,
}

impl HttpAiAdvisor {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder().timeout(Duration::from_secs(60)).build().expect("reqwest client config is valid");
        Self { client, api_key, model }
    }
}

#[derive(Serialize)]
struct AdviceRequestBody {
    model: String,
    operator_text: Option<String>,
    edf_baseline: Vec<String>,
    pending_order_ids: Vec<String>,
}

#[derive(Deserialize)]
struct AdviceResponseBody {
    ordering: Vec<String>,
    #[serde(default)]
    priority_updates: Vec<PriorityUpdateBody>,
    explanation: String,
}

#[derive(Deserialize)]
struct PriorityUpdateBody {
    sales_order_id: String,
    priority: i32,
}

#[async_trait]
impl AiAdvisor for HttpAiAdvisor {
    async fn advise(&self, request: AiAdviceRequest) -> Result<AiAdvice, AIError> {
        let body = AdviceRequestBody {
            model: self.model.clone(),
            operator_text: request.operator_text,
            edf_baseline: request.edf_baseline,
            pending_order_ids: request.pending_orders.iter().map(|o| o.id.clone()).collect(),
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/lineplan/advise")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AIError(format!("AI advisor request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AIError(format!("AI advisor returned status {}", response.status())));
        }

        let parsed: AdviceResponseBody =
            response.json().await.map_err(|e| AIError(format!("AI advisor returned an unparseable response: {e}")))?;

        Ok(AiAdvice {
            ordering: parsed.ordering,
            priority_updates: parsed
                .priority_updates
                .into_iter()
                .map(|u| PriorityUpdate { sales_order_id: u.sales_order_id, priority: u.priority })
                .collect(),
            explanation: parsed.explanation,
        })
    }
}
