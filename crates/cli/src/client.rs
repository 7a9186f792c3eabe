//! API client for a running workload-advisor service

use advisor_lib::{AdvisorConfig, PatternAnalysis, WorkloadAssessment, WorkloadSnapshot};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Error body returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest<'a> {
    pub workloads: &'a [WorkloadSnapshot],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<WorkloadAssessment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternRequest<'a> {
    pub instance_id: &'a str,
    pub cpu_utilization: &'a [advisor_lib::MetricPoint],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_utilization: Option<&'a [advisor_lib::MetricPoint]>,
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub async fn classify(&self, snapshot: &WorkloadSnapshot) -> Result<WorkloadAssessment> {
        self.post("v1/classify", snapshot).await
    }

    pub async fn classify_batch(
        &self,
        workloads: &[WorkloadSnapshot],
    ) -> Result<Vec<WorkloadAssessment>> {
        let response: BatchResponse = self
            .post("v1/classify/batch", &BatchRequest { workloads })
            .await?;
        Ok(response.results)
    }

    pub async fn patterns(&self, snapshot: &WorkloadSnapshot) -> Result<PatternAnalysis> {
        let request = PatternRequest {
            instance_id: &snapshot.instance_id,
            cpu_utilization: &snapshot.cpu_utilization,
            memory_utilization: (!snapshot.memory_utilization.is_empty())
                .then_some(snapshot.memory_utilization.as_slice()),
        };
        self.post("v1/patterns", &request).await
    }

    pub async fn config(&self) -> Result<AdvisorConfig> {
        self.get("v1/config").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}
