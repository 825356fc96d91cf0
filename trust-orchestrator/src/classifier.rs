use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ClassificationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Trusted,
    Untrusted,
}

impl Verdict {
    pub fn is_trusted(self) -> bool {
        matches!(self, Verdict::Trusted)
    }
}

/// Outcome of an external trust judgment on a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    /// Short label returned by the judge, e.g. "Trusted".
    pub label: String,
    pub analysis: String,
    pub content: String,
}

#[async_trait]
pub trait TrustClassifier: Send + Sync {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError>;
}

#[derive(Deserialize)]
struct JudgeResponse {
    output: Option<JudgeOutput>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct JudgeOutput {
    #[serde(rename = "Analysis")]
    analysis: Option<String>,
    #[serde(rename = "GPT_Analysis", default)]
    gpt_analysis: Option<String>,
}

/// Turns a judge response body into a classification.
pub fn parse_judge_response(body: &str) -> Result<Classification, ClassificationError> {
    let parsed: JudgeResponse =
        serde_json::from_str(body).map_err(|e| ClassificationError::Malformed(e.to_string()))?;
    let output = parsed
        .output
        .ok_or_else(|| ClassificationError::Malformed("missing output".to_string()))?;
    let label = output
        .analysis
        .ok_or_else(|| ClassificationError::Malformed("missing output.Analysis".to_string()))?;

    let verdict = if label == "Trusted" {
        Verdict::Trusted
    } else {
        Verdict::Untrusted
    };

    Ok(Classification {
        verdict,
        label,
        analysis: output.gpt_analysis.unwrap_or_default(),
        content: parsed.content.unwrap_or_default(),
    })
}

/// Calls the AI verification service over HTTP.
pub struct HttpClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClassificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl TrustClassifier for HttpClassifier {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        info!(url, endpoint = %self.endpoint, "Requesting trust classification");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Classifier rejected request");
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_judge_response(&body)
    }
}
