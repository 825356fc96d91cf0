use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::trust::TrustTier;

/// One verification record per source URL. The URL doubles as the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub trust_tier: TrustTier,
    pub query_count: i32,
    pub verification_priority: i32,
    pub content: Option<String>,
    pub last_analysis: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, trust_tier: TrustTier) -> Self {
        Self {
            id: id.into(),
            trust_tier,
            query_count: 0,
            verification_priority: 0,
            content: None,
            last_analysis: None,
        }
    }

    /// Captured content, treating an empty string the same as none.
    pub fn usable_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Raw row of `verification_records`.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub trust_tier: i32,
    pub query_count: i32,
    pub verification_priority: i32,
    pub content: Option<String>,
    pub last_analysis: Option<String>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let trust_tier = TrustTier::from_level(row.trust_tier).ok_or_else(|| StoreError::InvalidTier {
            id: row.id.clone(),
            level: row.trust_tier,
        })?;
        Ok(Document {
            id: row.id,
            trust_tier,
            query_count: row.query_count,
            verification_priority: row.verification_priority,
            content: row.content,
            last_analysis: row.last_analysis,
        })
    }
}

// API Request/Response models
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub prompt: Option<String>,
    #[serde(default)]
    pub trusted_urls: Vec<String>,
    #[serde(default)]
    pub untrusted_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub usage: Option<TokenUsage>,
    pub has_context: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotCheckDecision {
    pub url: Option<String>,
    pub is_trusted: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub is_trusted: bool,
    pub verification_level: TrustTier,
    pub preserved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResponse {
    pub success: bool,
    pub verification_level: TrustTier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotCheckResponse {
    pub success: bool,
    pub analysis: String,
    pub gpt_analysis: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDocSummary {
    pub id: String,
    pub trust_level: TrustTier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDocView {
    pub id: String,
    pub content: Option<String>,
    pub trust_level: TrustTier,
}

#[derive(Debug, Serialize)]
pub struct PageContentResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}
