use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use vocab_core::model::{ItemType, Question, QuestionId, ResponseBuffer, SessionConfig, TestKind};

use crate::api_config::ApiConfig;
use crate::error::SubmitError;

/// One question paired with the learner's sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedResponse {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub text: String,
    pub user_sentence: String,
    pub example_sentence: String,
}

/// Body posted to the submit endpoint. Built once at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    test_type: TestKind,
    responses: Vec<SubmittedResponse>,
}

impl SubmissionPayload {
    /// Pairs every question with its response, in question order.
    ///
    /// Missing responses become empty strings, as do missing examples.
    #[must_use]
    pub fn build(kind: TestKind, questions: &[Question], responses: &ResponseBuffer) -> Self {
        let responses = questions
            .iter()
            .enumerate()
            .map(|(index, question)| SubmittedResponse {
                id: question.id().clone(),
                item_type: question.item_type().clone(),
                text: question.text().to_string(),
                user_sentence: responses.get(index).unwrap_or_default().to_string(),
                example_sentence: question.example().unwrap_or_default().to_string(),
            })
            .collect();
        Self {
            test_type: kind,
            responses,
        }
    }

    #[must_use]
    pub fn test_type(&self) -> TestKind {
        self.test_type
    }

    #[must_use]
    pub fn responses(&self) -> &[SubmittedResponse] {
        &self.responses
    }
}

/// What the submit endpoint returns on success.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    /// Opaque result document, kept for download.
    pub result: Value,
    pub download_filename: Option<String>,
    pub message: Option<String>,
}

/// Anything that accepts a finished test.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Send `payload` once. Implementations must not retry.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` on transport failure or a response not flagged as success.
    async fn submit(
        &self,
        config: &SessionConfig,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResult, SubmitError>;
}

/// Posts payloads to the vocabulary JSON API.
#[derive(Clone)]
pub struct HttpSubmitter {
    client: Client,
    api: ApiConfig,
}

impl HttpSubmitter {
    #[must_use]
    pub fn new(api: ApiConfig) -> Self {
        Self::with_client(Client::new(), api)
    }

    #[must_use]
    pub fn with_client(client: Client, api: ApiConfig) -> Self {
        Self { client, api }
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(
        &self,
        config: &SessionConfig,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResult, SubmitError> {
        let url = self.api.url_for(config.submit_endpoint());
        debug!(%url, responses = payload.responses.len(), "submitting test");

        let response = self.client.post(&url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(SubmitError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let parsed: SubmitResponse = serde_json::from_slice(&body)?;
        if !parsed.success {
            return Err(SubmitError::Rejected {
                message: parsed
                    .message
                    .unwrap_or_else(|| "Failed to submit test".into()),
            });
        }

        let result = parsed
            .result
            .or(parsed.test_result)
            .ok_or(SubmitError::MissingResult)?;
        Ok(SubmitResult {
            result,
            download_filename: parsed.download_filename,
            message: parsed.message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    test_result: Option<Value>,
    #[serde(default)]
    download_filename: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
