use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use vocab_core::model::{HttpMethod, Question, SessionConfig};

use crate::api_config::ApiConfig;
use crate::error::LoadError;

/// Anything that can hand a session its questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the questions for a session described by `config`.
    ///
    /// An empty list is a valid answer; deciding what to show for it is the
    /// session's job.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on transport failure, a malformed payload, or a
    /// payload flagged `success: false`.
    async fn fetch_questions(&self, config: &SessionConfig) -> Result<Vec<Question>, LoadError>;
}

/// Fetches questions from the vocabulary JSON API.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    api: ApiConfig,
}

impl HttpQuestionSource {
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
impl QuestionSource for HttpQuestionSource {
    async fn fetch_questions(&self, config: &SessionConfig) -> Result<Vec<Question>, LoadError> {
        let endpoint = config.questions_endpoint();
        let url = self.api.url_for(endpoint);
        debug!(%url, kind = %config.kind(), "fetching questions");

        let request = match endpoint.method {
            HttpMethod::Get => self
                .client
                .get(&url)
                .header(CONTENT_TYPE, "application/json"),
            HttpMethod::Post => self.client.post(&url).json(&serde_json::Map::new()),
        };
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let parsed: QuestionsResponse = serde_json::from_slice(&body)?;
        if !parsed.success {
            return Err(LoadError::Rejected {
                message: parsed
                    .message
                    .unwrap_or_else(|| "Failed to load questions".into()),
            });
        }

        let fetched = parsed.questions.len();
        let questions: Vec<Question> = parsed
            .questions
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Question>(record) {
                Ok(question) => Some(question),
                Err(err) => {
                    warn!(error = %err, "skipping unusable question record");
                    None
                }
            })
            .collect();
        debug!(fetched, kept = questions.len(), "questions fetched");
        Ok(questions)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    success: bool,
    #[serde(default)]
    questions: Vec<Value>,
    #[serde(default)]
    message: Option<String>,
}
