/// Sentiment classifier client.
///
/// All three-way sentiment classification goes through `SentimentClassifier`.
/// The production implementation calls a hosted RoBERTa sentiment model over HTTP;
/// tests swap in stubs through the trait object held in `AppState`.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::{ScoreError, SentimentLabel, SentimentScores};

pub const DEFAULT_SENTIMENT_API_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
/// Trimmed text shorter than this is not sent to the model.
pub const MIN_CLASSIFIABLE_CHARS: usize = 3;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classifier API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected classifier output: {0}")]
    UnexpectedShape(String),

    #[error("Invalid classifier scores: {0}")]
    InvalidScores(#[from] ScoreError),

    #[error("Classifier unavailable after {retries} attempts")]
    Exhausted { retries: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub scores: SentimentScores,
}

impl Classification {
    pub fn neutral_baseline() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            scores: SentimentScores::NEUTRAL_BASELINE,
        }
    }

    /// Score of the primary label.
    pub fn confidence(&self) -> f64 {
        self.scores.get(self.label)
    }
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}

/// Classifies `text`, short-circuiting near-empty input to the neutral baseline.
pub async fn classify_text(
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<Classification, ClassifierError> {
    if text.trim().chars().count() < MIN_CLASSIFIABLE_CHARS {
        debug!("Text too short to classify; using neutral baseline");
        return Ok(Classification::neutral_baseline());
    }
    classifier.classify(text).await
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The inference API wraps results per input; some deployments return them flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// HTTP client for the hosted sentiment model.
#[derive(Clone)]
pub struct HttpSentimentClassifier {
    client: Client,
    api_url: String,
    api_token: String,
}

impl HttpSentimentClassifier {
    pub fn new(api_url: String, api_token: String) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_url,
            api_token,
        })
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    /// Retries transport errors, 429 and 5xx (503 while the model loads)
    /// with exponential backoff.
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let request_body = InferenceRequest { inputs: text };
        let mut last_error: Option<ClassifierError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Sentiment classification attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_token)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ClassifierError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Sentiment API returned {}: {}", status, body);
                last_error = Some(ClassifierError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            let body = response.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<InferenceError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(ClassifierError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let classification = parse_inference_response(&body)?;
            debug!(
                "Sentiment classified as {} ({:.3})",
                classification.label,
                classification.confidence()
            );
            return Ok(classification);
        }

        Err(last_error.unwrap_or(ClassifierError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

/// Maps the model's label/score list onto a validated three-way distribution.
fn parse_inference_response(body: &str) -> Result<Classification, ClassifierError> {
    let entries = match serde_json::from_str::<InferenceResponse>(body)? {
        InferenceResponse::Nested(mut outer) => {
            if outer.is_empty() {
                return Err(ClassifierError::UnexpectedShape("empty result".to_string()));
            }
            outer.swap_remove(0)
        }
        InferenceResponse::Flat(entries) => entries,
    };

    if entries.is_empty() {
        return Err(ClassifierError::UnexpectedShape(
            "no label scores".to_string(),
        ));
    }

    let mut scores = SentimentScores {
        negative: 0.0,
        neutral: 0.0,
        positive: 0.0,
    };
    for entry in entries {
        match model_label(&entry.label)? {
            SentimentLabel::Negative => scores.negative = entry.score,
            SentimentLabel::Neutral => scores.neutral = entry.score,
            SentimentLabel::Positive => scores.positive = entry.score,
        }
    }
    scores.validate()?;

    Ok(Classification {
        label: scores.primary_label(),
        scores,
    })
}

/// Accepts both named labels and the raw `LABEL_n` ids of the cardiffnlp model.
fn model_label(raw: &str) -> Result<SentimentLabel, ClassifierError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "LABEL_0" => Ok(SentimentLabel::Negative),
        "LABEL_1" => Ok(SentimentLabel::Neutral),
        "LABEL_2" => Ok(SentimentLabel::Positive),
        _ => raw
            .parse()
            .map_err(|_| ClassifierError::UnexpectedShape(format!("unknown label '{raw}'"))),
    }
}
