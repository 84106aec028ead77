//! Image judgment backends.
//!
//! The gate sends the evidence image, its MIME type and the claimed action
//! to a judge and receives a [`JudgmentVerdict`]. Backends are dispatched
//! through an enum rather than a trait object because async methods are not
//! dyn-compatible.
//!
//! Callers should go through [`judge_or_unavailable`], which turns every
//! failure (transport, non-2xx, malformed body) into the same negative
//! verdict. A judge outage must never award points and never surface as an
//! error to the user.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use shamrock_types::{ActionDefinition, JudgmentVerdict};
use tracing::{info, warn};

use crate::config::{JudgeBackendType, JudgeConfig};
use crate::error::VerifyError;
use crate::prompt::PromptEngine;

/// Message shown whenever the judge could not be reached or understood.
pub const UNAVAILABLE_MESSAGE: &str =
    "The verification system is currently unavailable. Please try again shortly.";

/// MIME type assumed when a raw base64 payload carries none.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// The verdict returned when the judge fails.
pub fn unavailable_verdict() -> JudgmentVerdict {
    JudgmentVerdict {
        verified: false,
        message: UNAVAILABLE_MESSAGE.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// A photo submitted as evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
}

impl EvidenceImage {
    /// Decode a `data:<mime>;base64,<payload>` URL or a bare base64 payload.
    ///
    /// A bare payload is assumed to be [`DEFAULT_MIME_TYPE`].
    pub fn from_data_url(input: &str) -> Result<Self, VerifyError> {
        let input = input.trim();
        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    VerifyError::InvalidImage("data URL has no payload".to_owned())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    VerifyError::InvalidImage("data URL is not base64 encoded".to_owned())
                })?;
                (mime, payload)
            }
            None => (DEFAULT_MIME_TYPE, input),
        };
        if !mime_type.starts_with("image/") {
            return Err(VerifyError::InvalidImage(format!(
                "unsupported media type {mime_type}"
            )));
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| VerifyError::InvalidImage(format!("bad base64 payload: {e}")))?;
        if bytes.is_empty() {
            return Err(VerifyError::InvalidImage("image is empty".to_owned()));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.to_owned(),
        })
    }

    /// The image bytes as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// A backend that can judge an evidence image.
#[derive(Debug)]
pub enum JudgeBackend {
    /// Google Gemini `generateContent`.
    Gemini(GeminiJudge),
    /// Approves every claim.
    Stub(StubJudge),
    /// No backend configured.
    Disabled,
}

impl JudgeBackend {
    /// Judge `image` as evidence of `action`.
    pub async fn judge(
        &self,
        image: &EvidenceImage,
        action: &ActionDefinition,
        quantity: Option<u64>,
    ) -> Result<JudgmentVerdict, VerifyError> {
        match self {
            Self::Gemini(backend) => backend.judge(image, action, quantity).await,
            Self::Stub(backend) => Ok(backend.judge(action)),
            Self::Disabled => Err(VerifyError::JudgeBackend(
                "no judge backend configured".to_owned(),
            )),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::Stub(_) => "stub",
            Self::Disabled => "disabled",
        }
    }
}

/// Judge and collapse every failure into [`unavailable_verdict`].
pub async fn judge_or_unavailable(
    backend: &JudgeBackend,
    image: &EvidenceImage,
    action: &ActionDefinition,
    quantity: Option<u64>,
) -> JudgmentVerdict {
    match backend.judge(image, action, quantity).await {
        Ok(verdict) => {
            info!(
                backend = backend.name(),
                action = %action.kind,
                verified = verdict.verified,
                "Evidence judged"
            );
            verdict
        }
        Err(e) => {
            warn!(
                backend = backend.name(),
                action = %action.kind,
                error = %e,
                "Judge call failed, returning unavailable verdict"
            );
            unavailable_verdict()
        }
    }
}

// ---------------------------------------------------------------------------
// Gemini backend
// ---------------------------------------------------------------------------

/// Backend for the Gemini `generateContent` API.
///
/// Sends the rendered prompt and the inline image to
/// `{api_url}/models/{model}:generateContent` and asks for a JSON body
/// matching the verdict schema.
#[derive(Debug)]
pub struct GeminiJudge {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    prompts: PromptEngine,
}

impl GeminiJudge {
    /// Create a new Gemini backend.
    pub fn new(config: &JudgeConfig) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VerifyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            prompts: PromptEngine::from_config(config)?,
        })
    }

    fn request_body(&self, image: &EvidenceImage, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [
                    {"text": prompt},
                    {"inline_data": {"mime_type": image.mime_type, "data": image.to_base64()}}
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "verified": {"type": "BOOLEAN"},
                        "message": {"type": "STRING"}
                    },
                    "required": ["verified", "message"]
                }
            }
        })
    }

    async fn judge(
        &self,
        image: &EvidenceImage,
        action: &ActionDefinition,
        quantity: Option<u64>,
    ) -> Result<JudgmentVerdict, VerifyError> {
        let prompt = self.prompts.render(action, quantity)?;
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(image, &prompt))
            .send()
            .await
            .map_err(|e| VerifyError::JudgeBackend(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(VerifyError::JudgeBackend(format!(
                "Gemini returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VerifyError::Parse(format!("Gemini response parse failed: {e}")))?;

        parse_verdict(&extract_gemini_text(&json)?)
    }
}

/// Extract the text part from a Gemini `generateContent` response.
fn extract_gemini_text(json: &serde_json::Value) -> Result<String, VerifyError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            VerifyError::Parse("Gemini response missing candidates[0].content.parts[0].text".to_owned())
        })
}

/// Parse the model's JSON text into a verdict.
fn parse_verdict(text: &str) -> Result<JudgmentVerdict, VerifyError> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed)
        .map_err(|e| VerifyError::Parse(format!("verdict is not valid JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

/// A judge that approves every claim without looking at the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubJudge;

impl StubJudge {
    /// Create a new stub judge.
    pub const fn new() -> Self {
        Self
    }

    fn judge(self, action: &ActionDefinition) -> JudgmentVerdict {
        JudgmentVerdict {
            verified: true,
            message: format!("{} confirmed. Go raibh maith agat!", action.title),
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a judge backend from configuration.
///
/// A Gemini backend without an API key is created as [`JudgeBackend::Disabled`].
pub fn create_backend(config: &JudgeConfig) -> Result<JudgeBackend, VerifyError> {
    let backend = match config.backend {
        JudgeBackendType::Gemini if config.api_key.is_empty() => {
            warn!("GEMINI_API_KEY not set, evidence verification is disabled");
            JudgeBackend::Disabled
        }
        JudgeBackendType::Gemini => JudgeBackend::Gemini(GeminiJudge::new(config)?),
        JudgeBackendType::Stub => JudgeBackend::Stub(StubJudge::new()),
        JudgeBackendType::Disabled => JudgeBackend::Disabled,
    };
    Ok(backend)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shamrock_progression::Catalog;
    use shamrock_types::ActionKind;

    use super::*;

    fn rubbish() -> ActionDefinition {
        Catalog::default()
            .action(ActionKind::PickUpRubbish)
            .cloned()
            .unwrap_or_else(|| ActionDefinition {
                kind: ActionKind::PickUpRubbish,
                title: String::new(),
                description: String::new(),
                icon: String::new(),
                reward: shamrock_types::ActionReward::Fixed { points: 100 },
            })
    }

    fn image() -> EvidenceImage {
        EvidenceImage {
            bytes: vec![0xFF, 0xD8, 0xFF],
            mime_type: DEFAULT_MIME_TYPE.to_owned(),
        }
    }

    #[test]
    fn extract_gemini_text_valid() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"verified\": true, \"message\": \"Maith thú!\"}"}]
                }
            }]
        });
        let verdict = extract_gemini_text(&json).and_then(|t| parse_verdict(&t));
        assert!(verdict.is_ok_and(|v| v.verified && v.message == "Maith thú!"));
    }

    #[test]
    fn extract_gemini_text_missing() {
        let json = serde_json::json!({"candidates": []});
        assert!(matches!(extract_gemini_text(&json), Err(VerifyError::Parse(_))));
    }

    #[test]
    fn parse_verdict_strips_code_fences() {
        let verdict = parse_verdict("```json\n{\"verified\": false, \"message\": \"No rubbish visible.\"}\n```");
        assert!(verdict.is_ok_and(|v| !v.verified));
        assert!(parse_verdict("not json").is_err());
    }

    #[test]
    fn data_url_decodes() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode([1_u8, 2, 3]));
        let image = EvidenceImage::from_data_url(&url);
        assert!(image.is_ok_and(|i| i.mime_type == "image/png" && i.bytes == vec![1, 2, 3]));

        let bare = EvidenceImage::from_data_url(&STANDARD.encode([9_u8]));
        assert!(bare.is_ok_and(|i| i.mime_type == DEFAULT_MIME_TYPE));
    }

    #[test]
    fn bad_images_are_rejected() {
        assert!(EvidenceImage::from_data_url("data:image/png;base64,@@@").is_err());
        assert!(EvidenceImage::from_data_url("data:video/mp4;base64,AAAA").is_err());
        assert!(EvidenceImage::from_data_url("data:image/png,AAAA").is_err());
        assert!(EvidenceImage::from_data_url("").is_err());
    }

    #[test]
    fn create_backend_dispatches_correctly() {
        let mut config = JudgeConfig::default();
        assert_eq!(create_backend(&config).map(|b| b.name()).ok(), Some("disabled"));

        config.api_key = "test".to_owned();
        assert_eq!(create_backend(&config).map(|b| b.name()).ok(), Some("gemini"));

        config.backend = JudgeBackendType::Stub;
        assert_eq!(create_backend(&config).map(|b| b.name()).ok(), Some("stub"));
    }

    #[test]
    fn gemini_prompt_comes_from_the_configured_templates_dir() {
        let dir = std::env::temp_dir().join(format!("help-ireland-judge-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("evidence.j2"), "Is this {{ title }}? Answer as JSON.").unwrap();

        let config = JudgeConfig {
            api_key: "test".to_owned(),
            templates_dir: Some(dir.to_string_lossy().into_owned()),
            ..JudgeConfig::default()
        };
        let judge = GeminiJudge::new(&config).unwrap();
        let prompt = judge.prompts.render(&rubbish(), None).unwrap();
        assert_eq!(prompt, format!("Is this {}? Answer as JSON.", rubbish().title));
        std::fs::remove_dir_all(&dir).unwrap();

        let missing = JudgeConfig {
            templates_dir: Some("/nonexistent/help-ireland/templates".to_owned()),
            ..config
        };
        assert!(matches!(GeminiJudge::new(&missing), Err(VerifyError::Template(_))));
    }

    #[tokio::test]
    async fn disabled_backend_yields_unavailable_verdict() {
        let verdict = judge_or_unavailable(&JudgeBackend::Disabled, &image(), &rubbish(), None).await;
        assert!(!verdict.verified);
        assert_eq!(verdict.message, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_judge_yields_unavailable_verdict() {
        let config = JudgeConfig {
            api_url: "http://127.0.0.1:1".to_owned(),
            api_key: "test".to_owned(),
            timeout_ms: 2_000,
            ..JudgeConfig::default()
        };
        let backend = create_backend(&config).unwrap();
        let verdict = judge_or_unavailable(&backend, &image(), &rubbish(), None).await;
        assert_eq!(verdict, unavailable_verdict());
    }

    #[tokio::test]
    async fn stub_backend_approves() {
        let backend = JudgeBackend::Stub(StubJudge::new());
        let verdict = judge_or_unavailable(&backend, &image(), &rubbish(), None).await;
        assert!(verdict.verified);
    }
}
