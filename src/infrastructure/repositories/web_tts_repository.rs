use super::text_batches::{preview, split_into_batches};
use super::tts_repository::TtsRepository;
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use async_trait::async_trait;
use std::time::Duration;

/// The web endpoint rejects queries longer than this
const MAX_BATCH_SIZE: usize = 200;

/// Regional hosts tried in order, one per attempt
pub const DEFAULT_REGIONAL_TLDS: &[&str] = &["com.ng", "co.uk", "com"];

/// Free web synthesis endpoint (MP3 only).
///
/// `url_template` contains a `{tld}` placeholder; each retry attempt
/// substitutes the next regional top-level domain.
pub struct WebTtsRepository {
    http: reqwest::Client,
    url_template: String,
    regional_tlds: Vec<String>,
}

impl WebTtsRepository {
    pub fn new(url_template: String, timeout: Duration) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; naija-tts-backend)")
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            url_template,
            regional_tlds: DEFAULT_REGIONAL_TLDS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_regional_tlds(mut self, tlds: Vec<String>) -> Self {
        if !tlds.is_empty() {
            self.regional_tlds = tlds;
        }
        self
    }

    fn endpoint_for_attempt(&self, attempt: u32) -> String {
        let tld = &self.regional_tlds[attempt as usize % self.regional_tlds.len()];
        self.url_template.replace("{tld}", tld)
    }

    /// The web service wants a bare language code ("en", not "en-NG")
    fn language_code(language: &str) -> &str {
        language.split(['-', '_']).next().unwrap_or(language)
    }

    async fn fetch_batch(
        &self,
        endpoint: &str,
        text: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, String> {
        let response = self
            .http
            .get(endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
                ("total", &total.to_string()),
                ("idx", &index.to_string()),
                ("textlen", &text.chars().count().to_string()),
            ])
            .send()
            .await
            .map_err(|e| format!("web TTS request to {} failed: {}", endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("web TTS {} returned HTTP {}", endpoint, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("web TTS body read failed: {}", e))?;

        if bytes.is_empty() {
            return Err(format!("web TTS {} returned an empty body", endpoint));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for WebTtsRepository {
    fn name(&self) -> &'static str {
        "web"
    }

    fn max_attempts(&self) -> u32 {
        self.regional_tlds.len() as u32
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        let endpoint = self.endpoint_for_attempt(request.attempt);
        let language = Self::language_code(&request.language);
        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);

        tracing::info!(
            endpoint = %endpoint,
            attempt = request.attempt,
            language = language,
            batch_count = batches.len(),
            text_preview = %preview(&request.text),
            "Calling web TTS endpoint"
        );

        let mut merged = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            merged.extend(
                self.fetch_batch(&endpoint, batch, language, index, batches.len())
                    .await?,
            );
        }

        Ok(EngineAudio {
            bytes: merged,
            format: OutputFormat::Mp3,
        })
    }
}
