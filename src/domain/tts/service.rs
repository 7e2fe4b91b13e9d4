use super::cascade::EngineCascade;
use super::dto::{SynthesisRequest, TtsSynthesisResult};
use super::error::TtsServiceError;
use crate::domain::shared::usage_dto::{CacheStats, UsageSnapshot};
use crate::domain::voice::VoiceRegistry;
use crate::infrastructure::cache::{fingerprint, AudioCache, CachedAudio};
use crate::infrastructure::repositories::UsageRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct TtsService {
    voices: Arc<VoiceRegistry>,
    usage_repo: Arc<UsageRepository>,
    cascade: EngineCascade,
    cache: Option<AudioCache>,
}

impl TtsService {
    pub fn new(
        voices: Arc<VoiceRegistry>,
        usage_repo: Arc<UsageRepository>,
        cascade: EngineCascade,
        cache: Option<AudioCache>,
    ) -> Self {
        Self {
            voices,
            usage_repo,
            cascade,
            cache,
        }
    }

    pub fn engine_names(&self) -> Vec<String> {
        self.cascade.engine_names()
    }

    pub fn usage(&self) -> UsageSnapshot {
        self.usage_repo.snapshot()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            Some(cache) => CacheStats {
                enabled: true,
                entries: cache.entry_count().await,
                total_bytes: cache.total_bytes().await,
            },
            None => CacheStats::default(),
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize speech for a validated request
    ///
    /// This operation:
    /// - Resolves the voice, falling back to the default for unknown ids
    /// - Counts the request in usage statistics, cache hits included
    /// - Serves cached audio when present unless the cache is bypassed
    /// - Otherwise runs the engine cascade and stores real speech in the cache
    ///
    /// Returns the audio with the engine, voice, and cache status that produced it
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<TtsSynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<TtsSynthesisResult, TtsServiceError> {
        let voice = self.voices.resolve(&request.voice_id);
        let language = request
            .language
            .clone()
            .unwrap_or_else(|| voice.language.clone());
        let char_count = request.char_count();

        tracing::info!(
            voice = %voice.id,
            language = %language,
            format = %request.output_format,
            char_count = char_count,
            use_cache = request.use_cache,
            "TTS synthesis request"
        );

        self.usage_repo.record_request(char_count);

        let cache = self.cache.as_ref().filter(|_| request.use_cache);
        let key = fingerprint(&request.text, &voice.id, &language);

        if let Some(cache) = cache {
            if let Some(hit) = cache.get(&key).await {
                self.usage_repo.record_cache_hit();
                tracing::info!(
                    fingerprint = %key,
                    cached_audio_size = hit.audio.len(),
                    engine = %hit.engine,
                    "TTS cache hit - returning cached audio"
                );
                return Ok(TtsSynthesisResult {
                    audio_data: hit.audio,
                    format: hit.format,
                    engine_used: hit.engine,
                    voice_used: voice.id,
                    char_count,
                    cached: true,
                    placeholder: false,
                });
            }
            self.usage_repo.record_cache_miss();
        }

        let outcome = self
            .cascade
            .run(&request.text, &voice, &language, request.output_format)
            .await
            .map_err(TtsServiceError::EnginesExhausted)?;

        if outcome.placeholder {
            self.usage_repo.record_placeholder();
        } else if let Some(cache) = cache {
            cache
                .insert(
                    &key,
                    CachedAudio {
                        audio: outcome.audio.bytes.clone(),
                        format: outcome.audio.format,
                        engine: outcome.engine.clone(),
                    },
                )
                .await;
            tracing::info!(
                fingerprint = %key,
                audio_size = outcome.audio.bytes.len(),
                "TTS result cached"
            );
        }

        Ok(TtsSynthesisResult {
            audio_data: outcome.audio.bytes,
            format: outcome.audio.format,
            engine_used: outcome.engine,
            voice_used: voice.id,
            char_count,
            cached: false,
            placeholder: outcome.placeholder,
        })
    }
}
