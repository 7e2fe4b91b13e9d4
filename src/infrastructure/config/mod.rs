use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // API key gate (empty = open)
    pub api_keys: Vec<String>,
    // Request normalizer (max_text_length applies to paid keys)
    pub max_text_length: usize,
    pub demo_max_text_length: usize,
    pub default_voice: String,
    // Engine cascade
    pub tts_engines: Vec<String>,
    pub offline_fallback_enabled: bool,
    pub placeholder_enabled: bool,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub engine_timeout_secs: u64,
    // TTS Cache
    pub tts_cache_enabled: bool,
    pub tts_cache_dir: Option<PathBuf>,
    pub tts_cache_max_entries: Option<u64>,
    // Engine backends
    pub aws_region: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub xtts_server_url: Option<String>,
    pub web_tts_url: String,
    pub espeak_binary: String,
    // Voice cloning uploads
    pub voice_samples_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            api_keys: parse_list(&env::var("API_KEYS").unwrap_or_default()),
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            demo_max_text_length: env::var("DEMO_MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            default_voice: env::var("DEFAULT_VOICE")
                .unwrap_or_else(|_| "nigerian-female".to_string()),
            tts_engines: parse_list(
                &env::var("TTS_ENGINES").unwrap_or_else(|_| "polly,web,espeak".to_string()),
            ),
            offline_fallback_enabled: parse_flag("TTS_OFFLINE_FALLBACK", true),
            placeholder_enabled: parse_flag("TTS_PLACEHOLDER_ENABLED", true),
            max_retries: env::var("TTS_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u32>()?
                .max(1),
            retry_backoff_ms: env::var("TTS_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            engine_timeout_secs: env::var("TTS_ENGINE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            tts_cache_enabled: parse_flag("TTS_CACHE_ENABLED", true),
            tts_cache_dir: env::var("TTS_CACHE_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            tts_cache_max_entries: env::var("TTS_CACHE_MAX_ENTRIES")
                .ok()
                .map(|s| s.parse())
                .transpose()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            xtts_server_url: env::var("XTTS_SERVER_URL").ok().filter(|s| !s.is_empty()),
            web_tts_url: env::var("WEB_TTS_URL")
                .unwrap_or_else(|_| "https://translate.google.{tld}/translate_tts".to_string()),
            espeak_binary: env::var("ESPEAK_BINARY").unwrap_or_else(|_| "espeak-ng".to_string()),
            voice_samples_dir: PathBuf::from(
                env::var("VOICE_SAMPLES_DIR").unwrap_or_else(|_| "./voice_samples".to_string()),
            ),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            api_keys: Vec::new(),
            max_text_length: 5000,
            demo_max_text_length: 500,
            default_voice: "nigerian-female".to_string(),
            tts_engines: vec!["polly".to_string(), "web".to_string(), "espeak".to_string()],
            offline_fallback_enabled: true,
            placeholder_enabled: true,
            max_retries: 3,
            retry_backoff_ms: 300,
            engine_timeout_secs: 30,
            tts_cache_enabled: true,
            tts_cache_dir: None,
            tts_cache_max_entries: None,
            aws_region: "eu-west-1".to_string(),
            openai_api_key: None,
            openai_tts_model: "tts-1".to_string(),
            xtts_server_url: None,
            web_tts_url: "https://translate.google.{tld}/translate_tts".to_string(),
            espeak_binary: "espeak-ng".to_string(),
            voice_samples_dir: PathBuf::from("./voice_samples"),
        }
    }
}

/// Split a comma-separated env value, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s.trim().to_lowercase() == "true")
        .unwrap_or(default)
}
