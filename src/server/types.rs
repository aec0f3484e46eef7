//! Request and response bodies

use serde::{Deserialize, Serialize};

/// Language used when a synthesis request names none
pub const DEFAULT_LANG_CODE: &str = "en";

/// `POST /tts-stream` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub lang_code: Option<String>,
}

impl TtsRequest {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn lang_code(&self) -> &str {
        self.lang_code.as_deref().unwrap_or(DEFAULT_LANG_CODE)
    }
}

/// `POST /detect-language` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Which collaborators are usable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub native: bool,
    pub cloud: bool,
    pub classifier: bool,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub supported_languages: Vec<String>,
    pub backends: BackendStatus,
    /// Seconds since startup
    pub uptime: u64,
}

/// One row of `GET /languages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub greetings: Vec<String>,
    /// Served by a native voice
    pub native: bool,
    /// Served by the cloud API
    pub cloud: bool,
}

/// `GET /languages` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_request_defaults() {
        let request: TtsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.text(), "");
        assert_eq!(request.lang_code(), "en");

        let request: TtsRequest =
            serde_json::from_str(r#"{"text": "Molo", "lang_code": "xh"}"#).unwrap();
        assert_eq!(request.text(), "Molo");
        assert_eq!(request.lang_code(), "xh");
    }
}
