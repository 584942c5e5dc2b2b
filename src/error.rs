const API_KEY_DOCS_URL: &str = "https://aistudio.google.com/app/apikey";

/// Error taxonomy for ulam.
///
/// The generation-facing variants (`MissingApiKey`, `RequestFailed`,
/// `Transport`, `MalformedResponse`, `ApiError`) are never distinguished by
/// the orchestrator — any of them takes the silent-degrade path, except for
/// recipe fetches, which surface the `Display` text to the user.
#[derive(Debug, thiserror::Error)]
pub enum UlamError {
    #[error(
        "Missing Gemini API key. Set --api-key, ULAM_API_KEY, or GEMINI_API_KEY \
         (create one at {API_KEY_DOCS_URL})"
    )]
    MissingApiKey,

    #[error("Gemini request failed with HTTP {status}: {detail}")]
    RequestFailed { status: u16, detail: String },

    #[error("Gemini request failed: {detail}")]
    Transport { detail: String },

    #[error("Unexpected Gemini response shape: {detail}")]
    MalformedResponse { detail: String },

    #[error("Gemini API error: {message}")]
    ApiError { message: String },

    #[error("Failed to parse environment variable '{var}': {detail}")]
    ConfigEnvParseError { var: String, detail: String },

    #[error("Invalid emphasis mode '{value}' (expected \"strip\" or \"bold\")")]
    InvalidEmphasisMode { value: String },

    #[error("Invalid request timeout: must be at least 1 second")]
    InvalidTimeout,

    #[error("Model name must not be empty")]
    EmptyModel,

    #[error("Unknown weekday '{value}' (expected Sunday through Saturday)")]
    InvalidDay { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_message_names_all_sources() {
        let msg = format!("{}", UlamError::MissingApiKey);
        assert!(msg.contains("--api-key"), "should name the CLI flag: {msg}");
        assert!(msg.contains("ULAM_API_KEY"), "should name the env var: {msg}");
        assert!(msg.contains("GEMINI_API_KEY"), "should name the fallback: {msg}");
        assert!(
            msg.contains("aistudio.google.com"),
            "should include the key-creation link: {msg}"
        );
    }

    #[test]
    fn request_failed_includes_status_and_detail() {
        let err = UlamError::RequestFailed {
            status: 429,
            detail: "quota exceeded".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("429"), "should include status: {msg}");
        assert!(msg.contains("quota exceeded"), "should include detail: {msg}");
    }

    #[test]
    fn invalid_day_names_the_expected_range() {
        let err = UlamError::InvalidDay {
            value: "Funday".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Funday"));
        assert!(msg.contains("Sunday through Saturday"));
    }

    #[test]
    fn invalid_emphasis_mode_names_both_options() {
        let err = UlamError::InvalidEmphasisMode {
            value: "italic".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("italic"));
        assert!(msg.contains("strip") && msg.contains("bold"));
    }
}
