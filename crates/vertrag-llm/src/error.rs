//! Error types for LLM provider calls

/// Errors from one provider call
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Call exceeded its timeout
    #[error("llm call timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Provider returned a rate-limit response (HTTP 429 equivalent)
    #[error("llm provider rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    /// Provider returned a non-success status
    #[error("llm provider returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure
    #[error("llm transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not carry the expected shape
    #[error("malformed llm response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Check if the error is a rate limit that backoff may resolve
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_flagged() {
        let err = LlmError::RateLimited {
            retry_after_ms: Some(500),
        };
        assert!(err.is_rate_limited());
        assert!(!LlmError::Timeout { elapsed_ms: 100 }.is_rate_limited());
    }

    #[test]
    fn api_error_display() {
        let err = LlmError::Api {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }
}
