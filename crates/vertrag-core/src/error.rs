//! Error types for profile configuration

/// Errors raised while loading or overriding contract-type profiles
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Must-clause spec string did not match `"§ <n> <Title>[|<Alt>...]"`
    #[error("invalid must-clause spec: {0:?}")]
    InvalidMustClause(String),

    /// Contract type identifier is not registered
    #[error("unknown contract type: {0:?}")]
    UnknownContractType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_error_display() {
        let err = ProfileError::UnknownContractType("leasing".to_string());
        assert!(err.to_string().contains("leasing"));
    }
}
