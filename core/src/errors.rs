use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("NOT FOUND: {code} - {message}")]
    NotFound { code: String, message: String },

    #[error("CONFIGURATION ERROR: {code} - {message}")]
    Configuration { code: String, message: String },
}

impl ContainerError {
    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn configuration(code: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NotFound { code, .. } | Self::Configuration { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. } | Self::Configuration { message, .. } => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// **CONTAINER ERROR CODES**
///
/// **MANDATE**: Use these standardized error codes for consistent error reporting.
pub mod error_codes {
    pub const NO_ENTRY: &str = "DI_NOT_FOUND_NO_ENTRY";
    pub const NO_DEFINITION: &str = "DI_NOT_FOUND_NO_DEFINITION";
    pub const SUBSTITUTE_NOT_FOUND: &str = "DI_NOT_FOUND_SUBSTITUTE";
    pub const UNKNOWN_TYPE: &str = "DI_NOT_FOUND_UNKNOWN_TYPE";

    pub const AMBIGUOUS_PARAMETER: &str = "DI_CONFIG_AMBIGUOUS_PARAMETER";
    pub const UNRESOLVABLE_PARAMETER: &str = "DI_CONFIG_UNRESOLVABLE_PARAMETER";
    pub const MISSING_ARGUMENT: &str = "DI_CONFIG_MISSING_ARGUMENT";
    pub const UNKNOWN_ARGUMENT: &str = "DI_CONFIG_UNKNOWN_ARGUMENT";
    pub const ARGUMENT_TYPE_MISMATCH: &str = "DI_CONFIG_ARGUMENT_TYPE_MISMATCH";
    pub const NOT_INSTANTIABLE: &str = "DI_CONFIG_NOT_INSTANTIABLE";
    pub const PARENT_ALREADY_SET: &str = "DI_CONFIG_PARENT_ALREADY_SET";
    pub const CIRCULAR_DEPENDENCY: &str = "DI_CONFIG_CIRCULAR_DEPENDENCY";
    pub const INCOMPLETE_FACTORY: &str = "DI_CONFIG_INCOMPLETE_FACTORY";
    pub const CONTAINER_DROPPED: &str = "DI_CONFIG_CONTAINER_DROPPED";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code_and_message() {
        let err = ContainerError::not_found(error_codes::NO_ENTRY, "No entry was found for 'foo'.");
        assert_eq!(
            err.to_string(),
            "NOT FOUND: DI_NOT_FOUND_NO_ENTRY - No entry was found for 'foo'."
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_accessors() {
        let err = ContainerError::configuration(error_codes::PARENT_ALREADY_SET, "already set");
        assert_eq!(err.code(), error_codes::PARENT_ALREADY_SET);
        assert_eq!(err.message(), "already set");
        assert!(!err.is_not_found());
    }
}
