use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Upstream {url} responded with HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Unexpected upstream format: {message}")]
    ParseError { message: String },

    #[error("Unknown month name in label '{label}'")]
    UnknownMonthError { label: String },

    #[error("Malformed number: '{raw}'")]
    MalformedNumberError { raw: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Normalization,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn parse(message: impl Into<String>) -> Self {
        EtlError::ParseError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        EtlError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::NetworkError(_) => ErrorCategory::Network,
            EtlError::HttpStatusError { .. } | EtlError::ParseError { .. } => {
                ErrorCategory::Upstream
            }
            EtlError::UnknownMonthError { .. } | EtlError::MalformedNumberError { .. } => {
                ErrorCategory::Normalization
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Persistence,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Upstream | ErrorCategory::Normalization => ErrorSeverity::Low,
            ErrorCategory::Persistence => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach an upstream source ({})", self),
            ErrorCategory::Upstream => format!("An upstream source changed its format ({})", self),
            ErrorCategory::Normalization => format!("Could not read an upstream value ({})", self),
            ErrorCategory::Persistence => format!("Could not write the output files ({})", self),
            ErrorCategory::Configuration => format!("The configuration is invalid ({})", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and run again later",
            ErrorCategory::Upstream => "Check the indicator URL; the page layout may have changed",
            ErrorCategory::Normalization => {
                "Inspect the upstream table for unexpected month names or number formats"
            }
            ErrorCategory::Persistence => "Check that the output directories are writable",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
