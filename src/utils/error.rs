use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid package size: {value} (must be a positive integer)")]
    InvalidSize { value: String },

    #[error("Package with id {id} not found")]
    NotFound { id: String },

    #[error("Invalid order size: {value} (must be a positive integer)")]
    InvalidOrderSize { value: String },

    #[error("No packages available")]
    NoPackagesAvailable,

    #[error("Search space too large: {required} table entries needed, limit is {limit}")]
    SearchSpaceTooLarge { required: u64, limit: usize },

    #[error("Calculation task failed: {message}")]
    TaskFailed { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Capacity,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn invalid_size(value: impl ToString) -> Self {
        CalcError::InvalidSize {
            value: value.to_string(),
        }
    }

    pub fn invalid_order_size(value: impl ToString) -> Self {
        CalcError::InvalidOrderSize {
            value: value.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::InvalidSize { .. }
            | CalcError::InvalidOrderSize { .. }
            | CalcError::NoPackagesAvailable => ErrorCategory::Validation,
            CalcError::NotFound { .. } => ErrorCategory::NotFound,
            CalcError::SearchSpaceTooLarge { .. } => ErrorCategory::Capacity,
            CalcError::ConfigError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CalcError::TaskFailed { .. } | CalcError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Capacity => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller caused the failure and can fix the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Capacity
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CalcError::InvalidSize { .. } => {
                "Package sizes must be whole numbers greater than zero".to_string()
            }
            CalcError::NotFound { .. } => {
                "List the packages to get the current ids before removing one".to_string()
            }
            CalcError::InvalidOrderSize { .. } => {
                "Order sizes must be whole numbers greater than zero".to_string()
            }
            CalcError::NoPackagesAvailable => {
                "Add at least one package size before calculating".to_string()
            }
            CalcError::SearchSpaceTooLarge { .. } => {
                "Use package sizes closer together or raise max_table_entries".to_string()
            }
            CalcError::TaskFailed { .. } => "Retry the request; check the server logs".to_string(),
            CalcError::IoError(_) => "Check file paths and permissions".to_string(),
            CalcError::ConfigError { .. } | CalcError::ConfigValidationError { .. } => {
                "Check the configuration file and environment variables".to_string()
            }
            CalcError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and restart", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
