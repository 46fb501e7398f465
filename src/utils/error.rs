use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("Input '{source_name}' could not be decoded as text: {message}")]
    InputDecodingError {
        source_name: String,
        message: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in '{source_name}'")]
    MissingColumnError { column: String, source_name: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PayrollError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PayrollError::InputDecodingError { .. }
            | PayrollError::CsvError(_)
            | PayrollError::MissingColumnError { .. } => ErrorCategory::Input,
            PayrollError::ConfigValidationError { .. }
            | PayrollError::InvalidConfigValueError { .. }
            | PayrollError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PayrollError::IoError(_) => ErrorCategory::System,
            PayrollError::SerializationError(_) | PayrollError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PayrollError::InputDecodingError { .. } => {
                "Re-export the file as UTF-8 text (CSV or TXT) and try again"
            }
            PayrollError::CsvError(_) => "Check that the file is semicolon-delimited text",
            PayrollError::MissingColumnError { .. } => {
                "Add a header row naming the COD and VALOR columns"
            }
            PayrollError::IoError(_) => "Check that the paths exist and are readable/writable",
            PayrollError::SerializationError(_) => "Report this problem together with the input files",
            PayrollError::ConfigValidationError { .. } => "Review the TOML job file syntax",
            PayrollError::InvalidConfigValueError { .. } => {
                "Correct the highlighted value in the job file or command line"
            }
            PayrollError::MissingConfigError { .. } => {
                "Pass the value on the command line or set it in the job file"
            }
            PayrollError::ProcessingError { .. } => "Inspect the warnings above and the input data",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PayrollError::InputDecodingError { source_name, .. } => {
                format!("'{}' is not readable text", source_name)
            }
            PayrollError::MissingColumnError {
                column,
                source_name,
            } => format!("'{}' has no '{}' column", source_name, column),
            PayrollError::MissingConfigError { field } => {
                format!("Missing setting: {}", field)
            }
            PayrollError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PayrollError>;
