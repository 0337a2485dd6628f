use crate::parser::date_range::DateRangeParseError;
use crate::parser::segmenter::SegmentationError;
use chrono::NaiveDate;
use thiserror::Error;

/// 模型不變量被破壞時的錯誤 (建構或反序列化時檢查)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("week range starts on {start} but ends on {end}")]
    InvertedWeekRange { start: NaiveDate, end: NaiveDate },

    #[error("a quarter menu needs at least one week range")]
    NoWeeks,

    #[error("week ranges {first} and {second} overlap")]
    OverlappingWeeks { first: String, second: String },

    #[error("weekday {weekday} appears more than once")]
    DuplicateDay { weekday: String },

    #[error("day {weekday} has no raw lines")]
    EmptyRawLines { weekday: String },
}

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Week range error: {0}")]
    DateRangeError(#[from] DateRangeParseError),

    #[error("Segmentation error: {0}")]
    SegmentationError(#[from] SegmentationError),

    #[error("Invalid menu model: {0}")]
    ModelError(#[from] ModelError),

    #[error("Extracted document contains no table rows")]
    EmptyInput,

    #[error("No menu could be built from the extracted tables ({skipped} blocks skipped)")]
    EmptyDocument { skipped: usize },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Parsing,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MenuError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MenuError::IoError(_) => ErrorCategory::System,
            MenuError::SerializationError(_) | MenuError::EmptyInput | MenuError::InvalidDate { .. } => {
                ErrorCategory::Input
            }
            MenuError::DateRangeError(_)
            | MenuError::SegmentationError(_)
            | MenuError::ModelError(_)
            | MenuError::EmptyDocument { .. } => ErrorCategory::Parsing,
            MenuError::ConfigValidationError { .. } | MenuError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MenuError::DateRangeError(_)
            | MenuError::SegmentationError(_)
            | MenuError::ModelError(_)
            | MenuError::InvalidDate { .. } => ErrorSeverity::Medium,
            MenuError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MenuError::IoError(_) => "Check that the input file exists and the output directory is writable",
            MenuError::SerializationError(_) => {
                "Make sure the file is valid JSON produced by the PDF extraction step"
            }
            MenuError::EmptyInput => "Re-run the PDF extraction; the document contains no table",
            MenuError::EmptyDocument { .. } => {
                "Run with --verbose to see which blocks were skipped and why"
            }
            MenuError::DateRangeError(_) | MenuError::SegmentationError(_) => {
                "Inspect the week header cells of the extracted table"
            }
            MenuError::ModelError(_) => "The menu JSON was edited by hand or is corrupted; regenerate it",
            MenuError::InvalidDate { .. } => "Use the YYYY-MM-DD format, e.g. 2025-09-29",
            MenuError::ConfigValidationError { .. } | MenuError::InvalidConfigValueError { .. } => {
                "Check the command line arguments, the settings file and MENU_* environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the input: {}", self),
            ErrorCategory::Parsing => format!("Could not parse the menu: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
