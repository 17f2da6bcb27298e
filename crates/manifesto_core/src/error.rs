use std::fmt;

use crate::Year;

/// Errors raised while constructing reforms from literal data
#[derive(Debug, Clone, PartialEq)]
pub enum ReformError {
    InvalidPath { path: String, reason: &'static str },
    InvalidRange(String),
    InvertedRange { start: String, end: String },
    OverlappingRanges { first: String, second: String },
    InvalidValue(String),
}

impl fmt::Display for ReformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReformError::InvalidPath { path, reason } => {
                write!(f, "invalid parameter path {path:?}: {reason}")
            }
            ReformError::InvalidRange(range) => {
                write!(f, "invalid period range {range:?}, expected YYYY-MM-DD.YYYY-MM-DD")
            }
            ReformError::InvertedRange { start, end } => {
                write!(f, "period range starts ({start}) after it ends ({end})")
            }
            ReformError::OverlappingRanges { first, second } => {
                write!(f, "period ranges {first} and {second} overlap")
            }
            ReformError::InvalidValue(value) => write!(f, "invalid parameter value {value:?}"),
        }
    }
}

impl std::error::Error for ReformError {}

/// Errors raised at the simulation engine boundary
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No recorded simulation matches the requested situation/reform
    MissingRecording { what: String },
    /// The simulation has no values for the requested variable and year
    MissingVariable { variable: &'static str, year: Year },
    /// Value and weight arrays disagree in length
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    Io(String),
    Parse(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingRecording { what } => {
                write!(f, "no recorded simulation for {what}")
            }
            EngineError::MissingVariable { variable, year } => {
                write!(f, "variable {variable} not available for {year}")
            }
            EngineError::LengthMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "length mismatch in {context}: expected {expected} entries, found {actual}"
            ),
            EngineError::Io(msg) => write!(f, "IO error: {msg}"),
            EngineError::Parse(msg) => write!(f, "failed to parse recording: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors raised when validating household form input
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    TooManyChildren { count: usize, max: usize },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be between {min} and {max}, got {value}"),
            InputError::TooManyChildren { count, max } => {
                write!(f, "at most {max} children are supported, got {count}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Errors raised when loading or validating a batch configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Empty(&'static str),
    YearOutOfRange(Year),
    Duplicate(String),
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Empty(field) => write!(f, "batch config field {field} is empty"),
            ConfigError::YearOutOfRange(year) => {
                write!(f, "year {year} is outside the supported range")
            }
            ConfigError::Duplicate(entry) => write!(f, "duplicate batch config entry {entry}"),
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "failed to parse batch config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while computing household impacts
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactError {
    Input(InputError),
    Engine(EngineError),
}

impl fmt::Display for ImpactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactError::Input(e) => write!(f, "invalid household: {e}"),
            ImpactError::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ImpactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImpactError::Input(e) => Some(e),
            ImpactError::Engine(e) => Some(e),
        }
    }
}

impl From<InputError> for ImpactError {
    fn from(err: InputError) -> Self {
        ImpactError::Input(err)
    }
}

impl From<EngineError> for ImpactError {
    fn from(err: EngineError) -> Self {
        ImpactError::Engine(err)
    }
}

/// Errors raised while running a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    Config(ConfigError),
    Engine(EngineError),
    Cancelled,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Config(e) => write!(f, "{e}"),
            BatchError::Engine(e) => write!(f, "{e}"),
            BatchError::Cancelled => write!(f, "batch run was cancelled"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Config(e) => Some(e),
            BatchError::Engine(e) => Some(e),
            BatchError::Cancelled => None,
        }
    }
}

impl From<ConfigError> for BatchError {
    fn from(err: ConfigError) -> Self {
        BatchError::Config(err)
    }
}

impl From<EngineError> for BatchError {
    fn from(err: EngineError) -> Self {
        BatchError::Engine(err)
    }
}

/// Errors raised while reading or writing snapshot files
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    Io(String),
    Csv(String),
    Json(String),
    Schema {
        file: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    Incomplete(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(msg) => write!(f, "IO error: {msg}"),
            SnapshotError::Csv(msg) => write!(f, "CSV error: {msg}"),
            SnapshotError::Json(msg) => write!(f, "JSON error: {msg}"),
            SnapshotError::Schema {
                file,
                expected,
                found,
            } => write!(
                f,
                "unexpected columns in {file}: expected [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            ),
            SnapshotError::Incomplete(msg) => write!(f, "incomplete snapshot: {msg}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err.to_string())
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        SnapshotError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err.to_string())
    }
}
