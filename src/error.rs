use crate::domain::constants::VALIDATION_FAIL;

/// Error surfaced by the binary: a message plus the process exit code.
///
/// Exit codes: 1 translation failure, 2 configuration / local I/O,
/// 3 source shape, 4 fetch.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A post-validation key with no translation factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMiss {
    pub key: String,
    /// 1-based raw-table row where the key was first seen.
    pub row: usize,
}

/// Failures of the schedule reconciliation core.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The raw table is missing or smaller than the required layout.
    SourceShape(String),
    /// One or more keys lack a translation factor. Carries every distinct miss.
    TranslationCoverage { misses: Vec<TranslationMiss> },
    /// Translated or merged quantities left the `f64` range.
    QuantityOverflow { overflows: Vec<TranslationMiss> },
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::SourceShape(msg) => write!(f, "Unexpected schedule table: {msg}"),
            ScheduleError::TranslationCoverage { misses } => {
                write!(f, "{} schedule key(s) have no translation factor.\n\n{VALIDATION_FAIL}", misses.len())
            }
            ScheduleError::QuantityOverflow { overflows } => {
                write!(
                    f,
                    "{} schedule key(s) are out of range after translation.\n\n{VALIDATION_FAIL}",
                    overflows.len()
                )
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        let exit_code = match err {
            ScheduleError::TranslationCoverage { .. } | ScheduleError::QuantityOverflow { .. } => 1,
            ScheduleError::SourceShape(_) => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}
