//! Error types.
//!
//! Two layers:
//!
//! - [`ExploreError`] is the core taxonomy (format, type-mismatch, degenerate
//!   computation, parse). Cleaning steps and chart requests return it; nothing
//!   in the core aborts the process.
//! - [`AppError`] is the binary-boundary error: a message plus a process exit
//!   code. CLI handlers map `ExploreError` into it; the TUI shows the message
//!   in its status line and keeps the last good table.

use crate::domain::ColumnType;

/// Core error taxonomy for cleaning and charting.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExploreError {
    /// Unrecognized or unreadable input (bad extension, broken workbook).
    #[error("unrecognized input: {0}")]
    Format(String),

    /// A step or chart request named a column the table does not have.
    #[error("column `{column}` not found")]
    UnknownColumn { column: String },

    /// A step or chart request applied to a column of the wrong semantic type.
    #[error("column `{column}` is {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    /// A computation that would produce NaN/Inf (zero-variance standardize,
    /// statistics over an empty column).
    #[error("column `{column}`: {reason}")]
    Degenerate { column: String, reason: String },

    /// A cell that cannot be coerced to the requested date type.
    ///
    /// Policy is reject-the-column: the first offending cell fails the whole
    /// transform (see DESIGN.md).
    #[error("column `{column}` row {row}: cannot parse `{value}` as a date")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// A chart request that is structurally wrong (e.g., a two-variable kind
    /// with no y column).
    #[error("{0}")]
    InvalidRequest(String),

    /// The table has no rows where at least one is required.
    #[error("table has no rows")]
    EmptyTable,

    /// A column being added or replaced does not match the table's row count.
    #[error("column `{column}` has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
}

impl ExploreError {
    /// Process exit code for this error when it escapes to the CLI boundary.
    ///
    /// 2 = input/usage error, 3 = degenerate/empty data.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExploreError::Format(_)
            | ExploreError::UnknownColumn { .. }
            | ExploreError::TypeMismatch { .. }
            | ExploreError::Parse { .. }
            | ExploreError::InvalidRequest(_) => 2,
            ExploreError::Degenerate { .. } | ExploreError::EmptyTable => 3,
            ExploreError::LengthMismatch { .. } => 4,
        }
    }
}

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

impl From<ExploreError> for AppError {
    fn from(err: ExploreError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
