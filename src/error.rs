//! Error types surfaced by the parsers and the ranking engine.
//!
//! Only structural failures are errors. Row- and cell-level defects (wrong field
//! count, unparsable numbers) are absorbed by the parsers and never reach here.

use camino::Utf8PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} has no non-blank content")]
    EmptyInput { path: Utf8PathBuf },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("no column matching '{name}' found in state log")]
    MissingColumn { name: String },
}

/// Structural problems in a char log header or body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("header separator '{sentinel}' was not found in the first line")]
    MissingSeparator { sentinel: String },

    #[error("no ERR columns were found to the right of the last separator in the header")]
    NoErrColumns,

    #[error("no solution+N-like tokens were found after the header")]
    NoSolutions,
}

pub type Result<T, E = LogError> = std::result::Result<T, E>;
