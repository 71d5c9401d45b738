//! Error taxonomy for the exploration pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the pipeline stages.
///
/// Only the decryption gate and the extractor produce fatal errors; the
/// inspector tolerates absent parts and the verifier's errors are caught
/// and reported by the driver without changing the exit status.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// A password was required but neither an explicit argument nor the
    /// credential provider supplied one.
    #[error("file appears to be encrypted but no password is available")]
    MissingPassword,

    /// Wrong password, corrupt encrypted container, or an unsupported
    /// encryption variant.
    #[error("decryption failed: {source}")]
    Decryption {
        #[from]
        source: office_crypto::DecryptError,
    },

    /// The target could not be read as a valid ZIP container.
    #[error("cannot read archive {path}: {source}")]
    ArchiveRead {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// Failure while writing the rebuilt archive.
    #[error("cannot write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// Malformed XML in an inspected part. Propagates and aborts the run.
    #[error("XML parsing error in {part}: {source}")]
    Xml {
        part: String,
        source: quick_xml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
