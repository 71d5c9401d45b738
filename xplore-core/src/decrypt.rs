//! Decryption gate: route encrypted containers through `office-crypto`

use crate::config::{CredentialProvider, sibling_with_tag};
use crate::error::ExploreError;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Outcome of the decryption gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// The file already opens as a ZIP archive; the original path is
    /// returned unchanged and no copy is made.
    Unencrypted(PathBuf),
    /// A decrypted sibling file was written next to the original.
    Decrypted(PathBuf),
}

impl Prepared {
    pub fn path(&self) -> &Path {
        match self {
            Prepared::Unencrypted(p) | Prepared::Decrypted(p) => p,
        }
    }

    pub fn was_decrypted(&self) -> bool {
        matches!(self, Prepared::Decrypted(_))
    }
}

/// Return a usable archive path for `path`, decrypting if necessary.
///
/// A file that does not open as a ZIP archive is assumed to be an
/// encrypted OOXML container. Anything else wrong with the file will
/// therefore surface as a decryption failure rather than a distinct
/// corruption error.
///
/// The password is taken from `password` first, then from `credentials`.
/// The original file is never modified; a successful decryption writes
/// plaintext to `<stem>_DECRYPTED<ext>` next to it.
pub fn decrypt_if_needed(
    path: &Path,
    password: Option<&str>,
    credentials: &dyn CredentialProvider,
) -> Result<Prepared, ExploreError> {
    let file = File::open(path)?;
    if ZipArchive::new(BufReader::new(file)).is_ok() {
        return Ok(Prepared::Unencrypted(path.to_path_buf()));
    }

    let password = match password {
        Some(p) => p.to_string(),
        None => credentials
            .password()
            .ok_or(ExploreError::MissingPassword)?,
    };

    let plaintext = office_crypto::decrypt_from_file(path, &password)?;
    let sibling = sibling_with_tag(path, "_DECRYPTED");
    fs::write(&sibling, plaintext)?;
    Ok(Prepared::Decrypted(sibling))
}
