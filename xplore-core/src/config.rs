//! Run configuration and credential lookup

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit password is given.
pub const PASSWORD_ENV_VAR: &str = "XLSX_PASSWORD";

fn default_workdir() -> PathBuf {
    PathBuf::from("workbook_xml")
}

fn default_max_depth() -> usize {
    2
}

/// Parameters for a single exploration run.
///
/// All fields have defaults so a partial TOML file (or none at all) is
/// enough to get going; the CLI overlays its flags on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// Input archive, possibly encrypted.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Working directory for extracted parts. Recreated on every run.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
    /// Rebuilt archive path. Derived from the source when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Decryption password. Falls back to `XLSX_PASSWORD` when absent.
    #[serde(default)]
    pub password: Option<String>,
    /// Depth bound for the structure listing.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        ExploreConfig {
            source: None,
            workdir: default_workdir(),
            output: None,
            password: None,
            max_depth: default_max_depth(),
        }
    }
}

impl ExploreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ExploreConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the rebuilt archive path, deriving `<stem>_REZIPPED<ext>`
    /// next to the source when no explicit output was configured.
    pub fn rebuilt_path(&self, source: &Path) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        sibling_with_tag(source, "_REZIPPED")
    }
}

/// Build `<stem><tag><original extension>` next to `path`.
pub(crate) fn sibling_with_tag(path: &Path, tag: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}{tag}.{}", ext.to_string_lossy()),
        None => format!("{stem}{tag}"),
    };
    path.with_file_name(name)
}

/// Source of the decryption secret when no explicit password is passed.
pub trait CredentialProvider {
    fn password(&self) -> Option<String>;
}

/// Reads the password from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        EnvCredentials { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        EnvCredentials::new(PASSWORD_ENV_VAR)
    }
}

impl CredentialProvider for EnvCredentials {
    fn password(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_to_partial_toml() {
        let config: ExploreConfig = toml::from_str("source = \"book.xlsx\"").unwrap();
        assert_eq!(config.source, Some(PathBuf::from("book.xlsx")));
        assert_eq!(config.workdir, PathBuf::from("workbook_xml"));
        assert_eq!(config.max_depth, 2);
        assert!(config.password.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workdir = \"parts\"\nmax_depth = 4").unwrap();
        let config = ExploreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.workdir, PathBuf::from("parts"));
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn rebuilt_path_derives_from_source() {
        let config = ExploreConfig::default();
        assert_eq!(
            config.rebuilt_path(Path::new("/data/report.xlsx")),
            PathBuf::from("/data/report_REZIPPED.xlsx")
        );

        let explicit = ExploreConfig {
            output: Some(PathBuf::from("out.xlsx")),
            ..ExploreConfig::default()
        };
        assert_eq!(
            explicit.rebuilt_path(Path::new("/data/report.xlsx")),
            PathBuf::from("out.xlsx")
        );
    }

    #[test]
    fn sibling_without_extension_keeps_bare_name() {
        assert_eq!(
            sibling_with_tag(Path::new("/tmp/archive"), "_REZIPPED"),
            PathBuf::from("/tmp/archive_REZIPPED")
        );
    }
}
