//! Round-trip comparison between the original and rebuilt archives

use crate::error::ExploreError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

/// Size drift below this percentage is reported as acceptable.
pub const SIZE_TOLERANCE_PCT: f64 = 5.0;

/// Comparison results. Informational only: mismatches are reported, not
/// enforced.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub original_size: u64,
    pub rebuilt_size: u64,
    pub size_delta_pct: f64,
    pub original_members: usize,
    pub rebuilt_members: usize,
    /// Members of the original missing from the rebuilt archive.
    pub missing: Vec<String>,
    /// Members of the rebuilt archive absent from the original.
    pub extra: Vec<String>,
}

impl VerifyReport {
    pub fn size_acceptable(&self) -> bool {
        self.size_delta_pct < SIZE_TOLERANCE_PCT
    }

    pub fn filesets_match(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compare `original` and `rebuilt` by total size and member-name set.
pub fn verify_round_trip(original: &Path, rebuilt: &Path) -> Result<VerifyReport, ExploreError> {
    let original_size = fs::metadata(original)?.len();
    let rebuilt_size = fs::metadata(rebuilt)?.len();
    let size_delta_pct =
        (rebuilt_size as f64 - original_size as f64).abs() / original_size as f64 * 100.0;

    let original_names = member_names(original)?;
    let rebuilt_names = member_names(rebuilt)?;

    let missing: Vec<String> = original_names.difference(&rebuilt_names).cloned().collect();
    let extra: Vec<String> = rebuilt_names.difference(&original_names).cloned().collect();

    Ok(VerifyReport {
        original_size,
        rebuilt_size,
        size_delta_pct,
        original_members: original_names.len(),
        rebuilt_members: rebuilt_names.len(),
        missing,
        extra,
    })
}

fn member_names(path: &Path) -> Result<BTreeSet<String>, ExploreError> {
    let file = File::open(path)?;
    let archive =
        ZipArchive::new(BufReader::new(file)).map_err(|source| ExploreError::ArchiveRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(archive.file_names().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, content) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn identical_archives_verify_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        let members: &[(&str, &[u8])] =
            &[("xl/workbook.xml", b"<workbook/>"), ("x.xml", b"<x/>")];
        write_zip(&a, members);
        write_zip(&b, members);

        let report = verify_round_trip(&a, &b).unwrap();
        assert!(report.filesets_match());
        assert!(report.size_acceptable());
        assert_eq!(report.original_members, 2);
        assert_eq!(report.rebuilt_members, 2);
    }

    #[test]
    fn set_differences_are_reported_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        write_zip(&a, &[("only_in_a.xml", b"<a/>"), ("shared.xml", b"<s/>")]);
        write_zip(&b, &[("only_in_b.xml", b"<b/>"), ("shared.xml", b"<s/>")]);

        let report = verify_round_trip(&a, &b).unwrap();
        assert!(!report.filesets_match());
        assert_eq!(report.missing, vec!["only_in_a.xml".to_string()]);
        assert_eq!(report.extra, vec!["only_in_b.xml".to_string()]);
    }

    #[test]
    fn large_size_drift_is_flagged() {
        let report = VerifyReport {
            original_size: 1000,
            rebuilt_size: 1100,
            size_delta_pct: 10.0,
            original_members: 0,
            rebuilt_members: 0,
            missing: Vec::new(),
            extra: Vec::new(),
        };
        assert!(!report.size_acceptable());
    }

    #[test]
    fn unreadable_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        write_zip(&a, &[("x.xml", b"<x/>")]);
        fs::write(&b, b"not an archive").unwrap();

        let err = verify_round_trip(&a, &b).unwrap_err();
        assert!(matches!(err, ExploreError::ArchiveRead { .. }));
    }
}
