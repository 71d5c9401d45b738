//! Clean extraction of an archive into a working directory

use crate::error::ExploreError;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use zip::ZipArchive;

/// Replace `target`'s contents with the members of `archive_path`.
///
/// The archive is opened before the target is touched, so an invalid
/// container never destroys a previous extraction. An existing target
/// directory is removed recursively first; nothing stale survives.
///
/// Returns the number of members written.
pub fn extract_archive(archive_path: &Path, target: &Path) -> Result<usize, ExploreError> {
    let file = File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|source| ExploreError::ArchiveRead {
            path: archive_path.to_path_buf(),
            source,
        })?;

    if target.exists() {
        fs::remove_dir_all(target)?;
    }
    fs::create_dir_all(target)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|source| ExploreError::ArchiveRead {
                path: archive_path.to_path_buf(),
                source,
            })?;

        // Skip members whose path would escape the target directory.
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let dest = target.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&dest)?;
            io::copy(&mut entry, &mut out)?;
        }
        extracted += 1;
    }

    Ok(extracted)
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
    fn extraction_preserves_relative_structure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("book.xlsx");
        write_zip(
            &archive,
            &[
                ("[Content_Types].xml", b"<Types/>"),
                ("xl/workbook.xml", b"<workbook/>"),
                ("xl/worksheets/sheet1.xml", b"<worksheet/>"),
            ],
        );

        let target = dir.path().join("out");
        let count = extract_archive(&archive, &target).unwrap();
        assert_eq!(count, 3);
        assert!(target.join("[Content_Types].xml").is_file());
        assert!(target.join("xl/workbook.xml").is_file());
        assert!(target.join("xl/worksheets/sheet1.xml").is_file());
    }

    #[test]
    fn stale_files_do_not_survive_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("book.xlsx");
        write_zip(&archive, &[("xl/workbook.xml", b"<workbook/>")]);

        let target = dir.path().join("out");
        fs::create_dir_all(target.join("leftover")).unwrap();
        fs::write(target.join("stale.txt"), b"old").unwrap();

        extract_archive(&archive, &target).unwrap();
        assert!(!target.join("stale.txt").exists());
        assert!(!target.join("leftover").exists());
        assert!(target.join("xl/workbook.xml").is_file());
    }

    #[test]
    fn invalid_archive_leaves_existing_target_alone() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.xlsx");
        fs::write(&archive, b"not a zip at all").unwrap();

        let target = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("previous.xml"), b"<kept/>").unwrap();

        let err = extract_archive(&archive, &target).unwrap_err();
        assert!(matches!(err, ExploreError::ArchiveRead { .. }));
        assert!(target.join("previous.xml").is_file());
    }
}
