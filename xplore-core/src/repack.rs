//! Rebuild an archive from an extracted directory tree

use crate::error::ExploreError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compress every regular file under `source` into a new archive at
/// `output`, preserving paths relative to `source` as member names.
///
/// Any pre-existing file at `output` is overwritten. Directories are not
/// written as members of their own; member order follows a sorted walk,
/// which may differ from the original archive's order.
///
/// Returns the rebuilt file's size in bytes.
pub fn repack_dir(source: &Path, output: &Path) -> Result<u64, ExploreError> {
    let mut files = Vec::new();
    collect_files(source, &mut files)?;
    files.sort();

    let out = File::create(output)?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let Ok(relative) = path.strip_prefix(source) else {
            continue;
        };
        let member = member_name(relative);
        zip.start_file(member, options)
            .map_err(|source| ExploreError::ArchiveWrite {
                path: output.to_path_buf(),
                source,
            })?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }

    zip.finish().map_err(|source| ExploreError::ArchiveWrite {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(fs::metadata(output)?.len())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ExploreError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// ZIP member names always use forward slashes.
fn member_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use zip::ZipArchive;

    #[test]
    fn members_mirror_the_tree_with_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("parts");
        fs::create_dir_all(src.join("xl/worksheets")).unwrap();
        fs::write(src.join("[Content_Types].xml"), b"<Types/>").unwrap();
        fs::write(src.join("xl/workbook.xml"), b"<workbook/>").unwrap();
        fs::write(src.join("xl/worksheets/sheet1.xml"), b"<worksheet/>").unwrap();

        let output = dir.path().join("rebuilt.xlsx");
        let size = repack_dir(&src, &output).unwrap();
        assert!(size > 0);

        let archive = ZipArchive::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"xl/workbook.xml"));
        assert!(names.contains(&"xl/worksheets/sheet1.xml"));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("parts");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.xml"), b"<a/>").unwrap();

        let output = dir.path().join("rebuilt.xlsx");
        fs::write(&output, b"stale bytes, much longer than the real archive needs to be")
            .unwrap();

        repack_dir(&src, &output).unwrap();
        let mut archive = ZipArchive::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.by_name("a.xml").is_ok());
    }
}
