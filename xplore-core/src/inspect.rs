//! Summary inspection of the well-known spreadsheet parts

use crate::error::ExploreError;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKSHEETS_DIR: &str = "xl/worksheets";
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
pub const STYLES_PART: &str = "xl/styles.xml";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// How many example sheets/named ranges to keep for display.
const SAMPLE_LIMIT: usize = 3;
/// Named-range references are previewed, not reproduced in full.
const REFERENCE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: String,
    pub rel_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedRange {
    pub name: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkbookSummary {
    pub sheet_count: usize,
    pub defined_name_count: usize,
    pub first_sheets: Vec<SheetEntry>,
    pub first_named_ranges: Vec<NamedRange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetFiles {
    pub count: usize,
    pub example: Option<String>,
}

/// What was found among the five well-known parts. Absent parts are
/// simply `None`/`false`; absence is never an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectionReport {
    pub workbook: Option<WorkbookSummary>,
    pub worksheet_files: Option<WorksheetFiles>,
    pub shared_string_count: Option<usize>,
    pub has_styles: bool,
    pub has_content_types: bool,
}

/// Inspect the five well-known parts under `root`, each independently.
///
/// Malformed XML in a present part is not tolerated: the parse error
/// propagates and aborts the run.
pub fn inspect_parts(root: &Path) -> Result<InspectionReport, ExploreError> {
    let mut report = InspectionReport::default();

    let workbook_path = root.join(WORKBOOK_PART);
    if workbook_path.exists() {
        report.workbook = Some(summarize_workbook(&workbook_path)?);
    }

    if let Some(files) = list_worksheet_files(&root.join(WORKSHEETS_DIR)) {
        report.worksheet_files = Some(files);
    }

    let shared_strings_path = root.join(SHARED_STRINGS_PART);
    if shared_strings_path.exists() {
        report.shared_string_count = Some(count_shared_strings(&shared_strings_path)?);
    }

    report.has_styles = root.join(STYLES_PART).exists();
    report.has_content_types = root.join(CONTENT_TYPES_PART).exists();

    Ok(report)
}

fn xml_reader(path: &Path) -> Result<Reader<BufReader<File>>, ExploreError> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.config_mut().trim_text(true);
    Ok(reader)
}

fn attribute_value(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Count `sheet` and `definedName` elements in the workbook descriptor
/// and keep the first few of each for display.
fn summarize_workbook(path: &Path) -> Result<WorkbookSummary, ExploreError> {
    let mut reader = xml_reader(path)?;
    let mut buf = Vec::new();

    let mut summary = WorkbookSummary {
        sheet_count: 0,
        defined_name_count: 0,
        first_sheets: Vec::new(),
        first_named_ranges: Vec::new(),
    };

    // Set while between <definedName> and </definedName>; the reference
    // arrives as element text.
    let mut pending_name: Option<String> = None;
    let mut pending_reference = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"definedName" => {
                pending_name = Some(attribute_value(&e, b"name").unwrap_or_default());
                pending_reference.clear();
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                summary.sheet_count += 1;
                if summary.first_sheets.len() < SAMPLE_LIMIT {
                    summary.first_sheets.push(SheetEntry {
                        name: attribute_value(&e, b"name").unwrap_or_default(),
                        sheet_id: attribute_value(&e, b"sheetId").unwrap_or_default(),
                        rel_id: attribute_value(&e, b"r:id").unwrap_or_default(),
                    });
                }
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"definedName" => {
                summary.defined_name_count += 1;
                if summary.first_named_ranges.len() < SAMPLE_LIMIT {
                    summary.first_named_ranges.push(NamedRange {
                        name: attribute_value(&e, b"name").unwrap_or_default(),
                        reference: String::new(),
                    });
                }
            }
            Ok(Event::Text(e)) if pending_name.is_some() => {
                // Undefined entities and other escape errors are malformed
                // XML and must abort the run, not degrade to an empty
                // preview.
                pending_reference = e
                    .unescape()
                    .map_err(|source| ExploreError::Xml {
                        part: WORKBOOK_PART.to_string(),
                        source: source.into(),
                    })?
                    .to_string();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"definedName" => {
                if let Some(name) = pending_name.take() {
                    summary.defined_name_count += 1;
                    if summary.first_named_ranges.len() < SAMPLE_LIMIT {
                        summary.first_named_ranges.push(NamedRange {
                            name,
                            reference: truncate_chars(&pending_reference, REFERENCE_PREVIEW_CHARS),
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(ExploreError::Xml {
                    part: WORKBOOK_PART.to_string(),
                    source,
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(summary)
}

/// Count `si` elements in the shared-string table.
fn count_shared_strings(path: &Path) -> Result<usize, ExploreError> {
    let mut reader = xml_reader(path)?;
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"si" {
                    count += 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(ExploreError::Xml {
                    part: SHARED_STRINGS_PART.to_string(),
                    source,
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(count)
}

/// Count `sheet*.xml` files in the worksheets directory.
fn list_worksheet_files(dir: &Path) -> Option<WorksheetFiles> {
    let read = fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = read
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with("sheet") && name.ends_with(".xml"))
        .collect();
    names.sort();

    Some(WorksheetFiles {
        count: names.len(),
        example: names.into_iter().next(),
    })
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}
