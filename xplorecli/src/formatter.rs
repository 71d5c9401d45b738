//! Console output for the exploration pipeline

use colored::*;
use std::path::Path;
use xplore_core::{InspectionReport, Prepared, VerifyReport};
use xplore_core::{
    inspect::{CONTENT_TYPES_PART, SHARED_STRINGS_PART, STYLES_PART, WORKBOOK_PART, WORKSHEETS_DIR},
    ExploreError,
};

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_banner(source: &Path) {
    println!("{}", rule());
    println!("{}", "OPENXML SPREADSHEET EXPLORER".bold());
    println!("{}", rule());
    println!(
        "Timestamp: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("Source: {}\n", source.display());
}

pub fn print_fatal(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

pub fn print_gate_outcome(prepared: &Prepared) {
    match prepared {
        Prepared::Unencrypted(_) => {
            println!("{} File is not encrypted, using original", "[*]".cyan());
        }
        Prepared::Decrypted(path) => {
            println!("{} File appears to be encrypted", "[*]".cyan());
            println!(
                "{} Successfully decrypted to: {}",
                "[+]".green(),
                path.display()
            );
        }
    }
}

pub fn print_extraction(archive: &Path, workdir: &Path, count: usize) {
    println!("{} Unzipping: {}", "[*]".cyan(), archive.display());
    println!("{} Output directory: {}", "[*]".cyan(), workdir.display());
    println!("{} Extracted {} members", "[+]".green(), count);
}

pub fn print_tree(tree: &str, max_depth: usize) {
    println!(
        "\n{}\n",
        format!("[DIR] Directory Structure (max depth {max_depth}):").bold()
    );
    print!("{tree}");
}

pub fn print_inspection(report: &InspectionReport) {
    println!("\n{}", rule());
    println!("{}", "[INSPECT] KEY XML FILES".bold());
    println!("{}", rule());

    if let Some(workbook) = &report.workbook {
        println!("\n[1] {}", WORKBOOK_PART.cyan());
        println!("   Contains: worksheet list, named ranges (definedNames)");
        println!("   Worksheets: {}", workbook.sheet_count);
        println!("   Named Ranges: {}", workbook.defined_name_count);

        if !workbook.first_sheets.is_empty() {
            println!("   First {} sheets:", workbook.first_sheets.len());
            for sheet in &workbook.first_sheets {
                println!(
                    "      - {} (sheetId={}, r:id={})",
                    sheet.name, sheet.sheet_id, sheet.rel_id
                );
            }
        }
        if !workbook.first_named_ranges.is_empty() {
            println!(
                "   First {} named ranges:",
                workbook.first_named_ranges.len()
            );
            for range in &workbook.first_named_ranges {
                println!("      - {} = {}...", range.name, range.reference);
            }
        }
    }

    if let Some(files) = &report.worksheet_files {
        println!("\n[2] {}/", WORKSHEETS_DIR.cyan());
        println!("   Contains: {} worksheet XML files", files.count);
        println!(
            "   Example: {}",
            files.example.as_deref().unwrap_or("None")
        );
    }

    if let Some(count) = report.shared_string_count {
        println!("\n[3] {}", SHARED_STRINGS_PART.cyan());
        println!("   Contains: {count} shared string entries");
    }

    if report.has_styles {
        println!("\n[4] {}", STYLES_PART.cyan());
        println!("   Contains: cell formats, fonts, fills, borders");
    }

    if report.has_content_types {
        println!("\n[5] {}", CONTENT_TYPES_PART.cyan());
        println!("   Contains: MIME types for all XML parts");
    }
}

pub fn print_repack(workdir: &Path, rebuilt: &Path, size: u64) {
    println!("\n{}", rule());
    println!("{}", "[TEST] ROUND-TRIP (UNZIP -> REZIP)".bold());
    println!("{}", rule());
    println!("{} Rezipping XML directory...", "[*]".cyan());
    println!("{} Source: {}", "[*]".cyan(), workdir.display());
    println!(
        "{} Created: {} ({} bytes)",
        "[+]".green(),
        rebuilt.display(),
        group_thousands(size)
    );
}

pub fn print_verification(report: &VerifyReport) {
    println!("\n{}", "[VERIFY] ROUND-TRIP VALIDATION".bold());
    println!("   Original: {} bytes", group_thousands(report.original_size));
    println!("   Rezipped: {} bytes", group_thousands(report.rebuilt_size));

    if report.size_acceptable() {
        println!(
            "   {} Size difference: {:.2}% (acceptable)",
            "[OK]".green(),
            report.size_delta_pct
        );
    } else {
        println!(
            "   {} Size difference: {:.2}% (review recommended)",
            "[WARN]".yellow(),
            report.size_delta_pct
        );
    }

    println!("   Original files: {}", report.original_members);
    println!("   Rezipped files: {}", report.rebuilt_members);

    if report.filesets_match() {
        println!("   {} File list matches perfectly", "[OK]".green());
    } else {
        if !report.missing.is_empty() {
            println!(
                "   {} Missing files: {}",
                "[WARN]".yellow(),
                report.missing.join(", ")
            );
        }
        if !report.extra.is_empty() {
            println!(
                "   {} Extra files: {}",
                "[WARN]".yellow(),
                report.extra.join(", ")
            );
        }
    }
}

pub fn print_verify_error(err: &ExploreError) {
    println!("   {} Verification failed: {err}", "[ERROR]".red());
}

pub fn print_footer(workdir: &Path, rebuilt: &Path) {
    println!("\n{}", rule());
    println!("{}", "[SUCCESS] COMPLETE".green().bold());
    println!("{}", rule());
    println!("\nXML directory: {}", workdir.display());
    println!("Rezipped file: {}", rebuilt.display());
    println!("\nNext steps:");
    println!("   1. Explore {}/{} to see named ranges", workdir.display(), WORKBOOK_PART);
    println!("   2. Explore {}/{}/ to see sheet data", workdir.display(), WORKSHEETS_DIR);
    println!("   3. Test the rezipped file in a spreadsheet application");
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
