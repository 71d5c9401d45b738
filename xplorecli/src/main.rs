use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use xplore_core::{
    EnvCredentials, ExploreConfig, InspectionReport, VerifyReport, decrypt_if_needed,
    extract_archive, inspect_parts, render_tree, repack_dir, verify_round_trip,
};

mod formatter;

#[derive(Parser)]
#[command(name = "xplorecli")]
#[command(about = "Inspect and round-trip the ZIP/XML structure of an OpenXML spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the spreadsheet file (possibly password-protected).
    /// May also be set as `source` in the config file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Working directory for extracted parts
    #[arg(short, long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Rebuilt archive path (defaults to <stem>_REZIPPED<ext> next to the source)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Decryption password (falls back to the XLSX_PASSWORD environment variable)
    #[arg(short, long)]
    password: Option<String>,

    /// Maximum depth for the structure listing
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON summary of the whole run
    Json,
}

#[derive(Serialize)]
struct RunSummary {
    source: PathBuf,
    working_file: PathBuf,
    decrypted: bool,
    extracted_members: usize,
    tree: String,
    inspection: InspectionReport,
    rebuilt_path: PathBuf,
    rebuilt_size: u64,
    verification: Option<VerifyReport>,
    verification_error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        ExploreConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from("xplore.toml");
        if default_config_path.exists() {
            ExploreConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ExploreConfig::default()
        }
    };

    // CLI flags override config file values
    if cli.file.is_some() {
        config.source = cli.file.clone();
    }
    if let Some(workdir) = cli.workdir.clone() {
        config.workdir = workdir;
    }
    if cli.output.is_some() {
        config.output = cli.output.clone();
    }
    if cli.password.is_some() {
        config.password = cli.password.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }

    let human = matches!(cli.format, OutputFormat::Human);
    let source = resolve_source(&config)?;

    if human {
        formatter::print_banner(&source);
    }

    // Stage 1: decryption gate. Failure here aborts the run.
    let prepared = match decrypt_if_needed(
        &source,
        config.password.as_deref(),
        &EnvCredentials::default(),
    ) {
        Ok(prepared) => prepared,
        Err(e) => {
            formatter::print_fatal(&format!("Could not prepare file for processing: {e}"));
            std::process::exit(1);
        }
    };
    if human {
        formatter::print_gate_outcome(&prepared);
    }

    // Stage 2: extraction. Failure here aborts the run.
    let extracted = match extract_archive(prepared.path(), &config.workdir) {
        Ok(count) => count,
        Err(e) => {
            formatter::print_fatal(&format!("Cannot unzip file: {e}"));
            std::process::exit(1);
        }
    };
    if human {
        formatter::print_extraction(prepared.path(), &config.workdir, extracted);
    }

    // Stage 3: structure listing (read-only, best effort).
    let tree = render_tree(&config.workdir, config.max_depth);
    if human {
        formatter::print_tree(&tree, config.max_depth);
    }

    // Stage 4: part inspection. Absent parts are fine; malformed XML is not.
    let inspection = inspect_parts(&config.workdir).with_context(|| {
        format!(
            "Failed to inspect extracted parts in {}",
            config.workdir.display()
        )
    })?;
    if human {
        formatter::print_inspection(&inspection);
    }

    // Stage 5: repackaging.
    let rebuilt_path = config.rebuilt_path(prepared.path());
    let rebuilt_size = repack_dir(&config.workdir, &rebuilt_path)
        .with_context(|| format!("Failed to rebuild archive at {}", rebuilt_path.display()))?;
    if human {
        formatter::print_repack(&config.workdir, &rebuilt_path, rebuilt_size);
    }

    // Stage 6: verification. Findings and failures never change the exit code.
    let (verification, verification_error) = match verify_round_trip(prepared.path(), &rebuilt_path)
    {
        Ok(report) => {
            if human {
                formatter::print_verification(&report);
            }
            (Some(report), None)
        }
        Err(e) => {
            if human {
                formatter::print_verify_error(&e);
            }
            (None, Some(e.to_string()))
        }
    };

    match cli.format {
        OutputFormat::Human => formatter::print_footer(&config.workdir, &rebuilt_path),
        OutputFormat::Json => {
            let summary = RunSummary {
                source,
                working_file: prepared.path().to_path_buf(),
                decrypted: prepared.was_decrypted(),
                extracted_members: extracted,
                tree,
                inspection,
                rebuilt_path,
                rebuilt_size,
                verification,
                verification_error,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// The positional FILE wins over the config file's `source`.
fn resolve_source(config: &ExploreConfig) -> Result<PathBuf> {
    config
        .source
        .clone()
        .context("No input file specified. Pass FILE or set `source` in the config file.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_file_overrides_configured_source() {
        let mut config = ExploreConfig {
            source: Some(PathBuf::from("from_config.xlsx")),
            ..ExploreConfig::default()
        };
        let cli_file = Some(PathBuf::from("from_cli.xlsx"));
        if cli_file.is_some() {
            config.source = cli_file;
        }
        assert_eq!(
            resolve_source(&config).unwrap(),
            PathBuf::from("from_cli.xlsx")
        );
    }

    #[test]
    fn configured_source_is_used_without_positional_file() {
        let config = ExploreConfig {
            source: Some(PathBuf::from("from_config.xlsx")),
            ..ExploreConfig::default()
        };
        assert_eq!(
            resolve_source(&config).unwrap(),
            PathBuf::from("from_config.xlsx")
        );
    }

    #[test]
    fn missing_source_everywhere_is_an_error() {
        let config = ExploreConfig::default();
        assert!(resolve_source(&config).is_err());
    }
}
