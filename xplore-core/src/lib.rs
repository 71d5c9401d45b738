//! Exploration and round-trip verification of OpenXML spreadsheet
//! containers.
//!
//! An `.xlsx` file is a ZIP archive of XML parts. This crate provides
//! the stages of a one-shot inspection pipeline over that structure:
//!
//! 1. [`decrypt_if_needed`] — pass through plain archives, decrypt
//!    password-protected containers into a sibling file.
//! 2. [`extract_archive`] — clean extraction into a working directory.
//! 3. [`render_tree`] — depth-bounded structural listing.
//! 4. [`inspect_parts`] — summary counts over the well-known parts
//!    (workbook descriptor, worksheets, shared strings, styles,
//!    content types).
//! 5. [`repack_dir`] + [`verify_round_trip`] — rebuild the archive and
//!    compare it against the original.
//!
//! Stages are standalone functions over filesystem paths; the CLI in
//! `xplorecli` drives them in fixed order.

pub mod config;
pub mod decrypt;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod repack;
pub mod tree;
pub mod verify;

pub use config::{CredentialProvider, EnvCredentials, ExploreConfig, PASSWORD_ENV_VAR};
pub use decrypt::{Prepared, decrypt_if_needed};
pub use error::ExploreError;
pub use extract::extract_archive;
pub use inspect::{InspectionReport, inspect_parts};
pub use repack::repack_dir;
pub use tree::render_tree;
pub use verify::{SIZE_TOLERANCE_PCT, VerifyReport, verify_round_trip};
