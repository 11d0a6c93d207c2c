//! Startup seeding of the address book from a JSON document.
//!
//! The document uses the same shape as the collection listing:
//!
//! ```json
//! { "persons": [ { "id": 1, "name": "Salvador" }, { "name": "Juan" } ] }
//! ```
//!
//! `name` is required, `id` is optional and `href` values are ignored.

use crate::contacts::{ContactsError, InMemoryAddressBook, PersonDraft};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a seed document.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The seed file is not a valid address book document.
    #[error("failed to parse seed document: {0}")]
    Parse(#[from] serde_json::Error),
    /// The seed document violates an address book invariant.
    #[error("invalid seed document: {0}")]
    Contacts(#[from] ContactsError),
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    persons: Vec<PersonDraft>,
}

/// Build a book from an in-memory JSON document.
pub fn parse_seed(document: &str) -> Result<InMemoryAddressBook, SeedError> {
    let SeedDocument { persons } = serde_json::from_str(document)?;
    Ok(InMemoryAddressBook::from_persons(persons)?)
}

/// Read and parse a seed file.
pub fn load_seed(path: &Path) -> Result<InMemoryAddressBook, SeedError> {
    let document = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let book = parse_seed(&document)?;
    tracing::info!(path = %path.display(), "Loaded address book seed");
    Ok(book)
}
