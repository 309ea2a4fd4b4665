//! Seed the catalog from a YAML file.
//!
//! The file is a list of watches without ids:
//!
//! ```yaml
//! - name: Explorer
//!   collection: Field
//!   price: 1299
//!   img: explorer.png
//!   description: 36mm steel
//! ```

use std::path::Path;

use tracing::{error, info};

use watchshop_storefront::db::WatchRepository;
use watchshop_storefront::models::WatchDraft;

use super::{CommandError, DataDir};

/// Parse and validate a seed file without touching the data directory.
///
/// # Errors
///
/// Returns an error if the YAML does not parse or any entry is invalid.
pub fn parse(content: &str) -> Result<Vec<WatchDraft>, CommandError> {
    let drafts: Vec<WatchDraft> = serde_yaml::from_str(content)?;

    let errors: Vec<String> = drafts
        .iter()
        .enumerate()
        .filter_map(|(index, draft)| {
            draft
                .validate()
                .err()
                .map(|e| format!("entry {}: {e}", index + 1))
        })
        .collect();

    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    Ok(drafts)
}

/// Append the watches in `file` to `watches.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, or if the
/// catalog cannot be written. Nothing is written when validation fails.
pub async fn watches(data_dir: &Path, file: &Path, clear: bool) -> Result<(), CommandError> {
    info!(path = %file.display(), "Loading watches from file");

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CommandError::Input {
            path: file.display().to_string(),
            source,
        })?;
    let drafts = parse(&content)?;
    info!(watches = drafts.len(), "Parsed seed file");

    let data = DataDir::open(data_dir);
    let repo = WatchRepository::new(&data.watches);

    if clear {
        let removed = repo.clear().await?;
        info!(removed, "Cleared existing watches");
    }

    let created = repo.create_many(drafts).await?;
    info!(created = created.len(), "Seeding complete");

    Ok(())
}
