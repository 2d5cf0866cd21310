use crate::{LOCALE_MARKER, SOURCE_EXT};

use itertools::Itertools;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Whether a file name denotes an untranslated source document.
pub fn is_source_document(file_name: &str) -> bool {
    file_name.ends_with(SOURCE_EXT) && !file_name.ends_with(&translated_suffix())
}

fn translated_suffix() -> String {
    format!("{LOCALE_MARKER}{SOURCE_EXT}")
}

/// Lists the source documents directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into.
pub async fn scan(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries = fs::read_dir(dir).await?;
    let mut found = vec![];

    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            log::warn!("Skipping non UTF-8 file name {:?}", file_name);
            continue;
        };
        if !is_source_document(file_name) {
            continue;
        }
        if entry.file_type().await?.is_dir() {
            log::debug!("Skipping directory {}", file_name);
            continue;
        }
        found.push(entry.path());
    }

    Ok(found.into_iter().sorted().collect())
}
