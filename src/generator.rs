use crate::{LOCALE_MARKER, TranslatedDocument, TranslationError};

use std::path::{Path, PathBuf};
use tokio::fs;

/// Sibling path for the translated version of `input`: the locale marker goes in
/// front of the last extension (`a.b.md` -> `a.b_DE.md`).
pub fn output_path_for(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (base, ext) = split_extension(&file_name);
    input.with_file_name(format!("{base}{LOCALE_MARKER}{ext}"))
}

/// Splits off the last `.ext`, dot included. Leading dots never start an
/// extension, so `.md` and `..md` have none.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) if !file_name[..i].chars().all(|c| c == '.') => file_name.split_at(i),
        _ => (file_name, ""),
    }
}

/// Writes the document to its output path, replacing any previous translation.
///
/// On failure the document is handed back inside the error.
pub async fn write(document: TranslatedDocument) -> Result<PathBuf, TranslationError> {
    match fs::write(&document.output_path, document.content.as_bytes()).await {
        Ok(()) => Ok(document.output_path),
        Err(source) => Err(TranslationError::WriteError {
            path: document.source_path.clone(),
            document: Box::new(document),
            source,
        }),
    }
}
