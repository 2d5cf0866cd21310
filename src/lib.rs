pub mod generator;
pub mod links;
pub mod llm;
pub mod scanner;
pub mod settings;
mod utils;

pub use crate::settings::TranslationConfig;

use crate::llm::LLM;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Marker inserted before the extension of every translated file.
pub const LOCALE_MARKER: &str = "_DE";

/// Extension of source documents, including the dot.
pub const SOURCE_EXT: &str = ".md";

#[derive(Debug)]
pub enum LLMError {
    ConnectionError(anyhow::Error),
    ApiError(anyhow::Error),
    InteractionError(anyhow::Error),
    OtherError(anyhow::Error),
}

impl Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::ConnectionError(e) => write!(f, "Connection error: {}", e),
            LLMError::ApiError(e) => write!(f, "API error: {}", e),
            LLMError::InteractionError(e) => write!(f, "Unexpected response: {}", e),
            LLMError::OtherError(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for LLMError {}

#[derive(Debug)]
pub enum TranslationError {
    ScanError(std::io::Error),
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    ServiceError {
        path: PathBuf,
        source: LLMError,
    },
    /// The translation succeeded but could not be saved. The document is kept
    /// so that it can be persisted again without another service call.
    WriteError {
        path: PathBuf,
        document: Box<TranslatedDocument>,
        source: std::io::Error,
    },
}

impl TranslationError {
    /// Source file the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TranslationError::ScanError(_) => None,
            TranslationError::ReadError { path, .. }
            | TranslationError::ServiceError { path, .. }
            | TranslationError::WriteError { path, .. } => Some(path),
        }
    }

    /// Recovers the translated document from a failed write.
    pub fn into_document(self) -> Option<TranslatedDocument> {
        match self {
            TranslationError::WriteError { document, .. } => Some(*document),
            _ => None,
        }
    }
}

impl Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::ScanError(e) => {
                write!(f, "Could not list directory: {}", e)
            }
            TranslationError::ReadError { path, source } => {
                write!(f, "Could not read {:?}: {}", path, source)
            }
            TranslationError::ServiceError { path, source } => {
                write!(f, "Translation of {:?} failed: {}", path, source)
            }
            TranslationError::WriteError {
                document, source, ..
            } => {
                write!(
                    f,
                    "Could not write {:?}: {}",
                    document.output_path, source
                )
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslationError::ScanError(e) => Some(e),
            TranslationError::ReadError { source, .. } => Some(source),
            TranslationError::ServiceError { source, .. } => Some(source),
            TranslationError::WriteError { source, .. } => Some(source),
        }
    }
}

/// Output of the translate stage, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Progress {
    pub processed_files: usize,
    pub total_files: usize,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    /// Only populated when failures do not abort the run.
    pub failed: Vec<TranslationError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Translates every source document of a directory, one file at a time.
pub struct LlmTranslationService<'a, L, SP> {
    llm: &'a L,
    echo: bool,
    continue_on_error: bool,
    send_progress: Option<SP>,
}

impl<'a, L> LlmTranslationService<'a, L, fn(Progress)>
where
    L: LLM,
{
    pub fn new(llm: &'a L, cfg: &TranslationConfig) -> Self {
        LlmTranslationService {
            llm,
            echo: cfg.echo,
            continue_on_error: cfg.continue_on_error,
            send_progress: None,
        }
    }
}

impl<'a, L, SP> LlmTranslationService<'a, L, SP>
where
    L: LLM,
    SP: Fn(Progress),
{
    pub fn with_progress<SP2>(self, send_progress: SP2) -> LlmTranslationService<'a, L, SP2>
    where
        SP2: Fn(Progress),
    {
        LlmTranslationService {
            llm: self.llm,
            echo: self.echo,
            continue_on_error: self.continue_on_error,
            send_progress: Some(send_progress),
        }
    }

    /// Processes all source documents in `dir`, reporting to stdout.
    ///
    /// Unless configured to continue, the first failing file aborts the run and its
    /// error is returned; files written before that stay on disk.
    pub async fn translate_dir(&self, dir: &Path) -> Result<RunReport, TranslationError> {
        self.translate_dir_to(dir, &mut std::io::stdout()).await
    }

    /// Same as [`Self::translate_dir`], with progress lines and translations going to `out`.
    pub async fn translate_dir_to(
        &self,
        dir: &Path,
        out: &mut impl Write,
    ) -> Result<RunReport, TranslationError> {
        let inputs = scanner::scan(dir)
            .await
            .map_err(TranslationError::ScanError)?;
        let total_files = inputs.len();
        log::info!("Found {} document(s) in {:?}", total_files, dir);

        let mut report = RunReport::default();

        for (current, input) in inputs.into_iter().enumerate() {
            let file_name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            emit(out, format_args!("Processing: {}", file_name));

            match self.process_file(&input, out).await {
                Ok(output) => {
                    emit(out, format_args!("Translated and saved: {}", output.display()));
                    report.written.push(output);
                }
                Err(err) if self.continue_on_error => {
                    log::warn!("Skipping {}: {}", file_name, err);
                    report.failed.push(err);
                }
                Err(err) => return Err(err),
            }

            if let Some(send_progress) = self.send_progress.as_ref() {
                send_progress(Progress {
                    processed_files: current + 1,
                    total_files,
                });
            }
        }

        Ok(report)
    }

    /// Translates a single file and writes the result next to it.
    pub async fn process_file(
        &self,
        input: &Path,
        out: &mut impl Write,
    ) -> Result<PathBuf, TranslationError> {
        let document = self.translate_file(input).await?;
        if self.echo {
            emit(out, format_args!("{}", document.content));
        }
        generator::write(document).await
    }

    /// Reads and translates `input` and rewrites its links, without writing anything.
    pub async fn translate_file(&self, input: &Path) -> Result<TranslatedDocument, TranslationError> {
        let content = fs::read_to_string(input)
            .await
            .map_err(|source| TranslationError::ReadError {
                path: input.to_owned(),
                source,
            })?;

        log::debug!(
            "Translating {:?} ({} bytes): \"{}\"",
            input,
            content.len(),
            utils::preview(&content, 20)
        );

        let translated =
            self.llm
                .translate(&content)
                .await
                .map_err(|source| TranslationError::ServiceError {
                    path: input.to_owned(),
                    source,
                })?;

        Ok(TranslatedDocument {
            source_path: input.to_owned(),
            output_path: generator::output_path_for(input),
            content: links::rewrite_links(&translated),
        })
    }
}

/// Prints a translation that could not be written, unless it was already echoed,
/// and returns it. Errors other than a failed write carry nothing to salvage.
pub fn salvage(
    err: TranslationError,
    echoed: bool,
    out: &mut impl Write,
) -> Option<TranslatedDocument> {
    let document = err.into_document()?;
    if !echoed {
        emit(out, format_args!("{}", document.content));
    }
    log::warn!(
        "Translation of {:?} was printed but not saved",
        document.source_path
    );
    Some(document)
}

fn emit(out: &mut impl Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line) {
        log::warn!("Could not write to output: {}", e);
    }
}
