use md_translate_de::llm::LLMBuilder;
use md_translate_de::llm::dummy::{DummyLLM, DummyLLMBuilder};
use md_translate_de::*;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn create_docs(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn quiet_config() -> TranslationConfig {
    TranslationConfig {
        echo: false,
        ..TranslationConfig::default()
    }
}

#[tokio::test]
async fn translates_document_and_rewrites_links() {
    let dir = create_docs(&[("intro.md", "[See here](setup.md)")]);
    let llm = DummyLLM::fixed("Schau mal [hier](setup.md)");

    let report = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.written, vec![dir.path().join("intro_DE.md")]);
    assert_eq!(read(dir.path(), "intro_DE.md"), "Schau mal [hier](setup_DE.md)");
    assert_eq!(read(dir.path(), "intro.md"), "[See here](setup.md)");
}

#[tokio::test]
async fn linked_files_are_not_translated_unless_present() {
    let dir = create_docs(&[("intro.md", "[See here](setup.md)")]);
    let llm = DummyLLM::echo();

    LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert_eq!(read(dir.path(), "intro_DE.md"), "[See here](setup_DE.md)");
    assert!(!dir.path().join("setup.md").exists());
    assert!(!dir.path().join("setup_DE.md").exists());
}

#[tokio::test]
async fn rerun_skips_translated_files_and_overwrites_them() {
    let dir = create_docs(&[("intro.md", "Hello"), ("intro_DE.md", "Altes Hallo")]);
    let llm = DummyLLM::fixed("Hallo");

    let report = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert_eq!(report.written, vec![dir.path().join("intro_DE.md")]);
    assert_eq!(read(dir.path(), "intro_DE.md"), "Hallo");
    assert!(!dir.path().join("intro_DE_DE.md").exists());
}

#[tokio::test]
async fn only_markdown_files_are_processed() {
    let dir = create_docs(&[
        ("guide.md", "Guide"),
        ("notes.txt", "Notes"),
        ("a.b.md", "Dotted"),
    ]);
    let llm = DummyLLM::echo();

    let report = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert_eq!(
        report.written,
        vec![dir.path().join("a.b_DE.md"), dir.path().join("guide_DE.md")]
    );
    assert!(!dir.path().join("notes_DE.txt").exists());
}

#[tokio::test]
async fn service_failure_aborts_run_by_default() {
    let dir = create_docs(&[("a.md", "A"), ("b.md", "B")]);
    let llm = DummyLLM::failing("quota exceeded");

    let err = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::ServiceError { .. }));
    assert_eq!(err.path(), Some(dir.path().join("a.md").as_path()));
    assert!(!dir.path().join("a_DE.md").exists());
    assert!(!dir.path().join("b_DE.md").exists());
}

#[tokio::test]
async fn failures_are_collected_when_continuing() {
    let dir = create_docs(&[("a.md", "A"), ("c.md", "C")]);
    // Not valid UTF-8
    fs::write(dir.path().join("b.md"), [0xff, 0xfe, 0x00]).unwrap();
    let llm = DummyLLM::echo();
    let cfg = TranslationConfig {
        continue_on_error: true,
        ..quiet_config()
    };

    let report = LlmTranslationService::new(&llm, &cfg)
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(
        report.written,
        vec![dir.path().join("a_DE.md"), dir.path().join("c_DE.md")]
    );
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        report.failed[0],
        TranslationError::ReadError { .. }
    ));
}

#[tokio::test]
async fn write_failure_keeps_translation() {
    let dir = create_docs(&[("intro.md", "Hello")]);
    // A directory in place of the output file makes the write fail
    fs::create_dir(dir.path().join("intro_DE.md")).unwrap();
    let llm = DummyLLM::fixed("Hallo [du](next.md)");

    let err = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::WriteError { .. }));
    let document = err.into_document().unwrap();
    assert_eq!(document.content, "Hallo [du](next_DE.md)");
    assert_eq!(document.output_path, dir.path().join("intro_DE.md"));

    // The saved translation can be persisted once the obstacle is gone
    fs::remove_dir(dir.path().join("intro_DE.md")).unwrap();
    let written = generator::write(document).await.unwrap();
    assert_eq!(read(dir.path(), "intro_DE.md"), "Hallo [du](next_DE.md)");
    assert_eq!(written, dir.path().join("intro_DE.md"));
}

#[tokio::test]
async fn missing_directory_is_scan_error() {
    let dir = tempdir().unwrap();
    let llm = DummyLLM::echo();

    let err = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir(&dir.path().join("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::ScanError(_)));
    assert_eq!(err.path(), None);
}

#[tokio::test]
async fn translate_file_does_not_write() {
    let dir = create_docs(&[("intro.md", "[Next](next.md)")]);
    let llm = DummyLLM::echo();

    let document = LlmTranslationService::new(&llm, &quiet_config())
        .translate_file(&dir.path().join("intro.md"))
        .await
        .unwrap();

    assert_eq!(document.content, "[Next](next_DE.md)");
    assert_eq!(document.source_path, dir.path().join("intro.md"));
    assert!(!dir.path().join("intro_DE.md").exists());
}

#[tokio::test]
async fn progress_is_reported_per_file() {
    let dir = create_docs(&[("a.md", "A"), ("b.md", "B"), ("c.txt", "C")]);
    let llm = DummyLLMBuilder.build(&quiet_config()).await.unwrap();
    let seen = RefCell::new(vec![]);

    LlmTranslationService::new(&llm, &quiet_config())
        .with_progress(|p: Progress| seen.borrow_mut().push((p.processed_files, p.total_files)))
        .translate_dir(dir.path())
        .await
        .unwrap();

    assert_eq!(seen.into_inner(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn progress_lines_and_translation_go_to_output() {
    let dir = create_docs(&[("intro.md", "[See here](setup.md)")]);
    let llm = DummyLLM::fixed("Schau [hier](setup.md)");
    let cfg = TranslationConfig {
        echo: true,
        ..TranslationConfig::default()
    };
    let mut out = Vec::new();

    LlmTranslationService::new(&llm, &cfg)
        .translate_dir_to(dir.path(), &mut out)
        .await
        .unwrap();

    let expected = format!(
        "Processing: intro.md\nSchau [hier](setup_DE.md)\nTranslated and saved: {}\n",
        dir.path().join("intro_DE.md").display()
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[tokio::test]
async fn echo_can_be_disabled() {
    let dir = create_docs(&[("intro.md", "Hello")]);
    let llm = DummyLLM::fixed("Hallo");
    let mut out = Vec::new();

    LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir_to(dir.path(), &mut out)
        .await
        .unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Processing: intro.md\nTranslated and saved: "));
    assert!(!out.contains("Hallo"));
}

#[tokio::test]
async fn failed_write_is_salvaged_to_output() {
    let dir = create_docs(&[("intro.md", "Hello")]);
    fs::create_dir(dir.path().join("intro_DE.md")).unwrap();
    let llm = DummyLLM::fixed("Hallo");
    let mut run_out = Vec::new();

    let err = LlmTranslationService::new(&llm, &quiet_config())
        .translate_dir_to(dir.path(), &mut run_out)
        .await
        .unwrap_err();

    let mut out = Vec::new();
    let document = salvage(err, false, &mut out).unwrap();

    assert_eq!(document.content, "Hallo");
    assert_eq!(String::from_utf8(out).unwrap(), "Hallo\n");
}

#[tokio::test]
async fn echoed_translation_is_not_printed_twice() {
    let dir = create_docs(&[("intro.md", "Hello")]);
    fs::create_dir(dir.path().join("intro_DE.md")).unwrap();
    let llm = DummyLLM::fixed("Hallo");
    let cfg = TranslationConfig::default();
    let mut run_out = Vec::new();

    let err = LlmTranslationService::new(&llm, &cfg)
        .translate_dir_to(dir.path(), &mut run_out)
        .await
        .unwrap_err();

    let mut out = Vec::new();
    assert!(salvage(err, cfg.echo, &mut out).is_some());

    assert!(out.is_empty());
    assert_eq!(
        String::from_utf8(run_out).unwrap(),
        "Processing: intro.md\nHallo\n"
    );
}

#[test]
fn nothing_to_salvage_from_read_error() {
    let err = TranslationError::ReadError {
        path: "intro.md".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    let mut out = Vec::new();

    assert!(salvage(err, false, &mut out).is_none());
    assert!(out.is_empty());
}
