use anyhow::{Context, bail};
use md_translate_de::llm::dummy::DummyLLMBuilder;
use md_translate_de::llm::openai::OpenAiGPTBuilder;
use md_translate_de::llm::LLMBuilder;
use md_translate_de::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Log to stderr, stdout carries the translations
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let cfg = TranslationConfig::load(&cwd)?;

    if cfg.dry_run {
        log::warn!("Dry run, documents are copied instead of translated");
        run(&DummyLLMBuilder, &cfg).await
    } else {
        run(&OpenAiGPTBuilder, &cfg).await
    }
}

async fn run(llm_builder: &impl LLMBuilder, cfg: &TranslationConfig) -> anyhow::Result<()> {
    let llm = llm_builder.build(cfg).await?;

    let service = LlmTranslationService::new(&llm, cfg).with_progress(|progress: Progress| {
        log::info!(
            "{}/{} files processed",
            progress.processed_files,
            progress.total_files
        );
    });

    let report = match service.translate_dir(&cfg.directory).await {
        Ok(report) => report,
        Err(err) => {
            log::error!("Aborting: {}", err);
            salvage(err, cfg.echo, &mut std::io::stdout());
            bail!("Translation aborted");
        }
    };

    log::info!("{} file(s) translated", report.written.len());

    if !report.is_success() {
        let failed = report.failed.len();
        for err in report.failed {
            log::error!("{}", err);
            salvage(err, cfg.echo, &mut std::io::stdout());
        }
        bail!("{} file(s) could not be translated", failed);
    }

    Ok(())
}
