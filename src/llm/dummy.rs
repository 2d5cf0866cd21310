use super::{LLM, LLMBuilder};
use crate::{LLMError, TranslationConfig};
use anyhow::anyhow;

/// Offline stand-in for the translation service.
pub struct DummyLLMBuilder;

impl LLMBuilder for DummyLLMBuilder {
    type Built = DummyLLM;

    async fn build(&self, _cfg: &TranslationConfig) -> Result<Self::Built, LLMError> {
        Ok(DummyLLM::echo())
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Echo,
    Fixed(String),
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct DummyLLM {
    reply: Reply,
}

impl DummyLLM {
    /// Returns every document unchanged.
    pub fn echo() -> Self {
        DummyLLM { reply: Reply::Echo }
    }

    /// Returns the same text for every document.
    pub fn fixed(output: impl Into<String>) -> Self {
        DummyLLM {
            reply: Reply::Fixed(output.into()),
        }
    }

    /// Fails every request with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        DummyLLM {
            reply: Reply::Fail(message.into()),
        }
    }
}

impl LLM for DummyLLM {
    async fn translate(&self, text: &str) -> Result<String, LLMError> {
        match &self.reply {
            Reply::Echo => Ok(text.to_owned()),
            Reply::Fixed(output) => Ok(output.clone()),
            Reply::Fail(message) => Err(LLMError::ApiError(anyhow!("{message}"))),
        }
    }
}
