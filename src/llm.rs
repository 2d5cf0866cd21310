pub mod dummy;
pub mod openai;

use super::{LLMError, TranslationConfig};

pub trait LLMBuilder {
    type Built: LLM;

    async fn build(&self, cfg: &TranslationConfig) -> Result<Self::Built, LLMError>;
}

pub trait LLM {
    /// Translates a whole document, returning the service output verbatim.
    async fn translate(&self, text: &str) -> Result<String, LLMError>;
}

const SYSTEM_PROMPT: &str = "You are a professional translator for technical documentation from english to german. \
Preserve the markdown formatting and technical terminology.";

const USER_PROMPT: &str = r#"
Please translate the following technical documentation from English to German.
Technical terms that are natively english and not common in the German programmer-language, such as open-source, should not be translated to German.
While referring to the reader, use the informal language instead of formal language.
This means, translating you to du instead of Sie.
The translated text should feel friendly and open for readers.
It is intended to help new, often insecure bachelors and masters students to quickly get up and running in our lab.
Preserve the markdown formatting and technical terminology:
"#;

/// Messages sent for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub system: String,
    pub user: String,
}

impl TranslationRequest {
    pub fn for_document(text: &str) -> Self {
        TranslationRequest {
            system: SYSTEM_PROMPT.to_owned(),
            user: format!("{}\n\n{}", USER_PROMPT.trim(), text),
        }
    }
}
