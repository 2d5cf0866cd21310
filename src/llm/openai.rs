use super::{LLM, LLMBuilder, TranslationRequest};
use crate::{LLMError, TranslationConfig};
use anyhow::anyhow;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use std::error::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Builder for OpenAI-compatible chat completion APIs
pub struct OpenAiGPTBuilder;

impl LLMBuilder for OpenAiGPTBuilder {
    type Built = OpenAiGPT;

    async fn build(&self, cfg: &TranslationConfig) -> Result<Self::Built, LLMError> {
        // Falls back to OPENAI_API_KEY when no key is configured
        let mut config = OpenAIConfig::new();
        if let Some(api_key) = cfg.api_key.as_deref() {
            config = config.with_api_key(api_key);
        }
        if let Some(api_base) = cfg.api_base.as_deref() {
            config = config.with_api_base(api_base);
        }

        log::info!("Using model {}", cfg.model);

        Ok(OpenAiGPT {
            client: Client::with_config(config),
            model: cfg.model.clone(),
        })
    }
}

pub struct OpenAiGPT {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LLM for OpenAiGPT {
    async fn translate(&self, text: &str) -> Result<String, LLMError> {
        let request = self.chat_request(TranslationRequest::for_document(text))?;

        log::info!("Sending {} bytes to {}", text.len(), self.model);
        let response = self.client.chat().create(request).await?;

        first_choice_content(response)
    }
}

impl OpenAiGPT {
    fn chat_request(
        &self,
        req: TranslationRequest,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(req.system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(req.user)
                    .build()?
                    .into(),
            ])
            .build()
    }
}

fn first_choice_content(response: CreateChatCompletionResponse) -> Result<String, LLMError> {
    if let Some(usage) = response.usage.as_ref() {
        log::debug!(
            "Tokens used: {} prompt, {} completion",
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }

    let Some(choice) = response.choices.into_iter().next() else {
        return Err(LLMError::InteractionError(anyhow!("Response has no choices")));
    };

    choice
        .message
        .content
        .ok_or_else(|| LLMError::InteractionError(anyhow!("Response message has no content")))
}

impl From<OpenAIError> for LLMError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(e) => LLMError::ConnectionError(if let Some(e) = e.source() {
                anyhow!("{e}")
            } else {
                e.into()
            }),
            OpenAIError::ApiError(e) => LLMError::ApiError(anyhow!("{e}")),
            OpenAIError::JSONDeserialize(e) => LLMError::InteractionError(e.into()),
            OpenAIError::FileSaveError(e) => LLMError::OtherError(anyhow!("{e}")),
            OpenAIError::FileReadError(e) => LLMError::OtherError(anyhow!("{e}")),
            OpenAIError::StreamError(e) => LLMError::ConnectionError(anyhow!("{e}")),
            OpenAIError::InvalidArgument(e) => LLMError::OtherError(anyhow!("{e}")),
        }
    }
}
