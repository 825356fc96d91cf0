// Summarizer Agent: answers a question over the trust-labeled context

use std::sync::Arc;

use tracing::info;

use crate::agents::retriever::ContextBundle;
use crate::error::LlmError;
use crate::llm_client::{ChatCompletion, ChatMessage, ChatModel};

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question based on the provided context. \
Some context documents can have a known level of trust, and others do not. \
Use the trust level to determine the reliability of the information. \
If the context doesn't contain relevant information, say so shortly and ignore it.";

const UNAVAILABLE_NOTE: &str =
    "Context sources were requested for this question but none of them could be retrieved.";

pub struct SummarizerAgent {
    model: Arc<dyn ChatModel>,
}

impl SummarizerAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn build_messages(prompt: &str, context: &ContextBundle) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        if context.is_unavailable() {
            messages.push(ChatMessage::system(UNAVAILABLE_NOTE));
        }
        messages.push(ChatMessage::system(format!("Context information:\n{}\n\n", context.text)));
        messages.push(ChatMessage::user(format!(
            "Please answer the following question based on the context provided: {}",
            prompt
        )));
        messages
    }

    pub async fn answer(&self, prompt: &str, context: &ContextBundle) -> Result<ChatCompletion, LlmError> {
        info!(has_context = context.has_context, "Summarizer: Answering with trust-labeled context");
        let messages = Self::build_messages(prompt, context);
        self.model.complete(&messages).await
    }
}
