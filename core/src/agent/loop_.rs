use crate::agent::ToolRegistry;
use crate::traits::{ChatMessage, ChatRequest, Provider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ITERATIONS: usize = 20;

/// The agent control loop: model step, continuation decision, tool-dispatch
/// step, repeated until the model answers without requesting tools.
///
/// The conversation history is the only state threaded through the loop and
/// it only ever grows by appending.
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    max_iterations: usize,
}

impl AgentLoop {
    pub fn new(provider: Arc<dyn Provider>, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tool_registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Convenience wrapper: run a single user message and return the final
    /// assistant text.
    pub async fn process(&self, message: &str) -> Result<String> {
        let history = self.run(vec![ChatMessage::user(message)]).await?;
        Ok(history
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }

    /// Drives the loop to completion and returns the extended history. A
    /// provider failure aborts the run; tool failures do not (they are fed
    /// back to the model as result messages). Errors out if the model still
    /// requests tools after `max_iterations` model steps.
    pub async fn run(&self, mut messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>> {
        for iteration in 0..self.max_iterations {
            debug!("model step, iteration {}", iteration + 1);
            self.model_step(&mut messages).await?;

            let wants_tools = messages.last().is_some_and(ChatMessage::has_tool_calls);
            if !wants_tools {
                return Ok(messages);
            }

            let results = self.dispatch_tools(&messages).await;
            messages.extend(results);
        }

        anyhow::bail!(
            "agent did not finish within {} model steps",
            self.max_iterations
        )
    }

    /// Sends the full history plus the registry's tool specs to the provider
    /// and appends the assistant reply.
    async fn model_step(&self, messages: &mut Vec<ChatMessage>) -> Result<()> {
        let tools = self.tool_registry.specs();
        let request = ChatRequest {
            messages: messages.as_slice(),
            tools: if tools.is_empty() { None } else { Some(&tools) },
        };

        let response = self.provider.chat(request).await?;

        let text = response.text_or_empty().to_string();
        if response.has_tool_calls() {
            messages.push(ChatMessage::assistant_with_tool_calls(
                text,
                response.tool_calls,
            ));
        } else {
            messages.push(ChatMessage::assistant(text));
        }
        Ok(())
    }

    /// Inspects the last message only. Returns one result message per
    /// requested call, in the order the model issued them, or nothing when
    /// the tail carries no tool calls.
    async fn dispatch_tools(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let Some(last) = messages.last().filter(|m| m.has_tool_calls()) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        for call in last.tool_calls.iter().flatten() {
            info!("Calling tool: {} with args: {}", call.name, call.arguments);

            let content = match serde_json::from_str(&call.arguments) {
                Ok(args) => {
                    self.tool_registry
                        .execute(&call.name, args)
                        .await
                        .into_message_content()
                }
                Err(e) => format!("Error executing tool {}: invalid arguments: {}", call.name, e),
            };

            results.push(ChatMessage::tool_result(
                call.id.clone(),
                call.name.clone(),
                content,
            ));
        }

        results
    }
}
