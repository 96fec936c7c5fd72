//! Routing of completion chunks to the text and tool-call stores.

use crate::completion::ChatCompletionChunk;
use crate::error::Result;
use crate::store::ToolCallStreamStore;
use crate::text::TextStreamStore;

/// Feeds every chunk of a streamed completion into the matching store.
///
/// Only the first choice is consumed.
#[derive(Debug, Default)]
pub struct ChatStreamAssembler {
    /// Assistant message text.
    pub text: TextStreamStore,
    /// Reasoning text, when the model streams it separately.
    pub reasoning: TextStreamStore,
    /// Tool calls.
    pub tool_calls: ToolCallStreamStore,
}

impl ChatStreamAssembler {
    /// Create an assembler with default stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler around an existing tool-call store.
    pub fn with_tool_call_store(tool_calls: ToolCallStreamStore) -> Self {
        Self {
            text: TextStreamStore::new(),
            reasoning: TextStreamStore::new(),
            tool_calls,
        }
    }

    /// Route one chunk: text and reasoning are appended, tool-call fragments
    /// are applied in order.
    ///
    /// Stops at the first tool-call fragment that fails. Fragments before it
    /// stay applied.
    pub fn apply(&self, chunk: &ChatCompletionChunk) -> Result<()> {
        let Some(delta) = chunk.first_delta() else {
            return Ok(());
        };

        if let Some(content) = &delta.content {
            self.text.append_text(content);
        }
        if let Some(reasoning) = &delta.reasoning_content {
            self.reasoning.append_text(reasoning);
        }
        for tool_call in delta.tool_calls.iter().flatten() {
            self.tool_calls.set_tool_call(tool_call)?;
        }
        Ok(())
    }

    /// Clear every store for the next turn.
    pub fn reset(&self) {
        self.text.clear();
        self.reasoning.clear();
        self.tool_calls.clear();
    }
}
