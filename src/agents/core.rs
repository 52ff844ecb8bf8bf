//! Agent contract and the per-agent message journal

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::Result;
use crate::prompts::{PromptFamily, PromptLibrary, PromptType};

/// Entries kept per agent
pub const JOURNAL_CAPACITY: usize = 100;

/// One journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub timestamp: DateTime<Utc>,
    pub agent: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: serde_json::Value,
}

/// Bounded record of what an agent was asked to do
#[derive(Debug)]
pub struct AgentJournal {
    agent: &'static str,
    messages: Mutex<VecDeque<AgentMessage>>,
}

impl AgentJournal {
    pub fn new(agent: &'static str) -> Self {
        Self {
            agent,
            messages: Mutex::new(VecDeque::with_capacity(JOURNAL_CAPACITY)),
        }
    }

    /// Append an entry, dropping the oldest past capacity
    pub fn record(&self, kind: &str, content: serde_json::Value) {
        let mut messages = self.messages.lock();
        messages.push_back(AgentMessage {
            timestamp: Utc::now(),
            agent: self.agent.to_string(),
            kind: kind.to_string(),
            content,
        });
        while messages.len() > JOURNAL_CAPACITY {
            messages.pop_front();
        }
    }

    pub fn history(&self) -> Vec<AgentMessage> {
        self.messages.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

/// A pipeline stage with a typed input and output
#[async_trait]
pub trait Agent: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    /// Agent name as written to the journal
    fn name(&self) -> &'static str;

    fn journal(&self) -> &AgentJournal;

    /// Prompt family used when composing prompts
    fn prompt_family(&self) -> PromptFamily {
        PromptFamily::General
    }

    async fn process(&self, input: Self::Input) -> Result<Self::Output>;

    /// `<system>\n\n<agent>\n\nUser Request: <prompt>` for this agent's family
    fn construct_prompt(&self, user_prompt: &str, prompt_type: PromptType) -> String {
        PromptLibrary::compose(self.prompt_family(), user_prompt, prompt_type, None)
    }

    fn message_history(&self) -> Vec<AgentMessage> {
        self.journal().history()
    }

    fn clear_message_history(&self) {
        self.journal().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_journal_keeps_last_hundred() {
        let journal = AgentJournal::new("layout");
        for i in 0..105 {
            journal.record("layout_generation", json!({ "n": i }));
        }

        let history = journal.history();
        assert_eq!(history.len(), JOURNAL_CAPACITY);
        assert_eq!(history[0].content["n"], 5);
        assert_eq!(history[99].content["n"], 104);
        assert_eq!(history[0].agent, "layout");
    }

    #[test]
    fn test_journal_clear() {
        let journal = AgentJournal::new("image");
        journal.record("image_search", json!({}));
        journal.clear();
        assert!(journal.history().is_empty());
    }
}
