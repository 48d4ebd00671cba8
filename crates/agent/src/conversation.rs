//! Conversation transcript.

use crate::model::ToolCall;
use serde_json::Value;

/// One entry in the transcript.
#[derive(Clone, Debug, PartialEq)]
pub enum Turn {
    /// A user utterance.
    User(String),
    /// A model response: text, tool-call requests, or both.
    Model {
        text: String,
        tool_calls: Vec<ToolCall>,
    },
    /// The result of one tool call, in the order the calls were requested.
    ToolResult { name: String, content: Value },
}

/// Append-only sequence of turns for one session.
///
/// Turns can be added and read but never removed or rewritten.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::User(text.into()));
    }

    pub fn push_model(&mut self, text: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.turns.push(Turn::Model {
            text: text.into(),
            tool_calls,
        });
    }

    pub fn push_tool_result(&mut self, name: impl Into<String>, content: Value) {
        self.turns.push(Turn::ToolResult {
            name: name.into(),
            content,
        });
    }

    /// Returns all turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turns_keep_insertion_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.is_empty());

        conversation.push_user("who is employee 1?");
        conversation.push_model(
            "",
            vec![ToolCall::new("get_employee_details", json!({"employee_id": 1}))],
        );
        conversation.push_tool_result("get_employee_details", json!({"id": 1}));
        conversation.push_model("Ada Lovelace.", vec![]);

        assert_eq!(conversation.len(), 4);
        assert_eq!(conversation.turns()[0], Turn::User("who is employee 1?".into()));
        assert!(matches!(
            &conversation.turns()[2],
            Turn::ToolResult { name, .. } if name == "get_employee_details"
        ));
        assert_eq!(
            conversation.last(),
            Some(&Turn::Model {
                text: "Ada Lovelace.".into(),
                tool_calls: vec![]
            })
        );
    }
}
