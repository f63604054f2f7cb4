//! Utility functions for creating and handling A2A Message objects.

use crate::types::{Message, Part, Role};
use crate::utils::parts::get_text_parts;

/// Creates a new agent message containing a single text Part.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_agent_text_message;
///
/// let message = new_agent_text_message("Hello, I'm an agent");
/// assert_eq!(message.role, a2a_rs::types::Role::Agent);
/// ```
pub fn new_agent_text_message(text: impl Into<String>) -> Message {
    Message {
        role: Role::Agent,
        parts: vec![Part::text(text)],
        metadata: None,
    }
}

/// Creates a new agent message containing a list of Parts.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::new_agent_parts_message;
///
/// let parts = vec![
///     Part::Text { text: "Hello".to_string(), metadata: None },
/// ];
/// let message = new_agent_parts_message(parts);
/// assert_eq!(message.role, a2a_rs::types::Role::Agent);
/// ```
pub fn new_agent_parts_message(parts: Vec<Part>) -> Message {
    Message {
        role: Role::Agent,
        parts,
        metadata: None,
    }
}

/// Extracts and joins all text content from a Message's parts.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::{new_agent_text_message, get_message_text};
///
/// let message = new_agent_text_message("Hello, world!");
/// let text = get_message_text(&message, "\n");
/// assert_eq!(text, "Hello, world!");
/// ```
pub fn get_message_text(message: &Message, delimiter: &str) -> String {
    get_text_parts(&message.parts).join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_new_agent_text_message_basic() {
        let message = new_agent_text_message("Hello");
        assert_eq!(message.role, Role::Agent);
        assert_eq!(message.parts.len(), 1);
    }

    #[test]
    fn test_new_agent_parts_message() {
        let parts = vec![Part::Text {
            text: "Test".to_string(),
            metadata: None,
        }];
        let message = new_agent_parts_message(parts);
        assert_eq!(message.role, Role::Agent);
        assert_eq!(message.parts.len(), 1);
    }

    #[test]
    fn test_get_message_text_empty() {
        let message = new_agent_parts_message(vec![]);
        assert_eq!(get_message_text(&message, "\n"), "");
    }
}
