//! Utility functions for creating A2A Artifact objects.

use crate::types::{Artifact, Part};
use crate::utils::parts::get_text_parts;
use serde_json::Value;

/// Creates a new Artifact at the given index.
///
/// Artifacts sharing the same `index` are chunks of one logical artifact;
/// pass `append = Some(true)` for continuation chunks and
/// `last_chunk = Some(true)` on the final chunk.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::new_artifact;
///
/// let parts = vec![
///     Part::Text { text: "Sample text".to_string(), metadata: None },
/// ];
/// let artifact = new_artifact(0, parts, "My Artifact", Some("This is a test artifact."));
/// assert_eq!(artifact.name, Some("My Artifact".to_string()));
/// ```
pub fn new_artifact(
    index: u32,
    parts: Vec<Part>,
    name: impl Into<String>,
    description: Option<impl Into<String>>,
) -> Artifact {
    Artifact {
        name: Some(name.into()),
        description: description.map(|d| d.into()),
        parts,
        index,
        append: None,
        last_chunk: None,
        metadata: None,
    }
}

/// Creates a new Artifact at index 0 containing only a single text Part.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_text_artifact;
///
/// let artifact = new_text_artifact("Text Artifact", "Hello, world!", Some("A greeting"));
/// assert_eq!(artifact.name, Some("Text Artifact".to_string()));
/// ```
pub fn new_text_artifact(
    name: impl Into<String>,
    text: impl Into<String>,
    description: Option<impl Into<String>>,
) -> Artifact {
    new_artifact(0, vec![Part::text(text)], name, description)
}

/// Creates a new Artifact at index 0 containing only a single data Part.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::new_data_artifact;
/// use serde_json::json;
///
/// let data = json!({"key": "value", "number": 123});
/// let artifact = new_data_artifact("Data Artifact", data, Some("Sample data"));
/// assert_eq!(artifact.name, Some("Data Artifact".to_string()));
/// ```
pub fn new_data_artifact(
    name: impl Into<String>,
    data: Value,
    description: Option<impl Into<String>>,
) -> Artifact {
    new_artifact(0, vec![Part::data(data)], name, description)
}

/// Extracts and joins all text content from an Artifact's parts.
///
/// # Example
///
/// ```
/// use a2a_rs::types::Part;
/// use a2a_rs::utils::{new_artifact, get_artifact_text};
///
/// let parts = vec![
///     Part::Text { text: "First line".to_string(), metadata: None },
///     Part::Text { text: "Second line".to_string(), metadata: None },
/// ];
/// let artifact = new_artifact(0, parts, "Multi-line", None::<String>);
/// let text = get_artifact_text(&artifact, "\n");
/// assert_eq!(text, "First line\nSecond line");
/// ```
pub fn get_artifact_text(artifact: &Artifact, delimiter: &str) -> String {
    get_text_parts(&artifact.parts).join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_artifact_at_index() {
        let parts = vec![Part::text("Sample text")];
        let artifact = new_artifact(3, parts, "test_artifact", None::<String>);
        assert_eq!(artifact.index, 3);
    }

    #[test]
    fn test_new_text_artifact() {
        let artifact = new_text_artifact("My Artifact", "Hello, world!", Some("A greeting"));
        assert_eq!(artifact.name, Some("My Artifact".to_string()));
        assert_eq!(artifact.description, Some("A greeting".to_string()));
        assert_eq!(artifact.parts.len(), 1);
    }

    #[test]
    fn test_new_data_artifact() {
        let data = serde_json::json!({"key": "value"});
        let artifact = new_data_artifact("Data Artifact", data.clone(), None::<String>);
        assert_eq!(artifact.name, Some("Data Artifact".to_string()));
        assert_eq!(artifact.parts.len(), 1);
    }

    #[test]
    fn test_get_artifact_text_empty() {
        let artifact = new_artifact(0, vec![], "Empty", None::<String>);
        assert_eq!(get_artifact_text(&artifact, "\n"), "");
    }
}
