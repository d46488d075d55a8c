//! Text preparation for the embedding model.

/// Trim, collapse runs of whitespace to a single space, and lowercase.
pub fn normalize_for_embedding(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The text a note is embedded from.
pub fn embedding_input(title: &str, content: &str) -> String {
    normalize_for_embedding(&format!("{}\n\n{}", title, content))
}
