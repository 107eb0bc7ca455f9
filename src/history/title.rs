//! Title synthesis for saved chat histories.
//!
//! Purely cosmetic: the only hard requirement is that every log, however
//! malformed, yields a non-empty title.

use chrono::Local;

use crate::llm::{Message, Role};

const TECH_TERMS: &[&str] = &[
    "AWS",
    "S3",
    "Python",
    "JavaScript",
    "SQL",
    "Docker",
    "Kubernetes",
    "ML",
    "API",
    "Django",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "FastAPI",
    "Flask",
    "Database",
    "Git",
    "DevOps",
    "Cloud",
];

const LEAD_IN_PHRASES: &[&str] = &[
    "how to",
    "create a",
    "build a",
    "implement",
    "design",
    "develop",
    "code for",
    "example of",
    "tutorial",
];

/// Derive a human-readable title for a chat log.
///
/// Falls back to a timestamped generic title when no topic can be derived
/// from the first user message.
pub fn generate_title(messages: &[Message]) -> String {
    let stamp = Local::now().format("%A, %B %d, %Y - %H:%M");
    match derive_topic(messages) {
        Some(topic) => format!("{stamp} - {topic}"),
        None => format!("{stamp} - Chat Session"),
    }
}

fn derive_topic(messages: &[Message]) -> Option<String> {
    if messages.len() < 2 {
        return None;
    }
    let first_user = messages.iter().find(|m| m.role == Role::User)?;
    let text = first_user.content.as_str();
    if text.trim().is_empty() {
        return None;
    }
    keyword_topic(text)
        .or_else(|| phrase_topic(text))
        .or_else(|| Some(leading_words(text)))
}

/// First recognized technology keyword, by case-insensitive substring match.
fn keyword_topic(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    TECH_TERMS
        .iter()
        .find(|term| lower.contains(&term.to_lowercase()))
        .map(|term| term.to_string())
}

/// Lead-in phrase plus up to ~30 characters of what follows it, cut at the
/// first sentence-ending punctuation.
fn phrase_topic(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for phrase in LEAD_IN_PHRASES {
        let Some(idx) = lower.find(phrase) else {
            continue;
        };
        let start = idx + phrase.len();
        // Lowercasing can shift byte offsets for non-ASCII text; fall back to
        // the lowered copy when the original cannot be sliced safely.
        let tail = if lower.len() == text.len() && text.is_char_boundary(start) {
            &text[start..]
        } else {
            &lower[start..]
        };
        let mut snippet: String = tail.chars().take(30).collect::<String>().trim().to_string();
        for punct in ['.', '?', '!', '\n'] {
            if let Some(i) = snippet.find(punct) {
                snippet.truncate(i);
            }
        }
        return Some(format!("{phrase} {}", snippet.trim()));
    }
    None
}

/// Fallback: the first seven words, hard-truncated to 40 characters.
fn leading_words(text: &str) -> String {
    let topic = text.split_whitespace().take(7).collect::<Vec<_>>().join(" ");
    if topic.chars().count() > 40 {
        let truncated: String = topic.chars().take(37).collect();
        format!("{truncated}...")
    } else {
        topic
    }
}
