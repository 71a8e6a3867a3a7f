//! Correction detection
//!
//! A correction is a user turn, directly after an assistant turn, that
//! contains one of a fixed set of "that was wrong" markers.

use crate::config::Limits;
use crate::format::truncate_chars;
use crate::types::Conversation;
use serde::Serialize;

/// Correction markers, checked in order against the lower-cased user text.
pub const CORRECTION_KEYWORDS: &[&str] = &[
    "아니",
    "그게 아니라",
    "잘못",
    "틀렸",
    "다시",
    "이렇게 말고",
    "그렇게 하지 말고",
    "반말",
    "존댓말",
    "that's not",
    "wrong",
    "incorrect",
    "try again",
    "too casual",
    "too formal",
];

/// Markers that are about tone rather than content.
pub const TONE_KEYWORDS: &[&str] = &["반말", "존댓말", "too casual", "too formal"];

/// Placeholder for an assistant turn that had no text.
pub const TOOL_CALLS_ONLY: &str = "[tool calls only]";

pub fn is_tone_keyword(keyword: &str) -> bool {
    TONE_KEYWORDS.contains(&keyword)
}

/// A user turn correcting the assistant turn before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    /// First matching marker
    pub keyword: String,
    pub user_correction: String,
    pub assistant_response: String,
}

impl Correction {
    pub fn is_tone(&self) -> bool {
        is_tone_keyword(&self.keyword)
    }
}

fn first_keyword(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CORRECTION_KEYWORDS
        .iter()
        .copied()
        .find(|kw| lower.contains(kw))
}

pub fn find_corrections(conversations: &[Conversation], limits: &Limits) -> Vec<Correction> {
    let mut corrections = Vec::new();

    for conv in conversations {
        for pair in conv.messages.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if !(prev.is_assistant() && next.is_user()) {
                continue;
            }
            let Some(keyword) = first_keyword(&next.content) else {
                continue;
            };

            let assistant_response = if prev.content.is_empty() {
                TOOL_CALLS_ONLY.to_string()
            } else {
                truncate_chars(&prev.content, limits.preview_chars)
            };

            corrections.push(Correction {
                keyword: keyword.to_string(),
                user_correction: truncate_chars(&next.content, limits.preview_chars),
                assistant_response,
            });
        }
    }

    corrections
}
