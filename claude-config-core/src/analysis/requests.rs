//! Repeated request classification
//!
//! Every user turn is matched against an ordered table of request
//! categories. One message may fall into several categories.

use crate::types::{Conversation, Tally};
use regex::Regex;
use std::sync::LazyLock;

const REQUEST_TABLE: &[(&str, &str)] = &[
    ("파일 생성", r"(만들어|생성|create|write).*파일|파일.*(만들어|생성)"),
    ("파일 수정", r"(수정|변경|edit|modify).*파일|파일.*(수정|변경)"),
    ("코드 리뷰", r"(리뷰|review|검토|확인)"),
    ("설명 요청", r"(설명|explain|알려|뭐야|무엇)"),
    ("테스트", r"(테스트|test|실행|run)"),
    ("커밋", r"(커밋|commit|푸시|push)"),
    ("검색", r"(찾아|검색|search|find|어디)"),
    ("디버깅", r"(에러|error|버그|bug|왜.*안|안.*되|fix)"),
];

static REQUEST_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    REQUEST_TABLE
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(&format!("(?i){}", pattern)).unwrap()))
        .collect()
});

/// Category labels in table order.
pub fn request_categories() -> impl Iterator<Item = &'static str> {
    REQUEST_TABLE.iter().map(|(label, _)| *label)
}

/// Categories a single message falls into, in table order.
pub fn classify(text: &str) -> Vec<&'static str> {
    REQUEST_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(label, _)| *label)
        .collect()
}

/// Hits per category, most frequent first. Ties keep table order; zero counts are left out.
pub fn find_repeated_requests(conversations: &[Conversation]) -> Vec<Tally> {
    let mut tallies: Vec<Tally> = request_categories().map(|label| Tally::new(label, 0)).collect();

    for message in conversations.iter().flat_map(|c| c.user_messages()) {
        for label in classify(&message.content) {
            if let Some(tally) = tallies.iter_mut().find(|t| t.label == label) {
                tally.count += 1;
            }
        }
    }

    tallies.retain(|t| t.count > 0);
    // Stable sort keeps table order among equal counts
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn test_classify_multiple_categories() {
        assert_eq!(classify("테스트 파일 만들어줘"), vec!["파일 생성", "테스트"]);
        assert_eq!(classify("파일 만들어줘"), vec!["파일 생성"]);
        assert_eq!(classify("Please FIX this error"), vec!["디버깅"]);
        assert_eq!(classify("commit and push"), vec!["커밋"]);
        assert_eq!(classify("Write the config 파일"), vec!["파일 생성"]);
        assert!(classify("안녕하세요").is_empty());
    }

    #[test]
    fn test_counts_sorted_with_table_order_ties() {
        let conv = Conversation::new(
            "s",
            vec![
                Message::user("검색해줘 찾아서"),
                Message::user("커밋해줘"),
                Message::user("어디 있어?"),
                Message::assistant("commit 했습니다", vec![]),
                Message::user("설명해줘"),
            ],
        );

        let tallies = find_repeated_requests(&[conv]);
        assert_eq!(
            tallies,
            vec![
                Tally::new("검색", 2),
                Tally::new("설명 요청", 1),
                Tally::new("커밋", 1),
            ]
        );
    }

    #[test]
    fn test_no_conversations() {
        assert!(find_repeated_requests(&[]).is_empty());
    }
}
