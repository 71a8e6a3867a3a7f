//! Pattern extraction over a set of conversations
//!
//! Four independent passes, each producing one statistic:
//!
//! | Pass | Output | Looks at |
//! |------|--------|----------|
//! | [`corrections`] | `Vec<Correction>` | user turns right after assistant turns |
//! | [`requests`] | `Vec<Tally>` by category | every user turn |
//! | [`edits`] | [`EditPatterns`] | `Edit` tool calls |
//! | [`workflows`] | `Vec<Workflow>` | tool sequence per session |
//!
//! [`PatternExtractor::analyze`] bundles them into a [`PatternReport`].

pub mod corrections;
pub mod edits;
pub mod requests;
pub mod workflows;

pub use corrections::{Correction, CORRECTION_KEYWORDS, TONE_KEYWORDS};
pub use edits::{EditPatterns, EditRecord};
pub use workflows::Workflow;

use crate::config::Limits;
use crate::types::{Conversation, Pattern, PatternCategory, Tally};
use serde::Serialize;

/// Examples attached to each correction pattern.
const MAX_PATTERN_EXAMPLES: usize = 3;

/// Rule suggested for repeated tone corrections.
pub const TONE_RULE: &str = "항상 존댓말 사용";

/// All statistics extracted from one batch of conversations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternReport {
    pub corrections: Vec<Correction>,
    pub repeated_requests: Vec<Tally>,
    pub edit_patterns: EditPatterns,
    pub workflows: Vec<Workflow>,
}

impl PatternReport {
    pub fn has_tone_correction(&self) -> bool {
        self.corrections.iter().any(Correction::is_tone)
    }

    /// Corrections whose keyword is about tone.
    pub fn tone_correction_count(&self) -> usize {
        self.corrections.iter().filter(|c| c.is_tone()).count()
    }

    /// Correction counts per keyword, first-seen order.
    pub fn correction_counts(&self) -> Vec<Tally> {
        let mut counts: Vec<Tally> = Vec::new();
        for correction in &self.corrections {
            match counts.iter_mut().find(|t| t.label == correction.keyword) {
                Some(tally) => tally.count += 1,
                None => counts.push(Tally::new(correction.keyword.clone(), 1)),
            }
        }
        counts
    }

    /// Recurring behaviors surfaced from the statistics.
    pub fn patterns(&self) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for tally in self.correction_counts() {
            let examples: Vec<String> = self
                .corrections
                .iter()
                .filter(|c| c.keyword == tally.label)
                .take(MAX_PATTERN_EXAMPLES)
                .map(|c| c.user_correction.clone())
                .collect();

            let pattern = if corrections::is_tone_keyword(&tally.label) {
                Pattern {
                    category: PatternCategory::Preference,
                    description: format!("말투 교정: '{}'", tally.label),
                    frequency: tally.count,
                    examples,
                    suggested_rule: Some(TONE_RULE.to_string()),
                }
            } else {
                let suggested_rule = (tally.count >= 2).then(|| {
                    format!(
                        "'{}' 관련 실수 {}회 발생 - 관련 패턴 주의",
                        tally.label, tally.count
                    )
                });
                Pattern {
                    category: PatternCategory::Mistake,
                    description: format!("교정 키워드 '{}'", tally.label),
                    frequency: tally.count,
                    examples,
                    suggested_rule,
                }
            };
            patterns.push(pattern);
        }

        for tally in &self.repeated_requests {
            patterns.push(Pattern {
                category: PatternCategory::Workflow,
                description: format!("반복 요청: {}", tally.label),
                frequency: tally.count,
                examples: Vec::new(),
                suggested_rule: None,
            });
        }

        for tally in &self.edit_patterns.by_extension {
            patterns.push(Pattern {
                category: PatternCategory::Convention,
                description: format!(".{} 파일 편집", tally.label),
                frequency: tally.count,
                examples: Vec::new(),
                suggested_rule: None,
            });
        }

        patterns
    }
}

/// Runs the extraction passes with the configured limits.
#[derive(Debug, Clone, Default)]
pub struct PatternExtractor {
    limits: Limits,
}

impl PatternExtractor {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn find_corrections(&self, conversations: &[Conversation]) -> Vec<Correction> {
        corrections::find_corrections(conversations, &self.limits)
    }

    pub fn find_repeated_requests(&self, conversations: &[Conversation]) -> Vec<Tally> {
        requests::find_repeated_requests(conversations)
    }

    pub fn find_edit_patterns(&self, conversations: &[Conversation]) -> EditPatterns {
        edits::find_edit_patterns(conversations, &self.limits)
    }

    pub fn find_workflows(&self, conversations: &[Conversation]) -> Vec<Workflow> {
        workflows::find_workflows(conversations, &self.limits)
    }

    pub fn analyze(&self, conversations: &[Conversation]) -> PatternReport {
        let report = PatternReport {
            corrections: self.find_corrections(conversations),
            repeated_requests: self.find_repeated_requests(conversations),
            edit_patterns: self.find_edit_patterns(conversations),
            workflows: self.find_workflows(conversations),
        };

        tracing::info!(
            conversations = conversations.len(),
            corrections = report.corrections.len(),
            request_categories = report.repeated_requests.len(),
            edits = report.edit_patterns.total_edits,
            workflows = report.workflows.len(),
            "Extracted patterns"
        );
        report
    }
}
