//! Suggestion generation
//!
//! Maps a [`PatternReport`] to prioritized blocks for `CLAUDE.md`. Rules are
//! evaluated in a fixed order and each fires at most once:
//!
//! | # | Fires when | Priority | Section |
//! |---|------------|----------|---------|
//! | 1 | enough corrections, at least one about tone | 1 | `permanent` |
//! | 2 | top request category is frequent | 2 | `recent` |
//! | 3 | top edited extension is frequent | 3 | `recent` |
//! | 4 | an adjacent tool pair recurs | 2 | `recent` |
//!
//! The result is sorted by priority; equal priorities keep rule order.

use crate::analysis::{PatternReport, Workflow};
use crate::config::{Limits, Thresholds};
use crate::types::{Suggestion, Tally};
use chrono::{DateTime, Local, NaiveDate};

pub struct SuggestionGenerator {
    thresholds: Thresholds,
    top_tool_pairs: usize,
    date: NaiveDate,
}

impl SuggestionGenerator {
    /// A generator stamping blocks with today's local date.
    pub fn new(thresholds: Thresholds, limits: &Limits) -> Self {
        Self {
            thresholds,
            top_tool_pairs: limits.top_tool_pairs,
            date: Local::now().date_naive(),
        }
    }

    /// Override the date written into block headings.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    fn stamp(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn generate(&self, report: &PatternReport) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        let date = self.stamp();

        // Tone
        if report.corrections.len() >= self.thresholds.min_corrections
            && report.has_tone_correction()
        {
            suggestions.push(Suggestion {
                section: "permanent".to_string(),
                content: format!(
                    "### [{}] 말투 규칙\n- 항상 존댓말 사용\n- 반말 사용 금지\n",
                    date
                ),
                reason: format!("말투 관련 교정 {}회 감지", report.tone_correction_count()),
                priority: 1,
            });
        }

        // Frequent requests
        if let Some(top) = report.repeated_requests.first() {
            if top.count >= self.thresholds.frequent_request {
                suggestions.push(Suggestion {
                    section: "recent".to_string(),
                    content: format!(
                        "### [{}] 자주 하는 작업\n- {} ({}회): 효율적인 워크플로우 패턴 정립 필요\n",
                        date, top.label, top.count
                    ),
                    reason: format!("'{}' 작업 {}회 반복", top.label, top.count),
                    priority: 2,
                });
            }
        }

        // Dominant extension
        if let Some(top) = report.edit_patterns.by_extension.first() {
            if top.count >= self.thresholds.frequent_extension {
                suggestions.push(Suggestion {
                    section: "recent".to_string(),
                    content: format!(
                        "### [{}] 주요 작업 파일\n- .{} 파일 작업 빈도 높음 ({}회)\n- 관련 린팅/포맷팅 규칙 정립 권장\n",
                        date, top.label, top.count
                    ),
                    reason: format!(".{} 파일 편집 {}회", top.label, top.count),
                    priority: 3,
                });
            }
        }

        // Recurring tool pairs
        let pairs = tool_pair_counts(&report.workflows);
        if let Some(top) = pairs.first() {
            if top.count >= self.thresholds.recurring_tool_pair {
                let mut content = format!("### [{}] 작업 패턴\n", date);
                for pair in pairs.iter().take(self.top_tool_pairs) {
                    content.push_str(&format!("- {}: {}회\n", pair.label, pair.count));
                }
                suggestions.push(Suggestion {
                    section: "recent".to_string(),
                    content,
                    reason: "반복되는 도구 사용 패턴 감지".to_string(),
                    priority: 2,
                });
            }
        }

        suggestions.sort_by_key(|s| s.priority);
        tracing::info!(count = suggestions.len(), "Generated suggestions");
        suggestions
    }
}

/// Adjacent tool pairs (`A → B`) across all sequences, most frequent first.
/// Ties keep first-appearance order.
pub fn tool_pair_counts(workflows: &[Workflow]) -> Vec<Tally> {
    let mut pairs: Vec<Tally> = Vec::new();
    for workflow in workflows {
        for window in workflow.sequence.windows(2) {
            let label = format!("{} → {}", window[0], window[1]);
            match pairs.iter_mut().find(|t| t.label == label) {
                Some(tally) => tally.count += 1,
                None => pairs.push(Tally::new(label, 1)),
            }
        }
    }
    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs
}

/// Markdown report listing the suggestions for review.
pub fn render_update_report(suggestions: &[Suggestion], generated_at: DateTime<Local>) -> String {
    let mut out = String::from("# CLAUDE.md 업데이트 리포트\n\n");
    out.push_str(&format!(
        "생성 시간: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    if suggestions.is_empty() {
        out.push_str("새로운 업데이트 제안이 없습니다.\n");
        return out;
    }

    out.push_str(&format!("## 제안 사항 ({}건)\n\n", suggestions.len()));
    for (i, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!(
            "### {}. [{}] {}\n\n",
            i + 1,
            suggestion.priority_label(),
            suggestion.reason
        ));
        out.push_str(&format!("**섹션**: {}\n\n", suggestion.section));
        out.push_str("```markdown\n");
        out.push_str(&suggestion.content);
        if !suggestion.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Correction, EditPatterns};
    use chrono::TimeZone;

    fn generator() -> SuggestionGenerator {
        SuggestionGenerator::new(Thresholds::default(), &Limits::default())
            .with_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    fn correction(keyword: &str) -> Correction {
        Correction {
            keyword: keyword.to_string(),
            user_correction: format!("{} 해주세요", keyword),
            assistant_response: "응".to_string(),
        }
    }

    fn workflow(tools: &[&str]) -> Workflow {
        Workflow {
            session_id: "s".to_string(),
            sequence: tools.iter().map(|t| t.to_string()).collect(),
            length: tools.len(),
        }
    }

    #[test]
    fn test_frequent_request_suggestion() {
        let report = PatternReport {
            repeated_requests: vec![Tally::new("파일 생성", 5)],
            ..Default::default()
        };

        let suggestions = generator().generate(&report);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].priority, 2);
        assert_eq!(suggestions[0].section, "recent");
        assert!(suggestions[0].content.contains("파일 생성"));
        assert!(suggestions[0].content.contains("5회"));
        assert!(suggestions[0].content.starts_with("### [2025-03-01] 자주 하는 작업\n"));
        assert_eq!(suggestions[0].reason, "'파일 생성' 작업 5회 반복");
    }

    #[test]
    fn test_tone_reason_counts_only_tone_corrections() {
        let report = PatternReport {
            corrections: vec![
                correction("아니"),
                correction("잘못"),
                correction("다시"),
                correction("반말"),
            ],
            ..Default::default()
        };

        let suggestions = generator().generate(&report);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].reason, "말투 관련 교정 1회 감지");
    }

    #[test]
    fn test_below_thresholds_yields_nothing() {
        let report = PatternReport {
            corrections: vec![correction("반말")],
            repeated_requests: vec![Tally::new("검색", 4)],
            edit_patterns: EditPatterns {
                total_edits: 9,
                by_extension: vec![Tally::new("rs", 9)],
                recent_edits: vec![],
            },
            workflows: vec![workflow(&["Read", "Edit", "Read", "Edit"])],
        };
        assert!(generator().generate(&report).is_empty());
        assert!(generator().generate(&PatternReport::default()).is_empty());
    }

    #[test]
    fn test_all_rules_sorted_by_priority() {
        let report = PatternReport {
            corrections: vec![correction("아니"), correction("too formal")],
            repeated_requests: vec![Tally::new("테스트", 7), Tally::new("커밋", 2)],
            edit_patterns: EditPatterns {
                total_edits: 17,
                by_extension: vec![Tally::new("ts", 11), Tally::new("py", 6)],
                recent_edits: vec![],
            },
            workflows: vec![
                workflow(&["Read", "Edit", "Bash", "Read", "Edit"]),
                workflow(&["Read", "Edit", "Grep"]),
            ],
        };

        let suggestions = generator().generate(&report);
        let priorities: Vec<u8> = suggestions.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![1, 2, 2, 3]);

        assert_eq!(suggestions[0].section, "permanent");
        assert_eq!(suggestions[0].reason, "말투 관련 교정 1회 감지");
        // Request rule is evaluated before the tool-pair rule
        assert!(suggestions[1].content.contains("테스트 (7회)"));
        assert_eq!(
            suggestions[2].content,
            "### [2025-03-01] 작업 패턴\n- Read → Edit: 3회\n- Edit → Bash: 1회\n- Bash → Read: 1회\n"
        );
        assert!(suggestions[3].content.contains(".ts 파일 작업 빈도 높음 (11회)"));
        assert_eq!(suggestions[3].reason, ".ts 파일 편집 11회");
    }

    #[test]
    fn test_render_update_report() {
        let at = Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();

        let empty = render_update_report(&[], at);
        assert!(empty.starts_with("# CLAUDE.md 업데이트 리포트\n"));
        assert!(empty.contains("생성 시간: 2025-03-01 09:30:00"));
        assert!(empty.contains("새로운 업데이트 제안이 없습니다."));

        let suggestion = Suggestion {
            section: "recent".to_string(),
            content: "### 블록\n- 항목\n".to_string(),
            reason: "이유".to_string(),
            priority: 3,
        };
        let report = render_update_report(&[suggestion], at);
        assert!(report.contains("## 제안 사항 (1건)"));
        assert!(report.contains("### 1. [낮음] 이유"));
        assert!(report.contains("**섹션**: recent"));
        assert!(report.contains("```markdown\n### 블록\n- 항목\n```"));
    }
}
