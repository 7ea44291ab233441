use super::session::CompletionReason;
use crate::scoring::{self, ScoreTier};

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    /// 0-based presentation position.
    pub position: usize,
    pub prompt: String,
    /// Display text of the learner's answer, if any.
    pub given_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Summary of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ScoreTier,
    pub items: Vec<ReportItem>,
    /// `None` while the session is still running.
    pub completion: Option<CompletionReason>,
    /// Seconds used, for timed games.
    pub elapsed_secs: Option<u32>,
}

impl QuizReport {
    #[must_use]
    pub fn new(
        items: Vec<ReportItem>,
        completion: Option<CompletionReason>,
        elapsed_secs: Option<u32>,
    ) -> Self {
        let score = items.iter().filter(|item| item.is_correct).count();
        let total = items.len();
        let percentage = scoring::percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: ScoreTier::from_percentage(percentage),
            items,
            completion,
            elapsed_secs,
        }
    }

    #[must_use]
    pub fn percentage_label(&self) -> String {
        scoring::format_percentage(self.percentage)
    }

    #[must_use]
    pub fn banner(&self) -> &'static str {
        self.tier.message()
    }

    #[must_use]
    pub fn ran_out_of_time(&self) -> bool {
        self.completion == Some(CompletionReason::TimeUp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(position: usize, is_correct: bool) -> ReportItem {
        ReportItem {
            position,
            prompt: format!("q{position}"),
            given_answer: Some("x".into()),
            correct_answer: "y".into(),
            is_correct,
        }
    }

    #[test]
    fn report_derives_score_and_tier() {
        let items = vec![item(0, true), item(1, true), item(2, false)];
        let report = QuizReport::new(items, Some(CompletionReason::AllAnswered), None);
        assert_eq!(report.score, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.percentage_label(), "67%");
        assert_eq!(report.tier, ScoreTier::Good);
        assert!(!report.ran_out_of_time());
    }

    #[test]
    fn empty_report_is_zero_percent() {
        let report = QuizReport::new(Vec::new(), Some(CompletionReason::TimeUp), Some(60));
        assert_eq!(report.percentage, 0);
        assert_eq!(report.banner(), "Keep studying! You'll improve! 💪");
        assert!(report.ran_out_of_time());
    }
}
