use study_core::quiz::QuizReport;
use study_core::scoring::ScoreTier;

use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRowVm {
    pub number: usize,
    pub prompt: String,
    pub given_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl ReportRowVm {
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        if self.is_correct { "✓" } else { "✗" }
    }

    #[must_use]
    pub const fn class(&self) -> &'static str {
        if self.is_correct {
            "report-row report-row--correct"
        } else {
            "report-row report-row--incorrect"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub score_label: String,
    pub percentage_label: String,
    pub banner: &'static str,
    pub tier_class: &'static str,
    pub time_note: Option<String>,
    pub rows: Vec<ReportRowVm>,
}

#[must_use]
pub fn map_report(report: &QuizReport) -> ReportVm {
    let tier_class = match report.tier {
        ScoreTier::Outstanding => "report-banner report-banner--outstanding",
        ScoreTier::Great => "report-banner report-banner--great",
        ScoreTier::Good => "report-banner report-banner--good",
        ScoreTier::KeepStudying => "report-banner report-banner--keep-studying",
    };
    let time_note = report.elapsed_secs.map(|secs| {
        if report.ran_out_of_time() {
            format!("Time's up! Time used: {}", format_elapsed(secs))
        } else {
            format!("Time used: {}", format_elapsed(secs))
        }
    });
    let rows = report
        .items
        .iter()
        .map(|item| ReportRowVm {
            number: item.position + 1,
            prompt: item.prompt.clone(),
            given_answer: item
                .given_answer
                .clone()
                .unwrap_or_else(|| "(no answer)".to_string()),
            correct_answer: item.correct_answer.clone(),
            is_correct: item.is_correct,
        })
        .collect();

    ReportVm {
        score_label: format!("{} / {}", report.score, report.total),
        percentage_label: report.percentage_label(),
        banner: report.banner(),
        tier_class,
        time_note,
        rows,
    }
}
