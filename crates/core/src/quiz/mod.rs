//! The quiz session engine: question preparation, session state and reports.

mod report;
mod session;
mod shuffle;
mod templates;

pub use report::{QuizReport, ReportItem};
pub use session::{CompletionReason, QuizSession, SessionError, SessionPhase, Submission};
pub use shuffle::{prepare_questions, shuffle_questions};
pub use templates::{TEMPLATE_COUNT, template_questions};
