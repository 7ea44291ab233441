mod chapter_vm;
mod contents_vm;
mod markdown_vm;
mod quiz_vm;
mod report_vm;
mod search_vm;
mod time_fmt;

pub use chapter_vm::{BookGroupVm, ChapterRowVm, SELECTABLE_TYPES, game_links, group_chapters};
pub use contents_vm::{
    ChapterContentsVm, GrammarRowVm, VocabularyRowVm, map_chapter_contents,
};
pub use markdown_vm::{plain_text_html, render_markdown, sanitize_html};
pub use quiz_vm::{FeedbackVm, OptionRowVm, OptionState, PendingSubmit, QuizMode, QuizVm};
pub use report_vm::{ReportRowVm, ReportVm, map_report};
pub use search_vm::{SearchHitVm, SearchSectionVm, map_search_results, summary_label};
pub use time_fmt::{format_elapsed, format_remaining, format_started_at};
