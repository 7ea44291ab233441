mod chapter;
mod home;
mod quiz;
mod report;
mod search;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chapter::ChapterView;
pub use home::HomeView;
pub use quiz::QuizView;
pub use report::ReportPanel;
pub use search::SearchView;
pub use state::{ViewError, ViewState, view_state_from_resource};
