use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    ChaptersUnavailable,
    ChapterNotFound,
    ContentsUnavailable,
    LoadFailed,
    SubmitFailed,
    ExportFailed,
}

impl ViewError {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::ChaptersUnavailable => "Could not load chapters from the study server.",
            Self::ChapterNotFound => "This chapter does not exist.",
            Self::ContentsUnavailable => "Could not load this chapter's vocabulary and grammar.",
            Self::LoadFailed => "Could not load questions for this chapter.",
            Self::SubmitFailed => "Could not check your answer. Please try again.",
            Self::ExportFailed => "Could not save the results file.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
