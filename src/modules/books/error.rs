use bookshelf_http::error::AppError;
use thiserror::Error;

/// Failures raised by the book store and service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("name is required")]
    MissingName,

    #[error("readPage {read_page} exceeds pageCount {page_count}")]
    PageOverflow { read_page: u32, page_count: u32 },

    #[error("no book with id '{0}'")]
    NotFound(String),

    #[error("id '{0}' is already taken")]
    DuplicateId(String),

    #[error("book '{0}' is not visible after insert")]
    InsertNotVisible(String),

    #[error("book store lock is poisoned")]
    StoreUnavailable,
}

/// The endpoint a failure surfaced from; selects the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Get,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Get => "fetch",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl BookError {
    /// Translate into an HTTP error carrying the message for `action`.
    pub fn into_app_error(self, action: Action) -> AppError {
        let verb = action.verb();
        match self {
            BookError::MissingName => AppError::validation(format!(
                "Failed to {verb} book. Please provide the book name"
            )),
            BookError::PageOverflow { .. } => AppError::validation(format!(
                "Failed to {verb} book. readPage must not be greater than pageCount"
            )),
            BookError::NotFound(_) if action == Action::Get => AppError::not_found("Book not found"),
            BookError::NotFound(_) => {
                AppError::not_found(format!("Failed to {verb} book. Id not found"))
            }
            cause @ (BookError::DuplicateId(_)
            | BookError::InsertNotVisible(_)
            | BookError::StoreUnavailable) => {
                AppError::internal(format!("Failed to {verb} book"), cause)
            }
        }
    }
}
