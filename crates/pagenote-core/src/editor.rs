use std::rc::Rc;

use crate::{Error, Note, NoteStore, PageId, Storage};

/// Placeholder shown in a text area after an empty commit was rejected.
pub const EMPTY_CONTENT_HINT: &str = "Please enter some text before saving";

/// Trimmed note content, or `None` if nothing but whitespace was entered.
pub fn validate_content(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Result of committing text from an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome<T> {
    /// The text was valid and reached the store.
    Committed(T),
    /// Nothing but whitespace; the store was not touched and the editor
    /// should stay open with [`EMPTY_CONTENT_HINT`].
    Rejected,
}

impl<T> CommitOutcome<T> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CommitOutcome::Rejected)
    }
}

/// Composes new notes for one page.
pub struct NoteEditor<S: Storage> {
    store: Rc<NoteStore<S>>,
    page: PageId,
}

impl<S: Storage> NoteEditor<S> {
    pub fn new(store: Rc<NoteStore<S>>, page: impl Into<PageId>) -> Self {
        Self {
            store,
            page: page.into(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Save the editor's text as a new note on the page.
    pub fn save(&self, input: &str) -> Result<CommitOutcome<Note>, Error> {
        let Some(content) = validate_content(input) else {
            tracing::debug!(page = %self.page, "rejected empty note");
            return Ok(CommitOutcome::Rejected);
        };
        let note = self.store.create(&self.page, content)?;
        Ok(CommitOutcome::Committed(note))
    }
}
