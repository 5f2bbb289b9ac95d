use std::rc::Rc;

use crate::{
    format_created_at, validate_content, CommitOutcome, Error, Note, NoteStore, PageId, Storage,
};

/// Placeholder shown in place of rows when a page has no notes.
pub const EMPTY_LIST_MESSAGE: &str = "No notes saved for this page";

/// What one row of the notes list displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: String,
    /// Note text, line breaks intact.
    pub content: String,
    pub created_label: String,
}

/// A rendered notes list the presenter can mutate in place.
///
/// Methods take `&self`: implementations are handles onto a shared,
/// interior-mutable surface such as a DOM subtree.
pub trait NoteListView {
    /// Show the empty-state placeholder.
    fn show_empty(&self, message: &str);

    /// Append a row after any existing rows.
    fn push_row(&self, row: &NoteRow);

    /// Replace the displayed text of the row for `note_id`.
    fn set_row_content(&self, note_id: &str, content: &str);

    /// Remove the row for `note_id`. Returns `false` if it wasn't shown.
    fn remove_row(&self, note_id: &str) -> bool;
}

/// Binds one page's notes to a [`NoteListView`].
///
/// After [`render`](Self::render), edits and deletes patch the view
/// incrementally instead of re-rendering. The view always ends up showing
/// what a fresh render from the store would.
pub struct NoteListPresenter<S: Storage> {
    store: Rc<NoteStore<S>>,
    page: PageId,
    format_date: fn(&str) -> String,
}

impl<S: Storage> NoteListPresenter<S> {
    pub fn new(store: Rc<NoteStore<S>>, page: impl Into<PageId>) -> Self {
        Self {
            store,
            page: page.into(),
            format_date: format_created_at,
        }
    }

    /// Use a different formatter for row dates, e.g. the browser's locale.
    pub fn with_date_format(mut self, format_date: fn(&str) -> String) -> Self {
        self.format_date = format_date;
        self
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    fn row(&self, note: &Note) -> NoteRow {
        NoteRow {
            id: note.id.clone(),
            content: note.content.clone(),
            created_label: (self.format_date)(&note.created_at),
        }
    }

    /// Rows for the page's notes, in creation order.
    pub fn rows(&self) -> Vec<NoteRow> {
        self.store
            .get_for_page(&self.page)
            .iter()
            .map(|note| self.row(note))
            .collect()
    }

    /// Render the page's notes into an empty view. Returns the row count.
    pub fn render(&self, view: &impl NoteListView) -> usize {
        let rows = self.rows();
        if rows.is_empty() {
            view.show_empty(EMPTY_LIST_MESSAGE);
        }
        for row in &rows {
            view.push_row(row);
        }
        rows.len()
    }

    /// Current stored text of a note, for pre-filling its editor.
    pub fn current_content(&self, note_id: &str) -> Option<String> {
        self.store
            .get_for_page(&self.page)
            .into_iter()
            .find(|n| n.id == note_id)
            .map(|n| n.content)
    }

    /// Commit an edit of `note_id` and patch its row.
    ///
    /// If the note disappeared from the store in the meantime its row is
    /// dropped instead. Yields whether the store had the note.
    pub fn commit_edit(
        &self,
        view: &impl NoteListView,
        note_id: &str,
        input: &str,
    ) -> Result<CommitOutcome<bool>, Error> {
        let Some(content) = validate_content(input) else {
            return Ok(CommitOutcome::Rejected);
        };

        let updated = self.store.update(&self.page, note_id, content)?;
        if updated {
            view.set_row_content(note_id, content);
        } else {
            tracing::warn!(page = %self.page, id = note_id, "edited note no longer exists");
            self.remove_and_recheck(view, note_id);
        }
        Ok(CommitOutcome::Committed(updated))
    }

    /// Delete `note_id` after the user confirmed, and drop its row.
    pub fn confirm_delete(&self, view: &impl NoteListView, note_id: &str) -> Result<(), Error> {
        self.store.delete(&self.page, note_id)?;
        self.remove_and_recheck(view, note_id);
        Ok(())
    }

    /// The placeholder is only added when a row actually went away, so a
    /// second removal of the same row leaves the view alone.
    fn remove_and_recheck(&self, view: &impl NoteListView, note_id: &str) {
        if view.remove_row(note_id) && self.store.get_for_page(&self.page).is_empty() {
            view.show_empty(EMPTY_LIST_MESSAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, SequentialIds};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Records the view as a list of lines, like a very small DOM.
    #[derive(Default)]
    struct FakeView {
        items: RefCell<Vec<Item>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Item {
        Empty(String),
        Row(NoteRow),
    }

    impl FakeView {
        fn contents(&self) -> Vec<String> {
            self.items
                .borrow()
                .iter()
                .map(|item| match item {
                    Item::Empty(msg) => format!("<{}>", msg),
                    Item::Row(row) => row.content.clone(),
                })
                .collect()
        }
    }

    impl NoteListView for FakeView {
        fn show_empty(&self, message: &str) {
            self.items.borrow_mut().push(Item::Empty(message.to_string()));
        }

        fn push_row(&self, row: &NoteRow) {
            self.items.borrow_mut().push(Item::Row(row.clone()));
        }

        fn set_row_content(&self, note_id: &str, content: &str) {
            for item in self.items.borrow_mut().iter_mut() {
                if let Item::Row(row) = item {
                    if row.id == note_id {
                        row.content = content.to_string();
                    }
                }
            }
        }

        fn remove_row(&self, note_id: &str) -> bool {
            let mut items = self.items.borrow_mut();
            let before = items.len();
            items.retain(|item| !matches!(item, Item::Row(row) if row.id == note_id));
            items.len() != before
        }
    }

    fn setup() -> (Rc<MemoryStorage>, Rc<NoteStore<Rc<MemoryStorage>>>) {
        let storage = Rc::new(MemoryStorage::new());
        let store = NoteStore::new(storage.clone()).with_ids(SequentialIds::new());
        (storage, Rc::new(store))
    }

    /// What a fresh render would show right now.
    fn rerendered(store: &Rc<NoteStore<Rc<MemoryStorage>>>, page: &str) -> Vec<String> {
        let view = FakeView::default();
        NoteListPresenter::new(store.clone(), page).render(&view);
        view.contents()
    }

    #[test]
    fn test_render_empty_page() {
        let (_storage, store) = setup();
        let view = FakeView::default();

        let count = NoteListPresenter::new(store, "/x").render(&view);
        assert_eq!(count, 0);
        assert_eq!(view.contents(), vec![format!("<{}>", EMPTY_LIST_MESSAGE)]);
    }

    #[test]
    fn test_render_rows_in_order() {
        let (_storage, store) = setup();
        store.create("/x", "first").unwrap();
        store.create("/x", "second\nline").unwrap();
        store.create("/y", "other page").unwrap();

        let view = FakeView::default();
        let presenter =
            NoteListPresenter::new(store, "/x").with_date_format(|raw| format!("at {}", raw));
        assert_eq!(presenter.render(&view), 2);
        assert_eq!(view.contents(), vec!["first", "second\nline"]);

        let rows = presenter.rows();
        assert_eq!(rows[0].id, "1");
        assert!(rows[0].created_label.starts_with("at "));
    }

    #[test]
    fn test_edit_patches_row_in_place() {
        let (_storage, store) = setup();
        let first = store.create("/x", "first").unwrap();
        store.create("/x", "second").unwrap();

        let presenter = NoteListPresenter::new(store.clone(), "/x");
        let view = FakeView::default();
        presenter.render(&view);

        let outcome = presenter.commit_edit(&view, &first.id, "  first, edited ").unwrap();
        assert_eq!(outcome, CommitOutcome::Committed(true));
        assert_eq!(view.contents(), vec!["first, edited", "second"]);
        assert_eq!(view.contents(), rerendered(&store, "/x"));
        assert_eq!(presenter.current_content(&first.id).as_deref(), Some("first, edited"));
    }

    #[test]
    fn test_blank_edit_never_reaches_storage() {
        let (storage, store) = setup();
        let note = store.create("/x", "keep me").unwrap();
        let presenter = NoteListPresenter::new(store, "/x");
        let view = FakeView::default();
        presenter.render(&view);

        let calls = storage.calls();
        let outcome = presenter.commit_edit(&view, &note.id, "   \n").unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(storage.calls(), calls);
        assert_eq!(view.contents(), vec!["keep me"]);
    }

    #[test]
    fn test_edit_of_vanished_note_drops_row() {
        let (_storage, store) = setup();
        let note = store.create("/x", "gone soon").unwrap();
        let presenter = NoteListPresenter::new(store.clone(), "/x");
        let view = FakeView::default();
        presenter.render(&view);

        // Deleted elsewhere, e.g. another tab
        store.delete("/x", &note.id).unwrap();

        let outcome = presenter.commit_edit(&view, &note.id, "too late").unwrap();
        assert_eq!(outcome, CommitOutcome::Committed(false));
        assert_eq!(view.contents(), rerendered(&store, "/x"));
    }

    #[test]
    fn test_delete_until_empty() {
        let (_storage, store) = setup();
        let first = store.create("/x", "first").unwrap();
        let second = store.create("/x", "second").unwrap();
        let presenter = NoteListPresenter::new(store.clone(), "/x");
        let view = FakeView::default();
        presenter.render(&view);

        presenter.confirm_delete(&view, &first.id).unwrap();
        assert_eq!(view.contents(), vec!["second"]);
        assert_eq!(view.contents(), rerendered(&store, "/x"));

        presenter.confirm_delete(&view, &second.id).unwrap();
        assert_eq!(view.contents(), vec![format!("<{}>", EMPTY_LIST_MESSAGE)]);
        assert_eq!(view.contents(), rerendered(&store, "/x"));
    }

    #[test]
    fn test_repeated_delete_confirmation_shows_one_placeholder() {
        let (_storage, store) = setup();
        let note = store.create("/x", "only").unwrap();
        let presenter = NoteListPresenter::new(store.clone(), "/x");
        let view = FakeView::default();
        presenter.render(&view);

        // Two confirmation popups for the same row, both accepted
        presenter.confirm_delete(&view, &note.id).unwrap();
        presenter.confirm_delete(&view, &note.id).unwrap();

        assert_eq!(view.contents(), vec![format!("<{}>", EMPTY_LIST_MESSAGE)]);
        assert_eq!(view.contents(), rerendered(&store, "/x"));
    }

    #[test]
    fn test_stale_edit_after_delete_shows_one_placeholder() {
        let (_storage, store) = setup();
        let note = store.create("/x", "only").unwrap();
        let presenter = NoteListPresenter::new(store.clone(), "/x");
        let view = FakeView::default();
        presenter.render(&view);

        presenter.confirm_delete(&view, &note.id).unwrap();
        let outcome = presenter.commit_edit(&view, &note.id, "edited").unwrap();

        assert_eq!(outcome, CommitOutcome::Committed(false));
        assert_eq!(view.contents(), rerendered(&store, "/x"));
    }
}
