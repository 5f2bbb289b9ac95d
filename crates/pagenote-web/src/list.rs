//! The "view all notes" popup.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Date;
use pagenote_core::{
    CommitOutcome, NoteListPresenter, NoteListView, NoteRow, Position, WindowOptions,
};
use wasm_bindgen::JsValue;
use web_sys::{Document, Event, HtmlElement};

use crate::dom;
use crate::editor::open_editor;
use crate::overlay::Overlay;
use crate::popup::Popup;
use crate::storage::LocalStorage;

type Presenter = NoteListPresenter<LocalStorage>;

/// DOM elements of one rendered note.
struct RowElements {
    id: String,
    item: HtmlElement,
    content: HtmlElement,
    edit: HtmlElement,
    delete: HtmlElement,
}

/// The notes list as a DOM subtree.
struct DomNoteList {
    document: Document,
    container: HtmlElement,
    rows: RefCell<Vec<RowElements>>,
}

impl DomNoteList {
    fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            container: dom::element(document, "div", Some("notes-list-container"))?,
            rows: RefCell::new(Vec::new()),
        })
    }

    fn build_row(&self, row: &NoteRow) -> Result<RowElements, JsValue> {
        let document = &self.document;

        let item = dom::element(document, "div", Some("note-item"))?;
        dom::style(
            &item,
            &[
                ("margin-bottom", "15px"),
                ("padding", "10px"),
                ("background-color", "#f9f9f9"),
                ("border-radius", "4px"),
                ("border", "1px solid #eee"),
            ],
        )?;

        let content = dom::element(document, "div", Some("note-content"))?;
        content.set_text_content(Some(&row.content));
        dom::style(&content, &[("margin-bottom", "8px"), ("white-space", "pre-wrap")])?;

        let time = dom::element(document, "div", Some("note-time"))?;
        time.set_text_content(Some(&row.created_label));
        dom::style(&time, &[("font-size", "0.8em"), ("color", "#888")])?;

        let actions = dom::element(document, "div", Some("note-actions"))?;
        dom::style(
            &actions,
            &[
                ("margin-top", "8px"),
                ("display", "flex"),
                ("justify-content", "flex-end"),
                ("gap", "8px"),
            ],
        )?;

        let edit = dom::button(document, "Edit", Some("note-edit-button"), dom::BLUE)?;
        let delete = dom::button(document, "Delete", Some("note-delete-button"), dom::RED)?;
        for button in [&edit, &delete] {
            dom::style(button, &[("padding", "3px 8px"), ("font-size", "0.8em")])?;
        }

        actions.append_child(&edit)?;
        actions.append_child(&delete)?;
        item.append_child(&content)?;
        item.append_child(&time)?;
        item.append_child(&actions)?;

        Ok(RowElements {
            id: row.id.clone(),
            item,
            content,
            edit,
            delete,
        })
    }

    fn try_show_empty(&self, message: &str) -> Result<(), JsValue> {
        let empty = dom::element(&self.document, "p", Some("notes-empty"))?;
        empty.set_text_content(Some(message));
        dom::style(
            &empty,
            &[("color", "#666"), ("text-align", "center"), ("padding", "20px 0")],
        )?;
        self.container.append_child(&empty)?;
        Ok(())
    }
}

impl NoteListView for DomNoteList {
    fn show_empty(&self, message: &str) {
        if let Err(e) = self.try_show_empty(message) {
            tracing::warn!("failed to show empty notes message: {:?}", e);
        }
    }

    fn push_row(&self, row: &NoteRow) {
        let appended = self
            .build_row(row)
            .and_then(|elements| {
                self.container.append_child(&elements.item)?;
                Ok(elements)
            });
        match appended {
            Ok(elements) => self.rows.borrow_mut().push(elements),
            Err(e) => tracing::warn!(id = %row.id, "failed to render note: {:?}", e),
        }
    }

    fn set_row_content(&self, note_id: &str, content: &str) {
        if let Some(row) = self.rows.borrow().iter().find(|r| r.id == note_id) {
            row.content.set_text_content(Some(content));
        }
    }

    fn remove_row(&self, note_id: &str) -> bool {
        let mut rows = self.rows.borrow_mut();
        match rows.iter().position(|r| r.id == note_id) {
            Some(index) => {
                rows.remove(index).item.remove();
                true
            }
            None => false,
        }
    }
}

/// Browser-locale date and time, e.g. `3/1/2024 9:30:00 AM`.
fn locale_label(raw: &str) -> String {
    let date = Date::new(&JsValue::from_str(raw));
    if date.get_time().is_nan() {
        return raw.to_string();
    }
    let day: String = date.to_locale_date_string("default", &JsValue::UNDEFINED).into();
    let time: String = date.to_locale_time_string("default").into();
    format!("{} {}", day, time)
}

/// Open the list of the current page's notes at `at`.
pub fn show_all_notes(overlay: &Rc<Overlay>, at: Position) -> Result<(), JsValue> {
    let document = &overlay.document;
    let presenter = Rc::new(
        NoteListPresenter::new(overlay.store.clone(), overlay.page_id()).with_date_format(locale_label),
    );
    let view = Rc::new(DomNoteList::new(document)?);
    let count = presenter.render(&*view);
    tracing::debug!(page = presenter.page(), count, "showing notes");

    let add = dom::button(document, "+ Add note", Some("note-add-button"), dom::GREEN)?;
    dom::style(&add, &[("width", "100%"), ("padding", "8px"), ("margin-top", "10px")])?;

    let container = dom::element(document, "div", None)?;
    container.append_child(&view.container)?;
    container.append_child(&add)?;

    let popup = overlay.popups.open(&WindowOptions::notes_list(at), &container)?;

    for row in view.rows.borrow().iter() {
        let id = row.id.clone();
        let on_edit = {
            let (overlay, presenter, view) = (overlay.clone(), presenter.clone(), view.clone());
            move |_: Event| {
                if let Err(e) = open_edit(&overlay, &presenter, &view, &id, at) {
                    tracing::error!("failed to open note editor: {:?}", e);
                }
            }
        };
        popup.listen(&row.edit, "click", on_edit)?;

        let id = row.id.clone();
        let on_delete = {
            let (overlay, presenter, view) = (overlay.clone(), presenter.clone(), view.clone());
            move |_: Event| {
                if let Err(e) = confirm_delete(&overlay, &presenter, &view, &id, at) {
                    tracing::error!("failed to open delete confirmation: {:?}", e);
                }
            }
        };
        popup.listen(&row.delete, "click", on_delete)?;
    }

    let on_add = {
        let (overlay, list_popup) = (overlay.clone(), popup.clone());
        move |_: Event| {
            list_popup.close();
            if let Err(e) = open_editor(&overlay, at) {
                tracing::error!("failed to open note editor: {:?}", e);
            }
        }
    };
    popup.listen(&add, "click", on_add)?;

    Ok(())
}

/// Editor for an existing note, pre-filled with its stored text.
fn open_edit(
    overlay: &Rc<Overlay>,
    presenter: &Rc<Presenter>,
    view: &Rc<DomNoteList>,
    note_id: &str,
    at: Position,
) -> Result<(), JsValue> {
    let document = &overlay.document;
    let current = presenter.current_content(note_id);

    let textarea = dom::textarea(document, "Type your note here...", current.as_deref())?;
    let update = dom::button(document, "Update note", Some("note-update-button"), dom::GREEN)?;
    dom::style(&update, &[("margin-top", "10px")])?;

    let container = dom::element(document, "div", None)?;
    container.append_child(&textarea)?;
    container.append_child(&update)?;

    let popup = overlay.popups.open(&WindowOptions::edit(at), &container)?;

    let on_update = {
        let (presenter, view, popup) = (presenter.clone(), view.clone(), popup.clone());
        let (textarea, note_id) = (textarea.clone(), note_id.to_string());
        move |_: Event| match presenter.commit_edit(&*view, &note_id, &textarea.value()) {
            Ok(CommitOutcome::Committed(_)) => popup.close(),
            Ok(CommitOutcome::Rejected) => dom::flag_empty(&textarea),
            Err(e) => tracing::error!(id = %note_id, "failed to update note: {}", e),
        }
    };
    popup.listen(&update, "click", on_update)?;

    dom::focus_later(&textarea, overlay.config.focus_delay_ms);
    Ok(())
}

/// Ask before deleting a note.
fn confirm_delete(
    overlay: &Rc<Overlay>,
    presenter: &Rc<Presenter>,
    view: &Rc<DomNoteList>,
    note_id: &str,
    at: Position,
) -> Result<(), JsValue> {
    let document = &overlay.document;

    let message = dom::element(document, "div", None)?;
    message.set_text_content(Some("Delete this note?"));
    dom::style(&message, &[("margin-bottom", "15px")])?;

    let cancel = dom::button(document, "Cancel", None, dom::GREY)?;
    let confirm = dom::button(document, "Delete", None, dom::RED)?;
    let buttons = dom::element(document, "div", None)?;
    dom::style(&buttons, &[("display", "flex"), ("justify-content", "space-between")])?;
    buttons.append_child(&cancel)?;
    buttons.append_child(&confirm)?;

    let container = dom::element(document, "div", None)?;
    container.append_child(&message)?;
    container.append_child(&buttons)?;

    let popup: Rc<Popup> = overlay.popups.open(&WindowOptions::confirm_delete(at), &container)?;

    let on_confirm = {
        let (presenter, view, popup) = (presenter.clone(), view.clone(), popup.clone());
        let note_id = note_id.to_string();
        move |_: Event| {
            if let Err(e) = presenter.confirm_delete(&*view, &note_id) {
                tracing::error!(id = %note_id, "failed to delete note: {}", e);
            }
            popup.close();
        }
    };
    popup.listen(&confirm, "click", on_confirm)?;

    let on_cancel = {
        let popup = popup.clone();
        move |_: Event| popup.close()
    };
    popup.listen(&cancel, "click", on_cancel)?;

    Ok(())
}
