use std::rc::Rc;

use pagenote_core::{CommitOutcome, NoteEditor, Position, WindowOptions};
use wasm_bindgen::JsValue;

use crate::dom;
use crate::overlay::Overlay;

/// Open the editor for a new note at `at`.
pub fn open_editor(overlay: &Rc<Overlay>, at: Position) -> Result<(), JsValue> {
    let document = &overlay.document;

    let textarea = dom::textarea(document, "Type your note here...", None)?;
    let save = dom::button(document, "Save note", Some("note-save-button"), dom::GREEN)?;
    dom::style(&save, &[("margin-top", "10px")])?;

    let container = dom::element(document, "div", None)?;
    container.append_child(&textarea)?;
    container.append_child(&save)?;

    let popup = overlay.popups.open(&WindowOptions::editor(at), &container)?;
    let editor = NoteEditor::new(overlay.store.clone(), overlay.page_id());

    let on_save = {
        let overlay = overlay.clone();
        let popup = popup.clone();
        let textarea = textarea.clone();
        move |_: web_sys::Event| match editor.save(&textarea.value()) {
            Ok(CommitOutcome::Committed(note)) => {
                tracing::info!(page = editor.page(), id = %note.id, "saved note");
                popup.close();
                if let Err(e) = show_saved(&overlay, at) {
                    tracing::warn!("failed to show save confirmation: {:?}", e);
                }
            }
            Ok(CommitOutcome::Rejected) => dom::flag_empty(&textarea),
            Err(e) => tracing::error!("failed to save note: {}", e),
        }
    };
    popup.listen(&save, "click", on_save)?;

    dom::focus_later(&textarea, overlay.config.focus_delay_ms);
    Ok(())
}

/// Brief confirmation after a note was saved.
fn show_saved(overlay: &Overlay, at: Position) -> Result<(), JsValue> {
    let message = dom::element(&overlay.document, "div", None)?;
    message.set_text_content(Some("Note saved!"));
    dom::style(&message, &[("padding", "10px"), ("color", dom::GREEN)])?;

    overlay.popups.open(&WindowOptions::saved(at), &message)?;
    Ok(())
}
