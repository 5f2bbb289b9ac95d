//! Right-click dispatcher: replaces the native context menu on plain page
//! content with "Add note" / "View all notes".

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use pagenote_core::{ClickTarget, Disposer, MenuAction, Position};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, MouseEvent, Node};

use crate::dom::{self, ListenerBag};
use crate::editor::open_editor;
use crate::list::show_all_notes;
use crate::overlay::Overlay;

/// Start intercepting context-menu events on the document.
pub fn install(overlay: Rc<Overlay>) -> Result<Disposer, JsValue> {
    let document = overlay.document.clone();
    dom::listen(&document, "contextmenu", move |event: Event| {
        let Ok(event) = event.dyn_into::<MouseEvent>() else {
            return;
        };
        if let Err(e) = on_context_menu(&overlay, &event) {
            tracing::error!("failed to show notes menu: {:?}", e);
        }
    })
}

/// Describe the element an event fired on.
fn click_target(event: &Event) -> Option<ClickTarget> {
    let element: Element = event.target()?.dyn_into().ok()?;
    let class_list = element.class_list();
    let classes = (0..class_list.length())
        .filter_map(|i| class_list.item(i))
        .collect();
    let content_editable = element
        .dyn_ref::<HtmlElement>()
        .map(|html| html.is_content_editable())
        .unwrap_or(false);

    Some(ClickTarget {
        tag_name: element.tag_name(),
        classes,
        content_editable,
    })
}

fn on_context_menu(overlay: &Rc<Overlay>, event: &MouseEvent) -> Result<(), JsValue> {
    let intercept = click_target(event).is_some_and(|target| target.should_intercept());
    if !intercept {
        return Ok(());
    }
    event.prevent_default();

    let at = Position::new(event.client_x(), event.client_y());
    ContextMenu::show(overlay, at)
}

/// One open instance of the notes menu.
struct ContextMenu {
    element: HtmlElement,
    listeners: ListenerBag,
}

impl ContextMenu {
    fn show(overlay: &Rc<Overlay>, at: Position) -> Result<(), JsValue> {
        let document = &overlay.document;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let element = dom::element(document, "div", Some("note-context-menu"))?;
        let (left, top) = (format!("{}px", at.x), format!("{}px", at.y));
        dom::style(
            &element,
            &[
                ("position", "fixed"),
                ("z-index", "10001"),
                ("background-color", "white"),
                ("box-shadow", "0 2px 10px rgba(0,0,0,0.2)"),
                ("border-radius", "4px"),
                ("padding", "5px 0"),
                ("left", left.as_str()),
                ("top", top.as_str()),
            ],
        )?;

        let menu = Rc::new(ContextMenu {
            element,
            listeners: ListenerBag::new(),
        });

        for action in MenuAction::ALL {
            let item = dom::element(document, "div", Some("note-context-menu-item"))?;
            item.set_text_content(Some(action.label()));
            dom::style(
                &item,
                &[
                    ("padding", "8px 15px"),
                    ("cursor", "pointer"),
                    ("transition", "background-color 0.2s"),
                ],
            )?;
            menu.element.append_child(&item)?;

            for (event, background) in [("mouseenter", "#f0f0f0"), ("mouseleave", "transparent")] {
                let item_ref = item.clone();
                menu.listeners.listen(&item, event, move |_: Event| {
                    let _ = item_ref.style().set_property("background-color", background);
                })?;
            }

            let on_click = {
                let (overlay, menu_ref) = (overlay.clone(), menu.clone());
                move |_: Event| {
                    menu_ref.dismiss();
                    if let Err(e) = run(&overlay, action, at) {
                        tracing::error!(?action, "failed to run menu action: {:?}", e);
                    }
                }
            };
            menu.listeners.listen(&item, "click", on_click)?;
        }

        body.append_child(&menu.element)?;
        arm_outside_dismissal(&menu, overlay);
        Ok(())
    }

    fn dismiss(&self) {
        self.element.remove();
        self.listeners.release();
    }
}

/// After a short delay, close the menu on any pointer-down outside it.
/// Arming immediately would let the opening click close it again.
fn arm_outside_dismissal(menu: &Rc<ContextMenu>, overlay: &Rc<Overlay>) {
    let menu = menu.clone();
    let document = overlay.document.clone();
    let delay = overlay.config.menu_arm_delay_ms;

    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(delay).await;
        if menu.listeners.is_released() {
            return;
        }
        let menu_ref = menu.clone();
        let armed = menu.listeners.listen(&document, "mousedown", move |event: Event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            if !menu_ref.element.contains(target.as_ref()) {
                menu_ref.dismiss();
            }
        });
        if let Err(e) = armed {
            tracing::warn!("failed to arm menu dismissal: {:?}", e);
        }
    });
}

fn run(overlay: &Rc<Overlay>, action: MenuAction, at: Position) -> Result<(), JsValue> {
    match action {
        MenuAction::AddNote => open_editor(overlay, at),
        MenuAction::ViewAll => show_all_notes(overlay, at),
    }
}
