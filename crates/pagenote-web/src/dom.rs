//! Small DOM helpers: element construction, inline styles, event listeners.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use pagenote_core::{Disposer, Disposers, EMPTY_CONTENT_HINT};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, HtmlTextAreaElement};

pub const GREEN: &str = "#4CAF50";
pub const BLUE: &str = "#4a90e2";
pub const RED: &str = "#ff6b6b";
pub const GREY: &str = "#ccc";

/// Create an element, optionally with a class.
pub fn element(document: &Document, tag: &str, class: Option<&str>) -> Result<HtmlElement, JsValue> {
    let element: HtmlElement = document.create_element(tag)?.dyn_into()?;
    if let Some(class) = class {
        element.set_class_name(class);
    }
    Ok(element)
}

/// Set inline style properties.
pub fn style(element: &HtmlElement, properties: &[(&str, &str)]) -> Result<(), JsValue> {
    let css = element.style();
    for (name, value) in properties {
        css.set_property(name, value)?;
    }
    Ok(())
}

pub fn button(
    document: &Document,
    label: &str,
    class: Option<&str>,
    background: &str,
) -> Result<HtmlElement, JsValue> {
    let button = element(document, "button", class)?;
    button.set_text_content(Some(label));
    style(
        &button,
        &[
            ("padding", "5px 10px"),
            ("background-color", background),
            ("color", "white"),
            ("border", "none"),
            ("border-radius", "4px"),
            ("cursor", "pointer"),
        ],
    )?;
    Ok(button)
}

/// A multi-line text input, optionally pre-filled.
pub fn textarea(
    document: &Document,
    placeholder: &str,
    value: Option<&str>,
) -> Result<HtmlTextAreaElement, JsValue> {
    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_class_name("note-textarea");
    textarea.set_placeholder(placeholder);
    textarea.set_rows(6);
    if let Some(value) = value {
        textarea.set_value(value);
    }
    style(
        &textarea,
        &[
            ("width", "calc(100% - 1px)"),
            ("resize", "vertical"),
            ("font-family", "inherit"),
            ("padding", "8px"),
            ("border", "1px solid #ddd"),
            ("border-radius", "4px"),
            ("box-sizing", "border-box"),
        ],
    )?;
    Ok(textarea)
}

/// Mark a text area whose blank content was rejected.
pub fn flag_empty(textarea: &HtmlTextAreaElement) {
    textarea.set_placeholder(EMPTY_CONTENT_HINT);
    if let Err(e) = textarea.style().set_property("border-color", RED) {
        tracing::warn!("failed to highlight empty editor: {:?}", e);
    }
}

/// Focus an element once `delay_ms` has passed, after the popup around it
/// has mounted.
pub fn focus_later(element: &HtmlElement, delay_ms: u32) {
    let element = element.clone();
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        if let Err(e) = element.focus() {
            tracing::debug!("failed to focus editor: {:?}", e);
        }
    });
}

/// Register `handler` for `event` on `target`. The returned disposer
/// removes it again.
pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Disposer, JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;

    let target = target.clone();
    Ok(Disposer::new(move || {
        let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }))
}

/// Listeners owned by one piece of transient UI, released together when it
/// goes away.
#[derive(Clone)]
pub struct ListenerBag(Rc<RefCell<Option<Disposers>>>);

impl ListenerBag {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Some(Disposers::new()))))
    }

    /// Listen on `target` for as long as the bag is held. Listening after
    /// release is ignored.
    pub fn listen<F>(&self, target: &EventTarget, event: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        if let Some(disposers) = self.0.borrow_mut().as_mut() {
            disposers.push(listen(target, event, handler)?);
        }
        Ok(())
    }

    pub fn is_released(&self) -> bool {
        self.0.borrow().is_none()
    }

    /// Remove every listener. Usually called from inside one of them, so
    /// the closures are dropped on a later task rather than mid-call.
    pub fn release(&self) {
        let Some(disposers) = self.0.borrow_mut().take() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(0).await;
            drop(disposers);
        });
    }
}
