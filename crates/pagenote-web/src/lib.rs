//! Pagenote browser overlay.
//!
//! Right-clicking plain page content offers "Add note" and "View all notes".
//! Notes are kept per page path in `localStorage` and shown through the host
//! page's floating-window service (`window.diagramRenderUtils.popupWindowUtils`).
//! Without that service the overlay stays out of the way entirely.

mod dom;
mod editor;
mod list;
mod logging;
mod menu;
mod overlay;
mod popup;
mod storage;

use std::cell::RefCell;

use pagenote_core::{Config, Disposer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub use overlay::Overlay;
pub use popup::{Popup, PopupService};
pub use storage::LocalStorage;

thread_local! {
    static INSTALLED: RefCell<Option<Disposer>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let (config, config_error) = read_config(&window);
    logging::init(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!("ignoring invalid window.pagenoteConfig: {}", e);
    }

    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || install(&window, config));
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        install(&window, config);
    }
    Ok(())
}

/// Remove the context-menu override. Open popups stay until closed.
#[wasm_bindgen]
pub fn uninstall() {
    if let Some(disposer) = INSTALLED.with(|installed| installed.borrow_mut().take()) {
        disposer.dispose();
        tracing::info!("pagenote overlay removed");
    }
}

fn install(window: &Window, config: Config) {
    let overlay = match Overlay::new(window, config) {
        Ok(overlay) => overlay,
        Err(e) => {
            tracing::error!("pagenote disabled: {}", e);
            return;
        }
    };

    match menu::install(overlay) {
        Ok(disposer) => {
            uninstall();
            INSTALLED.with(|installed| *installed.borrow_mut() = Some(disposer));
            tracing::info!("pagenote overlay installed");
        }
        Err(e) => tracing::error!("failed to install pagenote overlay: {:?}", e),
    }
}

/// Settings from an optional `window.pagenoteConfig` object. Falls back to
/// defaults, returning the reason when the object was unusable.
fn read_config(window: &Window) -> (Config, Option<String>) {
    let raw = match js_sys::Reflect::get(window, &JsValue::from_str("pagenoteConfig")) {
        Ok(raw) if !raw.is_undefined() && !raw.is_null() => raw,
        _ => return (Config::default(), None),
    };
    match serde_wasm_bindgen::from_value(raw) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    }
}
