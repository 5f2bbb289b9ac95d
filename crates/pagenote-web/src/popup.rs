//! Binding to the host page's floating-window service,
//! `window.diagramRenderUtils.popupWindowUtils`.

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use pagenote_core::{Error, Extent, WindowOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, Window};

use crate::dom::ListenerBag;

/// The host's `popupWindowUtils` object.
#[derive(Clone)]
pub struct PopupService {
    utils: JsValue,
    create: Function,
}

impl PopupService {
    /// Look the service up on `window`.
    pub fn detect(window: &Window) -> Result<Self, Error> {
        let missing = || Error::Unavailable("window.diagramRenderUtils.popupWindowUtils".into());

        let render_utils = property(window, "diagramRenderUtils").ok_or_else(missing)?;
        let utils = property(&render_utils, "popupWindowUtils").ok_or_else(missing)?;
        let create = property(&utils, "create")
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(missing)?;

        Ok(Self { utils, create })
    }

    /// Open a floating window showing `content`.
    pub fn open(&self, options: &WindowOptions, content: &Element) -> Result<Rc<Popup>, JsValue> {
        let listeners = ListenerBag::new();

        let js_options = Object::new();
        set(&js_options, "title", &JsValue::from_str(&options.title))?;
        set(&js_options, "content", content)?;
        set(&js_options, "x", &JsValue::from(options.position.x))?;
        set(&js_options, "y", &JsValue::from(options.position.y))?;
        for (name, extent) in [
            ("minWidth", options.min_width),
            ("maxWidth", options.max_width),
            ("minHeight", options.min_height),
            ("maxHeight", options.max_height),
        ] {
            if let Some(extent) = extent {
                set(&js_options, name, &extent_value(extent))?;
            }
        }
        set(&js_options, "closeOnClickOutside", &JsValue::from_bool(options.close_on_click_outside))?;
        set(&js_options, "closeOnEsc", &JsValue::from_bool(options.close_on_esc))?;
        if let Some(class_name) = &options.class_name {
            set(&js_options, "className", &JsValue::from_str(class_name))?;
        }

        // The service calls this once when the window goes away by any route.
        let on_close = {
            let listeners = listeners.clone();
            Closure::once_into_js(move || listeners.release())
        };
        set(&js_options, "onClose", &on_close)?;

        let handle = self.create.call1(&self.utils, &js_options)?;
        tracing::debug!(title = %options.title, "opened popup");
        Ok(Rc::new(Popup { handle, listeners }))
    }
}

/// An open floating window.
pub struct Popup {
    handle: JsValue,
    listeners: ListenerBag,
}

impl Popup {
    /// Listen on an element inside the window until it closes.
    pub fn listen<F>(&self, target: &EventTarget, event: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        self.listeners.listen(target, event, handler)
    }

    pub fn close(&self) {
        let result = Reflect::get(&self.handle, &JsValue::from_str("close"))
            .and_then(|f| f.dyn_into::<Function>())
            .and_then(|close| close.call0(&self.handle));
        if let Err(e) = result {
            tracing::warn!("failed to close popup: {:?}", e);
        }
        self.listeners.release();
    }
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn set(target: &Object, name: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(name), value).map(|_| ())
}

/// Pixel bounds go over as numbers, viewport shares as CSS strings.
fn extent_value(extent: Extent) -> JsValue {
    match extent {
        Extent::Px(px) => JsValue::from(px),
        Extent::Percent(_) => JsValue::from_str(&extent.to_string()),
    }
}
