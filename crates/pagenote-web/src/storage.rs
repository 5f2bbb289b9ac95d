use pagenote_core::{Error, Storage};
use wasm_bindgen::JsValue;
use web_sys::Window;

/// [`Storage`] over the browser's `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open(window: &Window) -> Result<Self, Error> {
        let inner = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| Error::Unavailable("window.localStorage".into()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get_item(key).map_err(storage_error)
    }

    /// Fails when the quota is exceeded or storage is disabled.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.inner.set_item(key, value).map_err(storage_error)
    }
}

fn storage_error(e: JsValue) -> Error {
    Error::Storage(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}
