use std::rc::Rc;

use pagenote_core::{Config, Error, NoteStore, PageId};
use web_sys::{Document, Location, Window};

use crate::popup::PopupService;
use crate::storage::LocalStorage;

/// Everything the overlay's handlers share.
pub struct Overlay {
    pub document: Document,
    pub location: Location,
    pub popups: PopupService,
    pub store: Rc<NoteStore<LocalStorage>>,
    pub config: Config,
}

impl Overlay {
    /// Check the host page provides what the overlay needs.
    ///
    /// Fails if the floating-window service or `localStorage` is missing.
    pub fn new(window: &Window, config: Config) -> Result<Rc<Self>, Error> {
        let document = window
            .document()
            .ok_or_else(|| Error::Unavailable("window.document".into()))?;
        let popups = PopupService::detect(window)?;
        let storage = LocalStorage::open(window)?;
        let store = NoteStore::new(storage).with_key(config.storage_key.clone());

        Ok(Rc::new(Self {
            document,
            location: window.location(),
            popups,
            store: Rc::new(store),
            config,
        }))
    }

    /// The page notes are filed under: the current path.
    pub fn page_id(&self) -> PageId {
        self.location.pathname().unwrap_or_else(|_| "/".to_string())
    }
}
