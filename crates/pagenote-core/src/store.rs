use crate::{Clock, Error, IdGenerator, Note, NotesByPage, Storage, SystemClock, TimestampIds};

/// Storage key the whole note mapping is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "page_notes";

/// Per-page notes persisted as one JSON blob.
///
/// Nothing is cached between calls: every operation re-reads the blob,
/// applies its change and writes the whole mapping back. Sequential calls
/// therefore never lose each other's updates. Two tabs writing the same key
/// concurrently still race, and the last write wins.
pub struct NoteStore<S: Storage> {
    storage: S,
    key: String,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl<S: Storage> NoteStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            ids: Box::new(TimestampIds::new()),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Every page's notes.
    ///
    /// A missing blob, a failed read, or a blob that doesn't decode to a
    /// mapping of note lists all yield an empty mapping.
    pub fn get_all(&self) -> NotesByPage {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return NotesByPage::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "failed to read notes: {}", e);
                return NotesByPage::new();
            }
        };

        match decode(&raw) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!(key = %self.key, "ignoring malformed notes blob: {}", e);
                NotesByPage::new()
            }
        }
    }

    /// Notes for one page in creation order; empty if the page has none.
    pub fn get_for_page(&self, page: &str) -> Vec<Note> {
        self.get_all().remove(page).unwrap_or_default()
    }

    /// Append a new note to `page` and persist.
    ///
    /// `content` is stored as given; trimming and rejecting empty input is
    /// the caller's job (see [`crate::validate_content`]).
    pub fn create(&self, page: &str, content: &str) -> Result<Note, Error> {
        let mut all = self.get_all();
        let notes = all.entry(page.to_string()).or_default();

        let now = self.clock.now();
        let id = unique_id(notes, self.ids.next_id(now));
        let note = Note::new(id, content, now);
        notes.push(note.clone());

        self.persist(&all)?;
        tracing::debug!(page, id = %note.id, "created note");
        Ok(note)
    }

    /// Replace a note's content and stamp its edit time.
    ///
    /// Returns `false` without writing anything if `page` has no note with
    /// that id.
    pub fn update(&self, page: &str, note_id: &str, content: &str) -> Result<bool, Error> {
        let mut all = self.get_all();
        let Some(note) = all
            .get_mut(page)
            .and_then(|notes| notes.iter_mut().find(|n| n.id == note_id))
        else {
            return Ok(false);
        };

        note.content = content.to_string();
        note.updated_at = Some(crate::timestamp(self.clock.now()));

        self.persist(&all)?;
        tracing::debug!(page, id = note_id, "updated note");
        Ok(true)
    }

    /// Remove a note. Returns `false` without writing anything if `page` has
    /// no note with that id.
    ///
    /// A page whose last note is removed is dropped from the mapping.
    pub fn delete(&self, page: &str, note_id: &str) -> Result<bool, Error> {
        let mut all = self.get_all();
        let Some(notes) = all.get_mut(page) else {
            return Ok(false);
        };

        let before = notes.len();
        notes.retain(|n| n.id != note_id);
        if notes.len() == before {
            return Ok(false);
        }
        if notes.is_empty() {
            all.remove(page);
        }

        self.persist(&all)?;
        tracing::debug!(page, id = note_id, "deleted note");
        Ok(true)
    }

    fn persist(&self, all: &NotesByPage) -> Result<(), Error> {
        let blob = encode(all)?;
        self.storage.set(&self.key, &blob)
    }
}

/// Decode a persisted blob.
pub fn decode(raw: &str) -> Result<NotesByPage, Error> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode the mapping as the compact JSON blob that gets persisted.
pub fn encode(all: &NotesByPage) -> Result<String, Error> {
    Ok(serde_json::to_string(all)?)
}

/// `candidate`, or `candidate-N` for the smallest N that is free on the page.
fn unique_id(notes: &[Note], candidate: String) -> String {
    let taken = |id: &str| notes.iter().any(|n| n.id == id);
    if !taken(&candidate) {
        return candidate;
    }
    let mut n = 1;
    loop {
        let id = format!("{}-{}", candidate, n);
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}
