//! Pagenote core library - page-scoped notes, their store and the UI flows
//! driving it.
//!
//! This crate contains no I/O and can be compiled for any target. Persistence
//! goes through the [`Storage`] port and rendering through [`NoteListView`],
//! so browser, file and in-memory backends all share the same logic.

mod config;
mod dispatch;
mod disposer;
mod editor;
mod error;
mod ids;
mod note;
mod presenter;
mod storage;
mod store;
mod window;

pub use config::Config;
pub use dispatch::{ClickTarget, MenuAction, EXCLUDED_CLASSES, EXCLUDED_TAGS};
pub use disposer::{Disposer, Disposers};
pub use editor::{validate_content, CommitOutcome, NoteEditor, EMPTY_CONTENT_HINT};
pub use error::Error;
pub use ids::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, TimestampIds};
pub use note::{format_created_at, timestamp, Note, NotesByPage, PageId};
pub use presenter::{NoteListPresenter, NoteListView, NoteRow, EMPTY_LIST_MESSAGE};
pub use storage::{MemoryStorage, Storage};
pub use store::{decode, encode, NoteStore, DEFAULT_STORAGE_KEY};
pub use window::{Extent, Position, WindowOptions};
