//! Options handed to the host's floating-window service.
//!
//! The service itself (dragging, resizing, dismissal) lives outside this
//! crate; these types only describe what to ask it for.

use std::fmt;

/// Viewport coordinates of a pointer event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A window size bound: absolute pixels or a share of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Px(u32),
    Percent(u8),
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Px(px) => write!(f, "{}px", px),
            Extent::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub position: Position,
    pub min_width: Option<Extent>,
    pub max_width: Option<Extent>,
    pub min_height: Option<Extent>,
    pub max_height: Option<Extent>,
    pub close_on_click_outside: bool,
    pub close_on_esc: bool,
    pub class_name: Option<String>,
}

impl WindowOptions {
    pub fn new(title: impl Into<String>, position: Position) -> Self {
        Self {
            title: title.into(),
            position,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            close_on_click_outside: true,
            close_on_esc: true,
            class_name: None,
        }
    }

    /// Editor for a new note. Outside clicks don't close it, so a stray
    /// click can't throw away what was typed.
    pub fn editor(position: Position) -> Self {
        Self {
            min_width: Some(Extent::Px(300)),
            max_width: Some(Extent::Percent(30)),
            max_height: Some(Extent::Percent(50)),
            close_on_click_outside: false,
            class_name: Some("note-editor resizable".to_string()),
            ..Self::new("Note", position)
        }
    }

    /// Editor for an existing note.
    pub fn edit(position: Position) -> Self {
        Self {
            title: "Edit note".to_string(),
            ..Self::editor(position)
        }
    }

    /// The list of the page's notes.
    pub fn notes_list(position: Position) -> Self {
        Self {
            min_width: Some(Extent::Px(350)),
            max_width: Some(Extent::Percent(40)),
            max_height: Some(Extent::Percent(60)),
            class_name: Some("notes-list resizable".to_string()),
            ..Self::new("Page notes", position)
        }
    }

    pub fn confirm_delete(position: Position) -> Self {
        Self {
            min_width: Some(Extent::Px(250)),
            close_on_click_outside: false,
            class_name: Some("note-confirm".to_string()),
            ..Self::new("Delete note", position)
        }
    }

    /// Transient confirmation shown after a note is saved.
    pub fn saved(position: Position) -> Self {
        Self {
            min_width: Some(Extent::Px(200)),
            ..Self::new("Saved", position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_css() {
        assert_eq!(Extent::Px(300).to_string(), "300px");
        assert_eq!(Extent::Percent(30).to_string(), "30%");
    }

    #[test]
    fn test_editors_ignore_outside_clicks() {
        let at = Position::new(10, 20);
        for options in [
            WindowOptions::editor(at),
            WindowOptions::edit(at),
            WindowOptions::confirm_delete(at),
        ] {
            assert!(!options.close_on_click_outside, "{}", options.title);
            assert!(options.close_on_esc);
            assert_eq!(options.position, at);
        }
    }

    #[test]
    fn test_list_and_saved_close_on_outside_click() {
        let at = Position::new(0, 0);
        assert!(WindowOptions::notes_list(at).close_on_click_outside);
        assert!(WindowOptions::saved(at).close_on_click_outside);
    }

    #[test]
    fn test_edit_shares_editor_geometry() {
        let at = Position::new(5, 5);
        let editor = WindowOptions::editor(at);
        let edit = WindowOptions::edit(at);
        assert_eq!(edit.title, "Edit note");
        assert_eq!(edit.min_width, editor.min_width);
        assert_eq!(edit.max_height, editor.max_height);
        assert_eq!(edit.class_name, editor.class_name);
    }
}
