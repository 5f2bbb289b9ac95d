//! Deciding which right-clicks open the notes menu.

/// Elements that keep their native context menu.
pub const EXCLUDED_TAGS: &[&str] = &[
    "a", "button", "input", "textarea", "select", "img", "svg", "canvas", "video", "audio", "iframe",
];

/// Class-name fragments marking rendered diagrams and floating windows.
/// Matched as substrings, so `popup-window-header` is excluded too.
pub const EXCLUDED_CLASSES: &[&str] = &["code-rendered-diagram", "popup-window"];

/// The element a context-menu event was fired on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub tag_name: String,
    pub classes: Vec<String>,
    pub content_editable: bool,
}

impl ClickTarget {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn with_classes<I, C>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn editable(mut self) -> Self {
        self.content_editable = true;
        self
    }

    /// Whether a right-click here should replace the native menu with the
    /// notes menu. Only plain page content qualifies.
    pub fn should_intercept(&self) -> bool {
        let tag = self.tag_name.to_ascii_lowercase();
        if EXCLUDED_TAGS.contains(&tag.as_str()) {
            return false;
        }
        let excluded_class = self
            .classes
            .iter()
            .any(|class| EXCLUDED_CLASSES.iter().any(|excl| class.contains(excl)));
        !excluded_class && !self.content_editable
    }
}

/// Entries of the notes context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddNote,
    ViewAll,
}

impl MenuAction {
    /// Menu entries in display order.
    pub const ALL: [MenuAction; 2] = [MenuAction::AddNote, MenuAction::ViewAll];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddNote => "Add note",
            MenuAction::ViewAll => "View all notes",
        }
    }
}
