/// Undoes one handler registration.
///
/// Runs its teardown exactly once: on [`dispose`](Self::dispose) or when
/// dropped, whichever comes first.
#[must_use = "dropping a Disposer immediately undoes the registration"]
pub struct Disposer(Option<Box<dyn FnOnce()>>);

impl Disposer {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }

    /// A disposer with nothing to undo.
    pub fn noop() -> Self {
        Self(None)
    }

    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("pending", &self.0.is_some())
            .finish()
    }
}

/// Registrations torn down together, newest first.
#[derive(Debug, Default)]
pub struct Disposers(Vec<Disposer>);

impl Disposers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, disposer: Disposer) {
        self.0.push(disposer);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dispose_all(&mut self) {
        while let Some(disposer) = self.0.pop() {
            disposer.dispose();
        }
    }
}

impl Drop for Disposers {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
