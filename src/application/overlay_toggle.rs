use leptos::{ReadSignal, SignalDispose, SignalGetUntracked, SignalSet, SignalUpdate, WriteSignal, create_signal};

/// User-controlled overlay visibility: one read channel, one write channel.
///
/// Not persisted; a fresh toggle starts visible. The signal lives in the
/// reactive runtime until [`OverlayToggle::dispose`] is called; the owning
/// `ChartLifecycle` does this when dropped.
#[derive(Debug, Clone, Copy)]
pub struct OverlayToggle {
    read: ReadSignal<bool>,
    write: WriteSignal<bool>,
}

impl Default for OverlayToggle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OverlayToggle {
    pub fn new(visible: bool) -> Self {
        let (read, write) = create_signal(visible);
        Self { read, write }
    }

    pub fn reader(&self) -> ReadSignal<bool> {
        self.read
    }

    pub fn writer(&self) -> WriteSignal<bool> {
        self.write
    }

    pub fn is_visible(&self) -> bool {
        self.read.get_untracked()
    }

    pub fn set_visible(&self, visible: bool) {
        self.write.set(visible);
    }

    /// Invert the toggle and return the new state.
    pub fn flip(&self) -> bool {
        self.write.update(|visible| *visible = !*visible);
        self.is_visible()
    }

    /// Free the underlying signal. Reads through stale copies return `None`
    /// from `try_get_untracked` afterwards.
    pub fn dispose(self) {
        self.read.dispose();
    }
}
