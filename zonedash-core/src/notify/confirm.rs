//! Single-slot confirmation dialog for destructive actions.

/// Visual tone of the confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Danger,
    Neutral,
}

/// What the dialog shows, plus the action to run on confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest<A> {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub tone: Tone,
    pub action: A,
}

impl<A> ConfirmRequest<A> {
    pub fn new(title: impl Into<String>, message: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            tone: Tone::default(),
            action,
        }
    }

    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// At most one open confirmation. Opening another replaces it; dialogs never stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog<A> {
    slot: Option<ConfirmRequest<A>>,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `request`, returning whatever it replaced.
    pub fn open(&mut self, request: ConfirmRequest<A>) -> Option<ConfirmRequest<A>> {
        self.slot.replace(request)
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    pub fn current(&self) -> Option<&ConfirmRequest<A>> {
        self.slot.as_ref()
    }

    /// Close and hand back the action for the caller to run.
    pub fn confirm(&mut self) -> Option<A> {
        self.slot.take().map(|req| req.action)
    }

    /// Close without running anything. Returns whether a dialog was open.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }
}
