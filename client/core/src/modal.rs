//! Modal Dialogs
//!
//! A single confirm/cancel dialog slot. The confirm "handler" is a plain value
//! of the caller's action type: opening stores it, confirming hands it back
//! exactly once, cancelling drops it. Re-opening replaces whatever was there,
//! so at most one action is ever pending.

use std::fmt;

/// Visual weight of the confirm button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfirmStyle {
    /// Destructive action
    #[default]
    Danger,
    /// Ordinary acknowledgement
    Primary,
}

impl ConfirmStyle {
    /// CSS-style class name for surfaces that need one
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Danger => "btn-danger",
            Self::Primary => "btn-primary",
        }
    }
}

/// What to show, and what to hand back on confirm
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalRequest<A> {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub body: String,
    /// Confirm button label
    pub confirm_label: String,
    /// Confirm button style
    pub confirm_style: ConfirmStyle,
    /// Returned by [`ModalService::confirm`]
    pub on_confirm: A,
}

impl<A> ModalRequest<A> {
    /// Request with the default label (`"Confirm"`) and danger style
    pub fn new(title: impl Into<String>, body: impl Into<String>, on_confirm: A) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            confirm_label: "Confirm".to_string(),
            confirm_style: ConfirmStyle::Danger,
            on_confirm,
        }
    }

    /// Override the confirm label
    #[must_use]
    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Override the confirm style
    #[must_use]
    pub fn confirm_style(mut self, style: ConfirmStyle) -> Self {
        self.confirm_style = style;
        self
    }
}

/// What a surface draws for the open dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalView {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub body: String,
    /// Confirm button label
    pub confirm_label: String,
    /// Confirm button style
    pub confirm_style: ConfirmStyle,
}

impl fmt::Display for ModalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.title)?;
        writeln!(f, "{}", self.body)?;
        write!(f, "<{}> <Cancel>", self.confirm_label)
    }
}

/// The dialog slot
#[derive(Debug)]
pub struct ModalService<A> {
    open: Option<ModalRequest<A>>,
}

impl<A> Default for ModalService<A> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<A> ModalService<A> {
    /// Closed dialog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a dialog, replacing any open one
    pub fn open(&mut self, request: ModalRequest<A>) {
        if let Some(ref previous) = self.open {
            tracing::debug!(title = %previous.title, "Replacing open dialog");
        }
        tracing::debug!(title = %request.title, "Dialog opened");
        self.open = Some(request);
    }

    /// Confirm: close the dialog and return its action
    ///
    /// Returns `None` when nothing is open, so a second confirm never fires.
    pub fn confirm(&mut self) -> Option<A> {
        self.open.take().map(|request| request.on_confirm)
    }

    /// Cancel: close the dialog, dropping its action
    pub fn cancel(&mut self) {
        if self.open.take().is_some() {
            tracing::debug!("Dialog cancelled");
        }
    }

    /// Whether a dialog is showing
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Drawable description of the open dialog
    #[must_use]
    pub fn view(&self) -> Option<ModalView> {
        self.open.as_ref().map(|request| ModalView {
            title: request.title.clone(),
            body: request.body.clone(),
            confirm_label: request.confirm_label.clone(),
            confirm_style: request.confirm_style,
        })
    }
}

impl<A: Default> ModalService<A> {
    /// Informational notice whose confirm does nothing in particular
    pub fn notice(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.open(
            ModalRequest::new(title, body, A::default())
                .confirm_label("OK")
                .confirm_style(ConfirmStyle::Primary),
        );
    }
}
