// src/controllers/form.rs

//! Shared form status machine.
//!
//! ```text
//! Loading ──▶ Idle ──▶ Submitting ──▶ Success (terminal)
//!    │                  ▲      │
//!    └──────▶ Error ────┘      └────▶ Error
//! ```

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::FormMessage;
use crate::routes::Route;

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Loading,
    Submitting,
    Success(String),
    Error(FormMessage),
}

impl FormStatus {
    /// Lines to show under the form, if any.
    pub fn message_lines(&self) -> Vec<&str> {
        match self {
            FormStatus::Success(message) => vec![message.as_str()],
            FormStatus::Error(message) => message.lines(),
            _ => Vec::new(),
        }
    }
}

/// Whether a form creates a record or edits the one identified by `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<K> {
    Create,
    Edit(K),
}

impl<K> FormMode<K> {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

/// Deferred navigation after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub after: Duration,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; every field is now touched
    Invalid,
    /// Backend refused; the form is in `Error`
    Rejected(FormMessage),
    /// Saved; navigate once the delay has passed
    Saved(Navigation),
}

/// Guarded transitions over [`FormStatus`].
#[derive(Debug, Clone)]
pub struct FormState {
    status: FormStatus,
}

impl FormState {
    pub fn idle() -> Self {
        Self {
            status: FormStatus::Idle,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: FormStatus::Loading,
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Submission is allowed only from `Idle` or `Error`.
    pub fn can_submit(&self) -> bool {
        matches!(self.status, FormStatus::Idle | FormStatus::Error(_))
    }

    pub fn finish_loading(&mut self) {
        if self.status == FormStatus::Loading {
            self.status = FormStatus::Idle;
        }
    }

    pub fn begin_submit(&mut self) -> Result<()> {
        if !self.can_submit() {
            return Err(AppError::transition(format!(
                "cannot submit while {:?}",
                self.status
            )));
        }
        self.status = FormStatus::Submitting;
        Ok(())
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.status = FormStatus::Success(message.into());
    }

    /// Enter `Error`. A finished form stays finished.
    pub fn fail(&mut self, message: FormMessage) {
        if !matches!(self.status, FormStatus::Success(_)) {
            self.status = FormStatus::Error(message);
        }
    }
}
