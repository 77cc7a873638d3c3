//! Yes/no confirmation gate for destructive actions.

use std::mem;

use crate::models::{Department, Student};

/// Title and body of a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Prompt for flipping a student's active flag.
    pub fn toggle_student(student: &Student) -> Self {
        let action = if student.active { "Deactivate" } else { "Activate" };
        Self::new(
            format!("{action} Student"),
            format!(
                "Are you sure you want to {} {}?",
                action.to_lowercase(),
                student.full_name()
            ),
        )
    }

    /// Prompt for flipping a department's active flag.
    ///
    /// Deactivation cascades to the department's courses on the backend.
    pub fn toggle_department(department: &Department) -> Self {
        if department.active {
            Self::new(
                "Deactivate Department",
                format!(
                    "This will also deactivate all associated courses. Are you sure you want to deactivate {}?",
                    department.display_name()
                ),
            )
        } else {
            Self::new(
                "Activate Department",
                format!("Are you sure you want to activate {}?", department.display_name()),
            )
        }
    }
}

/// At most one open prompt, holding the action to run on confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<A> {
    Closed,
    Open { prompt: Prompt, action: A },
}

impl<A> Default for DialogState<A> {
    fn default() -> Self {
        DialogState::Closed
    }
}

impl<A> DialogState<A> {
    /// Open a prompt, replacing any prompt already open.
    pub fn open(&mut self, prompt: Prompt, action: A) {
        *self = DialogState::Open { prompt, action };
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open { .. })
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            DialogState::Open { prompt, .. } => Some(prompt),
            DialogState::Closed => None,
        }
    }

    /// Close the dialog and hand back its action.
    ///
    /// The dialog is closed before the action is returned, so a second
    /// confirm yields `None`.
    pub fn confirm(&mut self) -> Option<A> {
        match mem::replace(self, DialogState::Closed) {
            DialogState::Open { action, .. } => Some(action),
            DialogState::Closed => None,
        }
    }

    /// Close the dialog, dropping its action.
    pub fn cancel(&mut self) {
        *self = DialogState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(active: bool) -> Department {
        Department {
            id: 4,
            name: "ELECTRICAL_ENGINEERING".into(),
            active,
            courses: vec![],
        }
    }

    #[test]
    fn test_confirm_fires_once() {
        let mut dialog = DialogState::default();
        dialog.open(Prompt::new("t", "m"), 42);
        assert!(dialog.is_open());
        assert_eq!(dialog.confirm(), Some(42));
        assert!(!dialog.is_open());
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_cancel_drops_action() {
        let mut dialog = DialogState::default();
        dialog.open(Prompt::new("t", "m"), "toggle");
        dialog.cancel();
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_open_replaces_previous() {
        let mut dialog = DialogState::default();
        dialog.open(Prompt::new("first", "m"), 1);
        dialog.open(Prompt::new("second", "m"), 2);
        assert_eq!(dialog.prompt().map(|p| p.title.as_str()), Some("second"));
        assert_eq!(dialog.confirm(), Some(2));
    }

    #[test]
    fn test_department_prompts() {
        let deactivate = Prompt::toggle_department(&department(true));
        assert_eq!(deactivate.title, "Deactivate Department");
        assert!(deactivate.message.contains("deactivate all associated courses"));
        assert!(deactivate.message.ends_with("ELECTRICAL ENGINEERING?"));

        let activate = Prompt::toggle_department(&department(false));
        assert_eq!(activate.title, "Activate Department");
        assert!(!activate.message.contains("courses"));
    }
}
