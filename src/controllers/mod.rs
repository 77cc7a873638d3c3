//! View controllers for the admin client.
//!
//! - List views (`ListController`, `ListDriver`)
//! - Create/edit forms (`StudentForm`, `DepartmentForm`)
//! - Confirmation dialogs (`DialogState`)

mod confirm;
mod department_form;
mod driver;
mod form;
mod list;
mod normalize;
mod student_form;
mod validation;

pub use confirm::{DialogState, Prompt};
pub use department_form::{CourseEntry, DEPARTMENT_ADDED, DEPARTMENT_UPDATED, DepartmentForm};
pub use driver::{ListDriver, ListEvent};
pub use form::{FormMode, FormState, FormStatus, Navigation, SubmitOutcome};
pub use list::{
    DOWNLOAD_FAILED, FetchTicket, ListController, ListResource, TOGGLE_FAILED, ViewState,
};
pub use normalize::{canonical_name, collapse_whitespace, display_name, optional_text};
pub use student_form::{CourseLoad, STUDENT_ADDED, STUDENT_UPDATED, StudentField, StudentForm};
pub use validation::{DEPARTMENT_NAME, Field, FieldError, PERSON_NAME, Rule};
