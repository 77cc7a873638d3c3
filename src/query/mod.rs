//! Query state for list views and the debounced filter input feeding it.

mod debounce;
mod state;

pub use debounce::Debouncer;
pub use state::{QueryChange, QueryState, SortDir, StatusFilter};
