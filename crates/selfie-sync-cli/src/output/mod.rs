//! Terminal output adapters.

mod progress;

pub use progress::ProgressBar;
