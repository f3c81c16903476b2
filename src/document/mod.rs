mod classify;
mod compose;
mod grouping;
mod lines;

pub use classify::DocumentClassifier;
pub use compose::compose;
pub use grouping::{group, passes_filter};
