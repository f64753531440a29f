pub mod classifier;
pub mod click;
pub mod rows;

pub use classifier::{classify, OrderEvent};
pub use click::{ClickTracker, InteractionFilter, InteractionTarget, TagFilter};
pub use rows::RowCounter;
