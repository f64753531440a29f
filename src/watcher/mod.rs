pub mod controller;
pub mod state;

pub use controller::{OrderWatcher, WatchExit, WatcherController};
pub use state::{Cycle, OrderTracker};
