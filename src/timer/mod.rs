pub mod debounced_flag;
pub mod scheduled;

pub use debounced_flag::DebouncedFlag;
pub use scheduled::{earliest, sleep_until_deadline, ScheduledTask};
