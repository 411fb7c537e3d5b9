pub mod clock;
pub mod report;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use report::{ReportScheduler, TaskState};
