mod decision;
mod delay;
mod engine;
mod failure;
mod timeout;

pub use decision::{Decision, Failure};
pub use delay::compute_delay;
pub use engine::decide;
pub use failure::{check_failure, is_injected, status_reason, CHAOS_PREFIX, DEFAULT_FAIL_CODES};
pub use timeout::check_timeout;
