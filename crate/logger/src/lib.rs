pub use log_utils::{DEFAULT_FILTER, log_init};
// Re-exported so that crates depending on the logger can use the same macros
pub use tracing::{debug, error, info, trace, warn};

mod log_utils;
