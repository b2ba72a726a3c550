mod application_env;
mod application_shutdown;
mod application_tracing;
mod tracing_platform_notifier;

pub use application_env::*;
pub use application_shutdown::*;
pub use application_tracing::*;
pub use tracing_platform_notifier::*;
