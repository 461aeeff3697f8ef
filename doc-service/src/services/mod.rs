pub mod database;
pub mod metrics;
pub mod store;

pub use database::{Database, RetryPolicy};
pub use self::metrics::{get_metrics, init_metrics};
pub use store::DocumentStore;
