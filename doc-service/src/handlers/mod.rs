pub mod documents;
pub mod health;
pub mod hello;

pub use documents::{list_documents, update_document};
pub use health::{health_check, metrics_handler};
pub use hello::hello;
