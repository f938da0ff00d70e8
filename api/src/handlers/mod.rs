pub mod context;
pub mod error;

pub use context::ClientContext;
pub use error::{handle_domain_error, validation_error_response};
