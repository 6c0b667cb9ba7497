mod error;
pub mod openapi;
pub mod subscriptions;

pub use error::{ErrorBody, RestError, RestResult};
