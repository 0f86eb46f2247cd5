//! Middleware modules

pub mod request_id;

pub use request_id::{RequestId, RequestIdLayer, REQUEST_ID_HEADER};
