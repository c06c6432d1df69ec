pub mod client;
pub mod redact;

pub use client::{HttpClient, HttpResponseData};
pub use redact::HttpDebugConfig;
