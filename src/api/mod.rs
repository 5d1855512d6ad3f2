pub mod client;
pub mod endpoint;

pub use client::ApiClient;
pub use endpoint::EndpointDescriptor;
