//! Infrastructure layer for campaign-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP chat transport and configuration
//! file loading.

pub mod config;
pub mod http;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEndpointConfig, FileReplConfig,
    FileStreamConfig,
};
pub use http::{HttpChatTransport, HttpTransportError};
