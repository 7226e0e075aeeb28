//! HTTP adapter for the chat transport port
//!
//! POSTs the conversation to the chat endpoint and hands the response body
//! to the stream controller chunk by chunk, as reqwest yields it.

pub mod error;
pub mod transport;

pub use error::HttpTransportError;
pub use transport::HttpChatTransport;
