//! Request authentication for the REST boundary.

pub mod signature;

pub use signature::{RequestSigner, SignatureError, SIGNATURE_WINDOW_MS};
