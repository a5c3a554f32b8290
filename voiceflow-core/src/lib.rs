pub mod command;
pub mod config;
pub mod error;
pub mod framing;
pub mod message;

// Keep the public surface small and intentional.
pub use command::*;
pub use config::*;
pub use error::*;
pub use framing::*;
pub use message::*;
