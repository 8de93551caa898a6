//! Request dispatch and server assembly.

mod builder;
mod message;
mod resource_server;

pub use builder::*;
pub use message::*;
pub use resource_server::*;
