mod config;
mod errors;
mod observe;
mod resource;
mod scheduler;
mod server;
mod tree;

pub use self::config::*;
pub use errors::*;
pub use observe::*;
pub use resource::*;
pub use scheduler::*;
pub use server::*;
pub use tree::*;


//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
