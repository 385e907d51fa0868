//! Deployment configuration: the environment bag and the backend resolver.

mod env;
pub mod mode;

pub use env::EnvConfig;
pub use mode::{resolve, BackendMode};
