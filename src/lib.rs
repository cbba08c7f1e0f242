pub mod backends;
pub mod custom_origin;
pub mod env_file;
pub mod install;
pub mod scaffold;

// Re-export commonly used types
pub use scaffold::{NpmClient, ProjectDescriptor, Scaffold, ScaffoldError};
