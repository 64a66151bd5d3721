//! Deployment operations
//!
//! Each operation is one call (or one sequence of calls) into a cloud
//! service:
//! - [`upload`]: push the archive to object storage
//! - [`update`]: repoint the function at the uploaded object
//! - [`purge`]: delete every log stream of the function

pub mod purge;
pub mod update;
pub mod upload;

pub use purge::purge_logs;
pub use update::deploy_function;
pub use upload::upload;
