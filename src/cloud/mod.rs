//! Cloud services used by a deployment
//!
//! The workflow only talks to these traits. [`aws::AwsClients`] implements
//! all three against S3, Lambda and CloudWatch Logs; tests use in-memory
//! fakes.

pub mod aws;

use std::path::Path;

/// Object storage receiving the packaged archive
pub trait ObjectStore {
    /// Upload the file at `path` as a single object
    fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), String>;
}

/// Compute platform hosting the function
pub trait FunctionHost {
    /// Point `function_name` at the code stored in `bucket`/`key`
    ///
    /// Returns the code hash reported by the platform, if any.
    fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> Result<Option<String>, String>;
}

/// Log service holding the function's log streams
pub trait LogService {
    /// Names of all streams in `group`, in service order
    fn list_log_streams(&self, group: &str) -> Result<Vec<String>, String>;

    fn delete_log_stream(&self, group: &str, stream: &str) -> Result<(), String>;
}
