//! Log stream purge
//!
//! Deletes every stream in the function's log group, one at a time, in the
//! order the service lists them. The first failing deletion stops the purge;
//! streams already deleted stay deleted.

use tracing::{error, info};

use crate::cloud::LogService;
use crate::error::{LapdError, Result};

/// Prefix of the log group a Lambda function writes to
pub const LOG_GROUP_PREFIX: &str = "/aws/lambda/";

pub fn log_group_name(function_name: &str) -> String {
    format!("{LOG_GROUP_PREFIX}{function_name}")
}

/// Delete all log streams of `function_name`, returning the deleted names
pub fn purge_logs(logs: &dyn LogService, function_name: &str) -> Result<Vec<String>> {
    let group = log_group_name(function_name);
    info!(group = %group, "purging logs");

    let streams = logs.list_log_streams(&group).map_err(|reason| {
        error!(group = %group, "couldn't list log streams: {reason}");
        LapdError::LogListFailed {
            group: group.clone(),
            reason,
        }
    })?;

    let mut deleted = Vec::with_capacity(streams.len());
    for stream in streams {
        if let Err(reason) = logs.delete_log_stream(&group, &stream) {
            error!(group = %group, stream = %stream, "couldn't delete log stream: {reason}");
            return Err(LapdError::LogDeleteFailed {
                group,
                stream,
                reason,
            });
        }
        info!(stream = %stream, "deleted log stream");
        deleted.push(stream);
    }

    info!(group = %group, count = deleted.len(), "deleted all log streams");
    Ok(deleted)
}
