//! Function code update

use tracing::{error, info};

use crate::cloud::FunctionHost;
use crate::error::{LapdError, Result};

/// Point `function_name` at the archive uploaded to `bucket`/`key`
pub fn deploy_function(
    host: &dyn FunctionHost,
    function_name: &str,
    bucket: &str,
    key: &str,
) -> Result<()> {
    info!(function = function_name, "deploying function");

    match host.update_function_code(function_name, bucket, key) {
        Ok(code_sha256) => {
            info!(function = function_name, code_sha256 = ?code_sha256, "function code updated");
            Ok(())
        }
        Err(reason) => {
            error!(function = function_name, "couldn't update function code: {reason}");
            Err(LapdError::DeployFailed {
                function: function_name.to_string(),
                reason,
            })
        }
    }
}
