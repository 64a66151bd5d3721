//! AWS implementations of the cloud traits
//!
//! The SDK is async; the workflow is not. [`AwsClients`] owns a
//! current-thread runtime and blocks on every call, so each request runs to
//! completion before the next step starts.

use std::path::Path;

use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;
use tracing::debug;

use super::{FunctionHost, LogService, ObjectStore};
use crate::error::{LapdError, Result};

/// S3, Lambda and CloudWatch Logs clients sharing one configuration
pub struct AwsClients {
    runtime: Runtime,
    s3: aws_sdk_s3::Client,
    lambda: aws_sdk_lambda::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsClients {
    /// Build clients from the standard AWS environment (profile, env vars, IMDS)
    pub fn from_env() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LapdError::CloudSetupFailed {
                reason: e.to_string(),
            })?;

        let config = runtime.block_on(aws_config::load_defaults(BehaviorVersion::latest()));
        debug!(region = ?config.region(), "loaded AWS configuration");

        Ok(Self {
            s3: aws_sdk_s3::Client::new(&config),
            lambda: aws_sdk_lambda::Client::new(&config),
            logs: aws_sdk_cloudwatchlogs::Client::new(&config),
            runtime,
        })
    }
}

impl ObjectStore for AwsClients {
    fn put_object(&self, bucket: &str, key: &str, path: &Path) -> std::result::Result<(), String> {
        self.runtime.block_on(async {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

            self.s3
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| DisplayErrorContext(&e).to_string())
        })
    }
}

impl FunctionHost for AwsClients {
    fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> std::result::Result<Option<String>, String> {
        self.runtime.block_on(async {
            self.lambda
                .update_function_code()
                .function_name(function_name)
                .s3_bucket(bucket)
                .s3_key(key)
                .send()
                .await
                .map(|output| output.code_sha256().map(ToString::to_string))
                .map_err(|e| DisplayErrorContext(&e).to_string())
        })
    }
}

impl LogService for AwsClients {
    fn list_log_streams(&self, group: &str) -> std::result::Result<Vec<String>, String> {
        self.runtime.block_on(async {
            let mut streams = Vec::new();
            let mut next_token: Option<String> = None;

            loop {
                let output = self
                    .logs
                    .describe_log_streams()
                    .log_group_name(group)
                    .set_next_token(next_token.clone())
                    .send()
                    .await
                    .map_err(|e| DisplayErrorContext(&e).to_string())?;

                streams.extend(
                    output
                        .log_streams()
                        .iter()
                        .filter_map(|s| s.log_stream_name().map(ToString::to_string)),
                );

                // The service may echo the last token instead of omitting it
                match output.next_token() {
                    Some(token) if next_token.as_deref() != Some(token) => {
                        next_token = Some(token.to_string());
                    }
                    _ => break,
                }
            }

            Ok::<_, String>(streams)
        })
    }

    fn delete_log_stream(&self, group: &str, stream: &str) -> std::result::Result<(), String> {
        self.runtime.block_on(async {
            self.logs
                .delete_log_stream()
                .log_group_name(group)
                .log_stream_name(stream)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| DisplayErrorContext(&e).to_string())
        })
    }
}
