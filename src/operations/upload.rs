//! Archive upload

use std::fs::File;
use std::path::Path;

use tracing::{error, info};

use crate::cloud::ObjectStore;
use crate::error::{LapdError, Result};

/// Upload the archive at `local_path` to `bucket`/`key` in one request
pub fn upload(store: &dyn ObjectStore, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
    let size = File::open(local_path)
        .and_then(|file| file.metadata())
        .map_err(|e| {
            error!(path = %local_path.display(), "couldn't open archive to upload: {e}");
            LapdError::FileReadFailed {
                path: local_path.display().to_string(),
                reason: e.to_string(),
            }
        })?
        .len();

    info!(bucket, key, size, "uploading archive");
    store.put_object(bucket, key, local_path).map_err(|reason| {
        error!(
            path = %local_path.display(),
            bucket,
            key,
            "couldn't upload archive: {reason}"
        );
        LapdError::UploadFailed {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        }
    })
}
