//! Chunked copy with a per-file size ceiling
//!
//! Guards the archive against unbounded inputs (device files, files that
//! keep growing while they are read, zip bombs in vendored trees).

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

/// Bytes moved per read
pub const CHUNK_SIZE: usize = 4096;

/// Largest single file accepted into an archive (100 GiB)
pub const SINGLE_FILE_BYTE_LIMIT: u64 = 100 * 1024 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("source exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("read failed: {0}")]
    Read(std::io::Error),

    #[error("write failed: {0}")]
    Write(std::io::Error),
}

/// Copy `reader` into `writer` in [`CHUNK_SIZE`] chunks
///
/// Fails with [`CopyError::TooLarge`] as soon as the bytes read exceed
/// `limit`. Returns the number of bytes copied.
pub fn copy_bounded<R, W>(reader: &mut R, writer: &mut W, limit: u64) -> Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        total += bytes_read as u64;
        if total > limit {
            return Err(CopyError::TooLarge { limit });
        }

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(CopyError::Write)?;
    }

    Ok(total)
}
