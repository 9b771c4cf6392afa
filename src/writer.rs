//! Atomic replacement of the target file.

use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Mode for the replaced file: world-readable, owner-writable. The hosts
/// file must stay readable by every process that resolves names.
#[cfg(unix)]
const TARGET_MODE: u32 = 0o644;

/// Replaces `target` with `content` atomically.
///
/// The content is written to a temporary file in the target's own
/// directory (same filesystem, so the final rename is atomic), flushed,
/// chmodded, then renamed over the target. Readers see either the old file
/// or the new one, never a partial write. On any failure before the rename
/// the temporary file is removed and the target is untouched.
///
/// # Errors
///
/// Returns [`DnspinError::Io`](crate::DnspinError::Io) if the temporary
/// file cannot be created, written, or renamed into place.
pub fn replace_file(target: &Path, content: &str) -> Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(TARGET_MODE))?;
    }

    // PersistError still owns the temp file; dropping it here removes it.
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
