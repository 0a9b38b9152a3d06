//! Owner-only file helpers.
//!
//! Everything here writes files that may hold credentials (`.env`,
//! database dumps, snapshots), so the result is always mode 0600 on Unix
//! regardless of the process umask.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Force owner read/write only.
pub fn set_owner_only(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Create `dir` (and parents) restricted to the owner.
pub fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Hidden temp path next to `path`, on the same filesystem.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// Replace `path` with `contents` in one rename.
///
/// The content is fully written to a sibling temp file first, so a failed
/// write never leaves a truncated target behind.
pub fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);

    let result = fs::write(&tmp, contents)
        .and_then(|_| set_owner_only(&tmp))
        .and_then(|_| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    set_owner_only(path)
}

/// Move a finished temp file over `path`, owner-only.
pub fn commit_private(tmp: &Path, path: &Path) -> io::Result<()> {
    set_owner_only(tmp)?;
    fs::rename(tmp, path)?;
    set_owner_only(path)
}

/// Copy `src` to `dest` with owner-only permissions.
pub fn copy_private(src: &Path, dest: &Path) -> io::Result<()> {
    let contents = fs::read(src)?;
    write_private(dest, &contents)
}

/// Permission bits of `path`. Other platforms have none to report.
#[cfg(unix)]
pub fn mode_of(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
pub fn mode_of(path: &Path) -> io::Result<u32> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("no permission bits for {}", path.display()),
    ))
}
