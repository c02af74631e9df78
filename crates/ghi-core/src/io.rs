use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Permission bits for issue files.
pub const FILE_MODE: u32 = 0o644;

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// The temp file is synced and given `mode` before it is renamed over `path`,
/// so readers see either the old file or the complete new one. On any failure
/// the temp file is removed and `path` is left as it was.
pub fn atomic_write(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    write_then_persist(path, data, mode, |_| Ok(()))
}

fn write_then_persist<F>(path: &Path, data: &[u8], mode: u32, before_persist: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let prefix = format!(
        ".{}-",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    let mut tmp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    // Closes the handle; the path is still removed on drop until persisted.
    let tmp_path = tmp.into_temp_path();
    set_mode(&tmp_path, mode)?;
    before_persist(&tmp_path)?;
    tmp_path.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
