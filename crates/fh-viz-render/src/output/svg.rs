use std::path::Path;

/// Write bytes to `path`, creating missing parent directories.
pub fn save_bytes(bytes: &[u8], path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
