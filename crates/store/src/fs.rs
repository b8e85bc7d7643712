use breadth_core::store::error::StoreError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 目标文件同目录下的临时文件路径。
fn staging_path(path: &Path) -> Result<PathBuf, StoreError> {
    let mut name = path
        .file_name()
        .ok_or_else(|| StoreError::Io(format!("not a file path: {}", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// # Summary
/// 先写临时文件再改名，保证目标文件要么是旧内容、要么是完整的新内容。
///
/// # Logic
/// 1. 确保父目录存在。
/// 2. 在同目录创建 `<name>.tmp` 并交给 `write` 写入、落盘。
/// 3. 成功则 rename 覆盖目标，失败则删除临时文件并返回错误。
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut File) -> Result<(), StoreError>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path)?;
    let written = File::create(&staging)
        .map_err(StoreError::from)
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()?;
            Ok(())
        });

    match written {
        Ok(()) => {
            fs::rename(&staging, path)?;
            Ok(())
        }
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!("Failed to remove staging file {}: {}", staging.display(), cleanup);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_failed_write_keeps_previous_content() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("metrics.json");
        fs::write(&path, b"old").unwrap();

        let result = write_atomically(&path, |file| {
            file.write_all(b"partial")?;
            Err(StoreError::Encode("boom".to_string()))
        });

        assert!(matches!(result, Err(StoreError::Encode(_))));
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert!(!staging_path(&path).unwrap().exists());
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("out.json");

        write_atomically(&path, |file| Ok(file.write_all(b"[]")?)).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }
}
