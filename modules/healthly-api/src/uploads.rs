use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;
use uuid::Uuid;

/// Lowercased extension of `filename` if it is in `allowed`.
pub fn allowed_extension(filename: &str, allowed: &[String]) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    allowed.iter().any(|a| *a == ext).then_some(ext)
}

/// A bare file name: no directory components, not `.` or `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Write `data` as `{uuid}.{ext}` under `dir`. Returns the new file name.
pub async fn save(dir: &Path, ext: &str, data: &[u8]) -> Result<String> {
    tokio::fs::create_dir_all(dir).await?;
    let filename = format!("{}.{ext}", Uuid::new_v4());
    tokio::fs::write(dir.join(&filename), data).await?;
    tracing::info!(filename = %filename, bytes = data.len(), "Saved upload");
    Ok(filename)
}

/// Path of a stored upload, if `name` is a plain file name that exists as a
/// regular file.
pub async fn locate(dir: &Path, name: &str) -> Option<PathBuf> {
    if !is_plain_file_name(name) {
        return None;
    }
    let path = dir.join(name);
    let meta = tokio::fs::metadata(&path).await.ok()?;
    meta.is_file().then_some(path)
}

/// Delete regular files in `dir` last modified at least `max_age` ago.
/// Best-effort: failures are logged and skipped. Returns the number removed.
pub async fn prune(dir: &Path, max_age: Duration) -> usize {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot read upload directory");
            return 0;
        }
    };

    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read upload directory entry");
                break;
            }
        };

        let path = entry.path();
        // Another request may have removed it already.
        let Ok(meta) = tokio::fs::metadata(&path).await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if modified > cutoff {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot remove file"),
        }
    }

    if removed > 0 {
        tracing::info!(removed, "Pruned old uploads");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["png".into(), "jpg".into(), "jpeg".into()]
    }

    #[test]
    fn extension_whitelist() {
        assert_eq!(allowed_extension("photo.PNG", &allowed()), Some("png".into()));
        assert_eq!(allowed_extension("a.b.jpeg", &allowed()), Some("jpeg".into()));
        assert_eq!(allowed_extension("anim.gif", &allowed()), None);
        assert_eq!(allowed_extension("noext", &allowed()), None);
        assert_eq!(allowed_extension("trailing.", &allowed()), None);
    }

    #[test]
    fn plain_file_names_only() {
        assert!(is_plain_file_name("abc.png"));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("sub/abc.png"));
        assert!(!is_plain_file_name("sub\\abc.png"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("x.png"), "image/png");
        assert_eq!(content_type_for("x.JPG"), "image/jpeg");
        assert_eq!(content_type_for("x"), "application/octet-stream");
    }

    #[tokio::test]
    async fn save_then_locate() {
        let dir = tempfile::tempdir().unwrap();
        let name = save(dir.path(), "png", b"image").await.unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 36 + 4);

        let path = locate(dir.path(), &name).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"image");
        assert!(locate(dir.path(), "missing.png").await.is_none());
        assert!(locate(dir.path(), "..").await.is_none());
    }

    #[tokio::test]
    async fn prune_removes_only_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.png");
        let fresh = dir.path().join("fresh.png");
        std::fs::write(&old, b"old").unwrap();
        std::fs::write(&fresh, b"fresh").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let four_days_ago = SystemTime::now() - Duration::from_secs(4 * 86_400);
        std::fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(four_days_ago)
            .unwrap();

        let removed = prune(dir.path(), Duration::from_secs(3 * 86_400)).await;
        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn prune_of_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(prune(&dir.path().join("absent"), Duration::from_secs(1)).await, 0);
    }
}
