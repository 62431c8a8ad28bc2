//! Reads staged image files from disk.

use std::path::Path;
use tracing::debug;
use updater_core::error::{Result, UpdaterError};
use updater_core::project::Attachment;

/// Loads a file as an [`Attachment`] named after its file name, with the
/// MIME type guessed from the extension.
pub async fn load_attachment(path: &Path) -> Result<Attachment> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| UpdaterError::io(format!("Not a file path: {}", path.display())))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| UpdaterError::io(format!("Failed to read {}: {e}", path.display())))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    debug!(%name, %mime_type, size = bytes.len(), "Loaded attachment");
    Ok(Attachment::new(name, mime_type, bytes))
}

/// Loads every path in order, stopping at the first unreadable file.
pub async fn load_attachments<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Attachment>> {
    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        attachments.push(load_attachment(path.as_ref()).await?);
    }
    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_loads_name_type_and_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site.jpg");
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.name, "site.jpg");
        assert_eq!(attachment.mime_type, "image/jpeg");
        assert_eq!(attachment.bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.zzqx");
        std::fs::write(&path, b"data").unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_attachment(&temp_dir.path().join("nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdaterError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_many_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.gif");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let loaded = load_attachments(&[b.clone(), a.clone()]).await.unwrap();
        let names: Vec<_> = loaded.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b.gif", "a.png"]);
    }
}
