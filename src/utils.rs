use std::path::{Path, PathBuf};

use tokio::fs;

/// Persists an uploaded image under `<public_dir>/img/` and returns the
/// relative path stored on the contact. Only the final path component of the
/// client-submitted name is used; an existing file with the same name is
/// overwritten.
pub async fn save_upload(
    public_dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> std::io::Result<String> {
    let name = PathBuf::from(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty file name"))?;

    let dir = public_dir.join("img");
    fs::create_dir_all(&dir).await?;
    fs::write(dir.join(&name), bytes).await?;

    Ok(format!("img/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_strips_directory_components() {
        let public_dir = std::env::temp_dir().join("contact-book-upload-test");
        let stored = save_upload(&public_dir, "../../evil.jpg", b"fake")
            .await
            .unwrap();
        assert_eq!(stored, "img/evil.jpg");
        assert!(public_dir.join("img/evil.jpg").exists());

        fs::remove_dir_all(&public_dir).await.ok();
    }
}
