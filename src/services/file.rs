use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};

/// Directory-backed store for uploaded food images
///
/// Files are addressed by the generated name recorded in `FoodItem::image`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

const MAX_NAME_ATTEMPTS: usize = 4;

/// `<millis><.ext>` where the extension is taken from the client's filename
pub fn generate_filename(original_name: &str, millis: i64) -> String {
    format!("{}{}", millis, extension_of(original_name))
}

fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Resolve a stored name to its path; names that could escape the
    /// directory resolve to nothing.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        let is_plain = !name.is_empty()
            && candidate.file_name().map(|f| f == candidate.as_os_str()).unwrap_or(false)
            && name != "."
            && name != "..";
        is_plain.then(|| self.root.join(name))
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.path_of(name) {
            Some(path) => fs::try_exists(path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Write `data` under a fresh timestamp-based name and return that name.
    ///
    /// Two uploads in the same millisecond do not clobber each other: the
    /// second one gets a random suffix.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> io::Result<String> {
        self.ensure_dir().await?;

        let millis = chrono::Utc::now().timestamp_millis();
        let mut name = generate_filename(original_name, millis);

        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self.root.join(&name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    let written = async {
                        file.write_all(data).await?;
                        file.flush().await
                    }
                    .await;
                    if let Err(e) = written {
                        let _ = fs::remove_file(&path).await;
                        return Err(e);
                    }
                    tracing::info!(
                        "Stored upload {} as {} ({} bytes)",
                        original_name,
                        name,
                        data.len()
                    );
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let suffix = uuid::Uuid::new_v4().simple().to_string();
                    name = format!("{}-{}{}", millis, &suffix[..8], extension_of(original_name));
                    tracing::debug!("Upload name collision, retrying as {}", name);
                }
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("could not find a free name for upload {}", original_name),
        ))
    }

    /// Best-effort delete. A file that is already gone counts as deleted;
    /// callers log any other error and carry on.
    pub async fn discard(&self, name: &str) -> io::Result<()> {
        let Some(path) = self.path_of(name) else {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("refusing to delete {:?} outside the upload directory", name),
            ));
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted image {}", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Fire-and-forget `discard`: the request does not wait for the delete.
    pub fn discard_in_background(&self, name: String) {
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(e) = store.discard(&name).await {
                tracing::error!("File deletion error for {}: {}", name, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_keeps_only_the_extension() {
        assert_eq!(generate_filename("a.png", 1700000000000), "1700000000000.png");
        assert_eq!(generate_filename("photo.final.JPG", 5), "5.JPG");
        assert_eq!(generate_filename("noext", 5), "5");
        assert_eq!(generate_filename("../../etc/passwd.p/ng", 5), "5");
    }

    #[test]
    fn path_of_rejects_traversal() {
        let store = FileStore::new("/tmp/uploads");
        assert!(store.path_of("123.png").is_some());
        assert!(store.path_of("../secret").is_none());
        assert!(store.path_of("a/b.png").is_none());
        assert!(store.path_of("..").is_none());
        assert!(store.path_of("").is_none());
    }

    #[tokio::test]
    async fn save_then_discard() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));

        let name = store.save("a.png", b"png-bytes").await.unwrap();
        assert!(name.ends_with(".png"));
        assert!(store.exists(&name).await);

        store.discard(&name).await.unwrap();
        assert!(!store.exists(&name).await);

        // already gone is not an error
        store.discard(&name).await.unwrap();
    }

    #[tokio::test]
    async fn discard_reports_failures_other_than_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::create_dir(dir.path().join("album")).unwrap();

        let err = store.discard("album").await.unwrap_err();
        assert_ne!(err.kind(), ErrorKind::NotFound);

        let err = store.discard("../escape.png").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn same_millisecond_uploads_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let mut names = Vec::new();
        for _ in 0..5 {
            names.push(store.save("a.png", b"x").await.unwrap());
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
