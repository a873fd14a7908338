use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::document::{is_plain_file_name, Document, Rendered};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid document name: {0:?}")]
    InvalidName(String),
    #[error("{0} does not exist.")]
    NotFound(String),
    #[error("A document with that name already exists.")]
    AlreadyExists(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle over the directory holding every document.
///
/// Nothing is cached: each call goes to the filesystem, so the listing always
/// reflects what is on disk. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: Arc<PathBuf>,
}

impl DocumentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::debug!(root = %root.display(), "document store opened");
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, DocumentError> {
        if !is_plain_file_name(name) {
            return Err(DocumentError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Names of all regular files in the root, in byte order.
    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        let mut entries = fs::read_dir(self.root.as_path()).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // non UTF-8 names can't be addressed from a URL anyway
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!(name = ?raw, "skipping non UTF-8 document name"),
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn contains(&self, name: &str) -> Result<bool, DocumentError> {
        Ok(self.list().await?.iter().any(|n| n == name))
    }

    /// Whether `path` is a regular file, by the same rule [`list`](Self::list)
    /// applies. Symlinks are not followed, so a link is never a document.
    async fn is_document(path: &Path) -> Result<Option<bool>, DocumentError> {
        match fs::symlink_metadata(path).await {
            Ok(meta) => Ok(Some(meta.file_type().is_file())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read(&self, name: &str) -> Result<Document, DocumentError> {
        let path = self.path_for(name)?;

        if Self::is_document(&path).await? != Some(true) {
            return Err(DocumentError::NotFound(name.to_string()));
        }

        match fs::read(&path).await {
            Ok(content) => Ok(Document::new(name, content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DocumentError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn render(&self, name: &str) -> Result<Rendered, DocumentError> {
        Ok(self.read(name).await?.render())
    }

    /// Replace the full content of `name`, creating it if it is missing.
    ///
    /// Anything at that path that isn't a regular file (a directory, a symlink)
    /// is left alone and reported as `NotFound`.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        let path = self.path_for(name)?;
        if Self::is_document(&path).await? == Some(false) {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        fs::write(&path, content).await?;
        tracing::debug!(document = name, bytes = content.len(), "document written");
        Ok(())
    }

    /// Create an empty document, failing if the name is taken.
    ///
    /// The existence check and the creation are a single `O_EXCL` open, so two
    /// concurrent creates of one name cannot both succeed.
    pub async fn create(&self, name: &str) -> Result<(), DocumentError> {
        let path = self.path_for(name)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(DocumentError::AlreadyExists(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        file.flush().await?;
        tracing::debug!(document = name, "document created");
        Ok(())
    }

    /// Remove `name`. A document that is already gone is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(document = name, "document deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (DocumentStore, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = DocumentStore::open(temp_dir.path().join("data"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_open_creates_root() {
        let (store, _temp) = setup().await;
        assert!(store.root().is_dir());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_skips_directories() {
        let (store, _temp) = setup().await;
        store.write("history.txt", b"2014").await.unwrap();
        store.write("about.txt", b"about").await.unwrap();
        store.write("changes.txt", b"v0.9").await.unwrap();
        std::fs::create_dir(store.root().join("subdir")).unwrap();

        let names = store.list().await.unwrap();
        assert_eq!(names, vec!["about.txt", "changes.txt", "history.txt"]);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (store, _temp) = setup().await;
        let err = store.read("nope.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(ref name) if name == "nope.txt"));
        assert_eq!(err.to_string(), "nope.txt does not exist.");
    }

    #[tokio::test]
    async fn test_read_directory_is_not_found() {
        let (store, _temp) = setup().await;
        std::fs::create_dir(store.root().join("folder.txt")).unwrap();
        let err = store.read("folder.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_are_not_documents() {
        let (store, temp) = setup().await;
        let target = temp.path().join("users.toml");
        std::fs::write(&target, b"[users]\nadmin = \"$2b$04$hash\"\n").unwrap();
        std::os::unix::fs::symlink(&target, store.root().join("link.txt")).unwrap();

        assert!(store.list().await.unwrap().is_empty());

        let err = store.read("link.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));

        let err = store.write("link.txt", b"overwritten").await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
        assert!(std::fs::read_to_string(&target).unwrap().contains("$2b$04$hash"));
    }

    #[tokio::test]
    async fn test_write_overwrites_content() {
        let (store, _temp) = setup().await;
        store.write("history.txt", b"old").await.unwrap();
        store.write("history.txt", b"new").await.unwrap();

        let doc = store.read("history.txt").await.unwrap();
        assert_eq!(doc.content, b"new");
        assert_eq!(doc.kind, Some(crate::document::DocumentKind::PlainText));
    }

    #[tokio::test]
    async fn test_create_is_empty_and_refuses_duplicates() {
        let (store, _temp) = setup().await;
        store.create("new.txt").await.unwrap();
        assert!(store.read("new.txt").await.unwrap().content.is_empty());

        store.write("new.txt", b"keep me").await.unwrap();
        let err = store.create("new.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyExists(_)));

        // not overwritten
        assert_eq!(store.read("new.txt").await.unwrap().content, b"keep me");
        assert_eq!(store.list().await.unwrap(), vec!["new.txt"]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_only_one_wins() {
        let (store, _temp) = setup().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create("race.md").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(DocumentError::AlreadyExists(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _temp) = setup().await;
        store.write("history.txt", b"2014").await.unwrap();
        assert!(store.contains("history.txt").await.unwrap());

        store.delete("history.txt").await.unwrap();
        assert!(!store.contains("history.txt").await.unwrap());

        // already gone
        store.delete("history.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_names_outside_root() {
        let (store, temp) = setup().await;
        std::fs::write(temp.path().join("secret.txt"), b"hidden").unwrap();

        for name in ["../secret.txt", "..", "", "a/b.txt"] {
            let err = store.read(name).await.unwrap_err();
            assert!(matches!(err, DocumentError::InvalidName(_)), "{name}");
        }
        let err = store.write("../secret.txt", b"x").await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidName(_)));
        assert_eq!(
            std::fs::read(temp.path().join("secret.txt")).unwrap(),
            b"hidden"
        );
    }

    #[tokio::test]
    async fn test_render_markdown_document() {
        let (store, _temp) = setup().await;
        store
            .write("readme.md", b"Isn't that *swell*?")
            .await
            .unwrap();
        let rendered = store.render("readme.md").await.unwrap();
        assert_eq!(rendered.content_type, "text/html;charset=utf-8");
        assert!(String::from_utf8(rendered.body)
            .unwrap()
            .contains("<em>swell</em>"));
    }
}
