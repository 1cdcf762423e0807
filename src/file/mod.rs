use std::path::PathBuf;

use tap::TapFallible;
use tokio::fs;
use tracing::{debug, error};

pub use promisify::{promisify, Callback, Promise};

mod promisify;

/// Read the whole file at `path` as text, then call `callback` with the result.
///
/// The read runs as a task on the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn read_file(path: impl Into<PathBuf>, callback: Callback<String>) {
    let path = path.into();

    tokio::spawn(async move {
        let result = fs::read_to_string(&path)
            .await
            .tap_ok(|content| debug!(?path, len = content.len(), "read file done"))
            .tap_err(|err| debug!(%err, ?path, "read file failed"));

        callback(result);
    });
}

/// Create or truncate the file at `path` and write `content` to it. The
/// callback receives the written path on success.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn write_file(
    path: impl Into<PathBuf>,
    content: impl Into<String>,
    callback: Callback<PathBuf>,
) {
    let path = path.into();
    let content = content.into();

    tokio::spawn(async move {
        let result = fs::write(&path, content)
            .await
            .map(|_| path.clone())
            .tap_ok(|path| debug!(?path, "write file done"))
            .tap_err(|err| error!(%err, ?path, "write file failed"));

        callback(result);
    });
}

pub fn promisified_read_file(path: impl Into<PathBuf>) -> Promise<String> {
    let path = path.into();

    promisify(move |callback| read_file(path, callback))
}

pub fn promisified_write_file(
    path: impl Into<PathBuf>,
    content: impl Into<String>,
) -> Promise<PathBuf> {
    let path = path.into();
    let content = content.into();

    promisify(move |callback| write_file(path, content, callback))
}

#[cfg(test)]
mod tests {
    use std::io::{self, ErrorKind};
    use std::path::Path;

    use futures_channel::oneshot;

    use super::*;

    async fn callback_read(path: &Path) -> io::Result<String> {
        let (sender, receiver) = oneshot::channel();

        read_file(
            path,
            Box::new(move |result| {
                let _ = sender.send(result);
            }),
        );

        receiver.await.unwrap()
    }

    #[tokio::test]
    async fn test_read_shapes_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stanza-01.txt");
        std::fs::write(&path, "the sea was wet as wet could be\n").unwrap();

        let by_callback = callback_read(&path).await.unwrap();
        let by_promise = promisified_read_file(&path).await.unwrap();

        assert_eq!(by_callback, "the sea was wet as wet could be\n");
        assert_eq!(by_callback, by_promise);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrong-file-name-3.txt");

        let err = callback_read(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = promisified_read_file(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_empty_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert_eq!(promisified_read_file(&path).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("message.txt");

        let written = promisified_write_file(&path, "Hello").await.unwrap();
        assert_eq!(written, path);

        assert_eq!(promisified_read_file(&written).await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("message.txt");
        std::fs::write(&path, "Hello Node.js, this is longer").unwrap();

        promisified_write_file(&path, "Hello").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_write_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("message.txt");

        let err = promisified_write_file(&path, "Hello").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!path.exists());
    }
}
