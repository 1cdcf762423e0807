use std::io;
use std::path::{Path, PathBuf};

use futures_util::future;
use rand::Rng;
use tap::TapFallible;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::file::promisified_write_file;

/// `<poem_dir>/stanza-01.txt` up to `<poem_dir>/stanza-<count>.txt`.
pub fn stanza_paths(poem_dir: &Path, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|n| poem_dir.join(format!("stanza-{n:02}.txt")))
        .collect()
}

/// Replace the 1-based `position` stanza with a path that does not exist.
/// A random position is picked when none is given.
pub fn misname_stanza(
    poem_dir: &Path,
    mut paths: Vec<PathBuf>,
    position: Option<usize>,
) -> Vec<PathBuf> {
    if paths.is_empty() {
        return paths;
    }

    let position = position.unwrap_or_else(|| rand::thread_rng().gen_range(1..=paths.len()));

    if let Some(path) = position
        .checked_sub(1)
        .and_then(|index| paths.get_mut(index))
    {
        *path = poem_dir.join(format!("wrong-file-name-{position}.txt"));
    }

    paths
}

/// Write a placeholder poem so there is something to read.
#[instrument(err)]
pub async fn init_fixtures(poem_dir: &Path, count: usize) -> io::Result<()> {
    fs::create_dir_all(poem_dir)
        .await
        .tap_err(|err| error!(%err, ?poem_dir, "create poem dir failed"))?;

    let writes = stanza_paths(poem_dir, count)
        .into_iter()
        .enumerate()
        .map(|(index, path)| promisified_write_file(path, format!("stanza {}\n", index + 1)));

    future::try_join_all(writes).await?;

    info!(?poem_dir, count, "init fixtures done");

    Ok(())
}
