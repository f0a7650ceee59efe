//! Ladder persistence: the whole snapshot as one JSON file.

use crate::models::Ladder;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Load a saved ladder. `Ok(None)` when the file does not exist yet.
pub async fn load_ladder(path: &Path) -> io::Result<Option<Ladder>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let ladder: Ladder = serde_json::from_slice(&bytes)?;
    log::info!(
        "Loaded ladder from {} ({} players, {} matches)",
        path.display(),
        ladder.players.len(),
        ladder.matches.len()
    );
    Ok(Some(ladder))
}

/// Write the ladder to `path`. Goes through a temporary file and a rename so a failed
/// write never leaves a truncated snapshot behind. Every call uses its own temporary
/// file, so overlapping saves to the same path never rename each other's data.
pub async fn save_ladder(path: &Path, ladder: &Ladder) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(ladder)?;
    let tmp = temp_path(path);
    if let Err(e) = write_and_rename(&tmp, path, &json).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    log::debug!("Saved ladder to {} ({} bytes)", path.display(), json.len());
    Ok(())
}

async fn write_and_rename(tmp: &Path, path: &Path, json: &[u8]) -> io::Result<()> {
    tokio::fs::write(tmp, json).await?;
    tokio::fs::rename(tmp, path).await
}

/// `<name>.<uuid>.tmp` next to `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    path.with_file_name(name)
}
