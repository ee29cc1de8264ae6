pub mod janitor;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

pub use janitor::Janitor;

pub const ARTIFACT_PREFIX: &str = "decisao-tts-";
pub const ARTIFACT_SUFFIX: &str = ".audio";
const AUDIO_FILE_NAME: &str = "audio.mp3";

lazy_static! {
    static ref ARTIFACT_NAME: Regex =
        Regex::new(r"^decisao-tts-[0-9a-f]{32}\.audio$").unwrap();
}

/// True for names produced by [`ScratchSpace::write_artifact`] and nothing else.
pub fn is_artifact_name(name: &str) -> bool {
    ARTIFACT_NAME.is_match(name)
}

type Leases = Arc<Mutex<HashSet<PathBuf>>>;

fn lock(leases: &Leases) -> MutexGuard<'_, HashSet<PathBuf>> {
    // The set is only ever inserted into or removed from; a poisoned lock
    // still holds a usable set.
    leases.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Directory shared by the audio generator and the janitor.
///
/// Each synthesis gets its own subdirectory. Live artifacts are leased so a
/// concurrent janitor pass never removes audio that is still being streamed.
#[derive(Clone)]
pub struct ScratchSpace {
    root: PathBuf,
    leases: Leases,
}

impl ScratchSpace {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            leases: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_leased(&self, path: &Path) -> bool {
        lock(&self.leases).contains(path)
    }

    /// Store `audio` in a fresh leased artifact.
    pub async fn write_artifact(&self, audio: &[u8]) -> Result<AudioArtifact, AppError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let name = format!("{}{}{}", ARTIFACT_PREFIX, Uuid::new_v4().simple(), ARTIFACT_SUFFIX);
        let dir = self.root.join(name);

        // Lease before the directory exists so a sweep can never see it unleased.
        lock(&self.leases).insert(dir.clone());
        let artifact = AudioArtifact {
            dir,
            leases: Arc::clone(&self.leases),
            detached: false,
        };

        tokio::fs::create_dir(&artifact.dir).await?;
        tokio::fs::write(artifact.audio_path(), audio).await?;

        tracing::debug!("Wrote {} bytes to {}", audio.len(), artifact.dir().display());
        Ok(artifact)
    }
}

/// A leased per-request directory holding one MP3 file.
///
/// Dropping the artifact releases the lease and removes the directory.
pub struct AudioArtifact {
    dir: PathBuf,
    leases: Leases,
    detached: bool,
}

impl AudioArtifact {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn audio_path(&self) -> PathBuf {
        self.dir.join(AUDIO_FILE_NAME)
    }

    /// Release the lease but leave the files on disk for the janitor.
    #[cfg(test)]
    pub fn detach(mut self) -> PathBuf {
        self.detached = true;
        self.dir.clone()
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if self.detached {
            lock(&self.leases).remove(&self.dir);
            return;
        }

        let dir = std::mem::take(&mut self.dir);
        let leases = Arc::clone(&self.leases);

        // Response bodies are dropped on runtime workers; keep the filesystem
        // work off them when a runtime is around.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_artifact_dir(dir, &leases));
            }
            Err(_) => remove_artifact_dir(dir, &leases),
        }
    }
}

/// The lease is held until the directory is gone.
fn remove_artifact_dir(dir: PathBuf, leases: &Leases) {
    if let Err(e) = std::fs::remove_dir_all(&dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {}", dir.display(), e);
        }
    }
    lock(leases).remove(&dir);
}
