use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use super::{is_artifact_name, ScratchSpace};

/// Artifacts older than this are considered abandoned.
pub const MAX_ARTIFACT_AGE: Duration = Duration::from_secs(3600);

/// Removes abandoned audio artifacts from the scratch space.
///
/// A pass is a single sweep; scheduling repeated passes is up to the caller
/// (`/cleanup`, an external cron, or [`Janitor::spawn_periodic`]).
#[derive(Clone)]
pub struct Janitor {
    scratch: ScratchSpace,
    max_age: Duration,
}

impl Janitor {
    pub fn new(scratch: ScratchSpace) -> Self {
        Self {
            scratch,
            max_age: MAX_ARTIFACT_AGE,
        }
    }

    #[cfg(test)]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn sweep(&self) -> io::Result<usize> {
        self.sweep_at(SystemTime::now())
    }

    /// Run one pass treating `now` as the current time. Returns how many
    /// artifacts were removed.
    pub fn sweep_at(&self, now: SystemTime) -> io::Result<usize> {
        let entries = match fs::read_dir(self.scratch.root()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable scratch entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name();
            if !name.to_str().map(is_artifact_name).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if self.scratch.is_leased(&path) {
                continue;
            }

            match self.remove_if_stale(&path, now) {
                Ok(true) => {
                    tracing::info!("Removed stale artifact {}", path.display());
                    removed += 1;
                }
                Ok(false) => {}
                Err(e) => tracing::debug!("Skipping {}: {}", path.display(), e),
            }
        }

        Ok(removed)
    }

    fn remove_if_stale(&self, path: &Path, now: SystemTime) -> io::Result<bool> {
        let metadata = fs::symlink_metadata(path)?;
        if !is_stale(artifact_timestamp(&metadata)?, now, self.max_age) {
            return Ok(false);
        }

        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }

        Ok(true)
    }

    /// Run a pass every `every` on the tokio runtime until the process exits.
    pub fn spawn_periodic(self, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let janitor = self.clone();
                match tokio::task::spawn_blocking(move || janitor.sweep()).await {
                    Ok(Ok(count)) => tracing::info!("Periodic cleanup removed {} artifact(s)", count),
                    Ok(Err(e)) => tracing::error!("Periodic cleanup failed: {}", e),
                    Err(e) => tracing::error!("Periodic cleanup task panicked: {}", e),
                }
            }
        })
    }
}

/// Creation time, or modification time on filesystems without birth times.
pub fn artifact_timestamp(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata.created().or_else(|_| metadata.modified())
}

/// Strictly older than `max_age`. Timestamps in the future are never stale.
pub fn is_stale(timestamp: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    now.duration_since(timestamp)
        .map(|age| age > max_age)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_in(root: &Path) -> ScratchSpace {
        ScratchSpace::new(root.to_path_buf())
    }

    async fn abandoned_artifact(scratch: &ScratchSpace) -> (PathBuf, SystemTime) {
        let dir = scratch.write_artifact(b"ID3").await.unwrap().detach();
        let created = artifact_timestamp(&fs::symlink_metadata(&dir).unwrap()).unwrap();
        (dir, created)
    }

    #[test]
    fn test_is_stale_boundary() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        assert!(!is_stale(t, t + Duration::from_secs(3599), MAX_ARTIFACT_AGE));
        assert!(!is_stale(t, t + Duration::from_secs(3600), MAX_ARTIFACT_AGE));
        assert!(is_stale(t, t + Duration::from_secs(3601), MAX_ARTIFACT_AGE));
        assert!(!is_stale(t + Duration::from_secs(10), t, MAX_ARTIFACT_AGE));
    }

    #[tokio::test]
    async fn test_sweep_respects_age_threshold() {
        let root = tempfile::tempdir().unwrap();
        let scratch = scratch_in(root.path());
        let janitor = Janitor::new(scratch.clone());
        let (dir, created) = abandoned_artifact(&scratch).await;

        assert_eq!(janitor.sweep_at(created + Duration::from_secs(3599)).unwrap(), 0);
        assert!(dir.exists());

        assert_eq!(janitor.sweep_at(created + Duration::from_secs(3601)).unwrap(), 1);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let scratch = scratch_in(root.path());
        let janitor = Janitor::new(scratch.clone());
        let (_, first) = abandoned_artifact(&scratch).await;
        let (_, second) = abandoned_artifact(&scratch).await;

        let later = first.max(second) + Duration::from_secs(7200);
        assert_eq!(janitor.sweep_at(later).unwrap(), 2);
        assert_eq!(janitor.sweep_at(later).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_skips_leased_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let scratch = scratch_in(root.path());
        let janitor = Janitor::new(scratch.clone());

        let live = scratch.write_artifact(b"ID3").await.unwrap();
        let far_future = SystemTime::now() + Duration::from_secs(10 * 3600);

        assert_eq!(janitor.sweep_at(far_future).unwrap(), 0);
        assert!(live.audio_path().exists());
    }

    #[test]
    fn test_sweep_ignores_foreign_files() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("tmpabc123.mp3"), b"other program").unwrap();
        fs::write(root.path().join("notes.txt"), b"keep").unwrap();
        fs::create_dir(root.path().join("decisao-tts-xyz.audio")).unwrap();

        let janitor = Janitor::new(scratch_in(root.path()));
        let far_future = SystemTime::now() + Duration::from_secs(10 * 3600);

        assert_eq!(janitor.sweep_at(far_future).unwrap(), 0);
        assert!(root.path().join("tmpabc123.mp3").exists());
        assert!(root.path().join("notes.txt").exists());
        assert!(root.path().join("decisao-tts-xyz.audio").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_sweep_removes_abandoned_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let scratch = scratch_in(root.path());
        let (dir, _) = abandoned_artifact(&scratch).await;
        let live = scratch.write_artifact(b"ID3").await.unwrap();

        // Wall-clock age must exceed the threshold; tokio's paused clock does
        // not move SystemTime.
        std::thread::sleep(Duration::from_millis(20));

        let every = Duration::from_secs(600);
        let handle = Janitor::new(scratch.clone())
            .with_max_age(Duration::from_millis(1))
            .spawn_periodic(every);

        for _ in 0..200 {
            if !dir.exists() {
                break;
            }
            tokio::time::sleep(every).await;
            std::thread::sleep(Duration::from_millis(5));
        }
        handle.abort();

        assert!(!dir.exists());
        assert!(live.audio_path().exists());
    }

    #[test]
    fn test_sweep_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let janitor = Janitor::new(scratch_in(&root.path().join("absent")));
        assert_eq!(janitor.sweep().unwrap(), 0);
    }

    #[test]
    fn test_sweep_root_is_not_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("plain-file");
        fs::write(&file, b"").unwrap();

        let janitor = Janitor::new(scratch_in(&file));
        assert!(janitor.sweep().is_err());
    }
}
