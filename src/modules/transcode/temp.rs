use super::model::WorkUnit;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Temporary files owned by one request.
///
/// Every path handed out by [`TempScope::allocate`] is removed by
/// [`TempScope::release`]. Paths still tracked when the scope is dropped
/// (cancelled request, panic) are removed synchronously.
#[derive(Debug)]
pub struct TempScope {
    work_unit: WorkUnit,
    dir: PathBuf,
    allocated: Vec<PathBuf>,
}

impl TempScope {
    pub fn acquire(dir: impl Into<PathBuf>) -> Self {
        Self::for_work_unit(dir, WorkUnit::new())
    }

    pub fn for_work_unit(dir: impl Into<PathBuf>, work_unit: WorkUnit) -> Self {
        Self {
            work_unit,
            dir: dir.into(),
            allocated: Vec::new(),
        }
    }

    pub fn work_unit(&self) -> WorkUnit {
        self.work_unit
    }

    /// Reserves `<dir>/<work-unit>-<role>.<extension>`. Nothing is created on disk.
    pub fn allocate(&mut self, role: &str, extension: &str) -> PathBuf {
        let path = self.dir.join(format!("{}-{}.{}", self.work_unit, role, extension));
        if !self.allocated.contains(&path) {
            self.allocated.push(path.clone());
        }
        path
    }

    /// Removes every allocated path. Missing files are fine; other removal
    /// failures are logged and swallowed. Returns how many files were deleted.
    pub async fn release(mut self) -> usize {
        let paths = std::mem::take(&mut self.allocated);
        let mut removed = 0;

        for path in &paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(work_unit = %self.work_unit, path = %path.display(), "failed to remove temp file: {}", e),
            }
        }

        debug!(work_unit = %self.work_unit, removed, "temp files released");
        removed
    }
}

fn remove_quietly(work_unit: WorkUnit, path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!(%work_unit, path = %path.display(), "failed to remove temp file on drop: {}", e);
        }
    }
}

impl Drop for TempScope {
    fn drop(&mut self) {
        for path in self.allocated.drain(..) {
            remove_quietly(self.work_unit, &path);
        }
    }
}
