use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory file lock serializing writers against one data directory.
///
/// Two concurrent `slate` invocations are two processes running
/// read-modify-write cycles over the same tasks.json; the lock makes them
/// take turns. Uses platform-native flock on Unix.
pub struct DirLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another slate process may be writing")]
    Timeout { path: PathBuf },
}

impl DirLock {
    /// Acquire an advisory lock on the data directory.
    /// Blocks up to `timeout` waiting for the lock.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<DirLock, LockError> {
        let lock_path = data_dir.join(".slate.lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + timeout;
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    return Ok(DirLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with default timeout (2 seconds)
    pub fn acquire_default(data_dir: &Path) -> Result<DirLock, LockError> {
        DirLock::acquire(data_dir, Duration::from_secs(2))
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        // flock releases with the file handle; the lock file itself is litter
        let _ = fs::remove_file(&self.path);
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    // No advisory locking off Unix; single-writer use is the common case
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_and_release() {
        let tmp = TempDir::new().unwrap();

        let lock = DirLock::acquire_default(tmp.path());
        assert!(lock.is_ok());
        drop(lock);

        // Released on drop, so a second acquire succeeds
        let again = DirLock::acquire_default(tmp.path());
        assert!(again.is_ok());
    }

    #[test]
    fn contended_acquire_times_out() {
        let tmp = TempDir::new().unwrap();

        let _held = DirLock::acquire_default(tmp.path()).unwrap();
        let second = DirLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(second.is_err());
    }
}
