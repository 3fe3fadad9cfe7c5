/*
 * Defines the messages exchanged between the background copy worker and the
 * application logic, and the worker itself. The worker runs the clear and copy
 * steps on its own thread and reports each milestone over an `mpsc` channel;
 * the application logic drains the channel on its own thread, so no other
 * state is shared.
 */
use crate::core::file_copier::{CopyError, CopyReport, FileCopierOperations};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

#[derive(Debug)]
pub enum CopyProgress {
    TargetCleared { removed_entries: usize },
    Completed(CopyReport),
    Failed(CopyError),
}

impl CopyProgress {
    pub fn is_final(&self) -> bool {
        !matches!(self, CopyProgress::TargetCleared { .. })
    }
}

/*
 * Everything the worker needs, captured by value at confirmation time.
 */
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub source_path: PathBuf,
    pub target_directory: PathBuf,
}

/*
 * Spawns the copy worker and returns the receiving end of its progress channel.
 * The worker sends `TargetCleared` once the target is empty, then exactly one
 * final message. If the thread cannot be spawned, the failure is delivered
 * through the same channel.
 */
pub fn spawn_copy_worker(
    copier: Arc<dyn FileCopierOperations>,
    job: CopyJob,
) -> Receiver<CopyProgress> {
    let (tx, rx) = mpsc::channel();
    let failure_tx = tx.clone();

    let spawn_result = thread::Builder::new()
        .name("copy-worker".to_string())
        .spawn(move || {
            log::debug!("CopyWorker: Starting job {job:?}");
            let removed_entries = match copier.clear_target(&job.target_directory) {
                Ok(count) => count,
                Err(e) => {
                    let _ = tx.send(CopyProgress::Failed(e));
                    return;
                }
            };
            // The receiver may have gone away if the window closed; the copy still finishes.
            let _ = tx.send(CopyProgress::TargetCleared { removed_entries });

            let final_message =
                match copier.copy_into_target(&job.source_path, &job.target_directory) {
                    Ok(report) => CopyProgress::Completed(CopyReport {
                        removed_entries,
                        ..report
                    }),
                    Err(e) => CopyProgress::Failed(e),
                };
            let _ = tx.send(final_message);
            log::debug!("CopyWorker: Job finished.");
        });

    if let Err(e) = spawn_result {
        log::error!("CopyWorker: Failed to spawn worker thread: {e}");
        let _ = failure_tx.send(CopyProgress::Failed(CopyError::Io(e)));
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_copier::CoreFileCopier;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn collect_until_final(rx: &Receiver<CopyProgress>) -> Vec<CopyProgress> {
        let mut messages = Vec::new();
        loop {
            let msg = rx
                .recv_timeout(Duration::from_secs(10))
                .expect("worker should report within the timeout");
            let done = msg.is_final();
            messages.push(msg);
            if done {
                return messages;
            }
        }
    }

    #[test]
    fn test_worker_reports_cleared_then_completed() {
        // Arrange
        crate::initialize_logging();
        let source_dir = tempdir().unwrap();
        let target_dir = tempdir().unwrap();
        fs::write(source_dir.path().join("Alpha.txt"), "payload").unwrap();
        fs::write(target_dir.path().join("old.dat"), "stale").unwrap();
        let job = CopyJob {
            source_path: source_dir.path().join("Alpha.txt"),
            target_directory: target_dir.path().to_path_buf(),
        };

        // Act
        let rx = spawn_copy_worker(Arc::new(CoreFileCopier::new()), job);
        let messages = collect_until_final(&rx);

        // Assert
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            messages[0],
            CopyProgress::TargetCleared { removed_entries: 1 }
        ));
        match &messages[1] {
            CopyProgress::Completed(report) => {
                assert_eq!(report.removed_entries, 1);
                assert_eq!(report.target_path, target_dir.path().join("Alpha.txt"));
            }
            other => panic!("Expected Completed, got {other:?}"),
        }
        assert!(!target_dir.path().join("old.dat").exists());
    }

    #[test]
    fn test_worker_reports_failure_when_source_vanished() {
        let source_dir = tempdir().unwrap();
        let target_dir = tempdir().unwrap();
        let job = CopyJob {
            source_path: source_dir.path().join("vanished.txt"),
            target_directory: target_dir.path().to_path_buf(),
        };

        let rx = spawn_copy_worker(Arc::new(CoreFileCopier::new()), job);
        let messages = collect_until_final(&rx);

        assert!(matches!(
            messages.last(),
            Some(CopyProgress::Failed(CopyError::Copy { .. }))
        ));
    }
}
