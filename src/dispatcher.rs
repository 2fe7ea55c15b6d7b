use crate::{
    config::Config,
    error::{Error, Result},
    progress::ProgressReporter,
    splitter::partition,
    writer::{PartitionReport, Writer},
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    sync::{mpsc, Arc},
};
use tracing::{debug, error};

/// Runs one writer task per partition on a fixed-size thread pool.
///
/// Tasks share the enumerated file list read-only and write to distinct
/// output files, so they need no coordination beyond reporting back. A failing
/// task never cancels its siblings; every task is awaited before a fault is
/// surfaced.
pub struct Dispatcher {
    pool: ThreadPool,
    writer: Arc<Writer>,
    show_progress: bool,
}

impl Dispatcher {
    /// Creates a dispatcher with one worker per available CPU.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be started.
    pub fn new(config: &Config) -> Result<Self> {
        let workers = num_cpus::get();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("concat-writer-{i}"))
            .build()?;

        debug!("Started writer pool with {} threads", workers);

        Ok(Self {
            pool,
            writer: Arc::new(Writer::new(config)),
            show_progress: config.show_progress,
        })
    }

    /// Returns the number of worker threads.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Splits `files` into `count` partitions and writes them concurrently.
    ///
    /// Reports come back in partition order. The output directory must
    /// already exist.
    ///
    /// # Errors
    ///
    /// Returns the first task fault, in completion order, once all tasks
    /// have finished.
    pub fn dispatch(&self, files: Vec<PathBuf>, count: usize) -> Result<Vec<PartitionReport>> {
        let files: Arc<[PathBuf]> = files.into();
        let parts = partition(files.len(), count);
        let progress = ProgressReporter::new(parts.len(), self.show_progress);
        let (tx, rx) = mpsc::channel();

        for part in parts {
            let tx = tx.clone();
            let files = Arc::clone(&files);
            let writer = Arc::clone(&self.writer);

            self.pool.spawn(move || {
                let ordinal = part.ordinal();
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    writer.write_partition(&part, &files)
                }))
                .unwrap_or_else(|payload| Err(Error::worker(ordinal, panic_message(&*payload))));

                // The receiver outlives every task; a failed send means the
                // dispatcher itself is gone and there is nobody to tell.
                let _ = tx.send((ordinal, result));
            });
        }
        drop(tx);

        let mut reports = Vec::with_capacity(count);
        let mut first_fault = None;
        let mut faults = 0;

        for (ordinal, result) in rx {
            progress.task_done();
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Part {} failed: {}", ordinal, e);
                    faults += 1;
                    first_fault.get_or_insert_with(|| into_worker_error(ordinal, e));
                }
            }
        }
        progress.finish();

        if let Some(fault) = first_fault {
            debug!("{} of {} writer tasks failed", faults, count);
            return Err(fault);
        }

        reports.sort_by_key(|r| r.partition);
        Ok(reports)
    }
}

fn into_worker_error(ordinal: usize, e: Error) -> Error {
    if e.is_worker() {
        e
    } else {
        Error::worker(ordinal, e.to_string())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "task panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::format::EntryFormatter;
    use assert_fs::prelude::*;
    use std::fs;
    use std::io::{self, Write};
    use std::path::Path;

    /// Writes text entries but panics when asked to format `poisoned`.
    struct PanickingFormatter {
        poisoned: PathBuf,
    }

    impl EntryFormatter for PanickingFormatter {
        fn write_entry(&self, out: &mut dyn Write, path: &Path, content: &str) -> io::Result<()> {
            if path == self.poisoned {
                panic!("refusing to format {}", path.display());
            }
            write!(out, "// File: {}\n{}\n\n", path.display(), content)
        }
    }

    fn create_test_config(root: &Path) -> Config {
        Config::builder()
            .root_dir(root)
            .output_dir(root.join("out"))
            .format(OutputFormat::Text)
            .show_progress(false)
            .build()
            .unwrap()
    }

    fn write_inputs(temp: &assert_fs::TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let child = temp.child(format!("in/f{i}.txt"));
                child.write_str(&format!("content {i}")).unwrap();
                child.path().to_path_buf()
            })
            .collect()
    }

    #[test]
    fn test_pool_matches_available_parallelism() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dispatcher = Dispatcher::new(&create_test_config(temp.path())).unwrap();

        assert_eq!(dispatcher.workers(), num_cpus::get());
    }

    #[test]
    fn test_dispatch_writes_every_partition() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("out").create_dir_all().unwrap();
        let files = write_inputs(&temp, 7);

        let dispatcher = Dispatcher::new(&create_test_config(temp.path())).unwrap();
        let reports = dispatcher.dispatch(files, 3).unwrap();

        let ordinals: Vec<_> = reports.iter().map(|r| r.partition).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);

        let written: Vec<_> = reports.iter().map(|r| r.written).collect();
        assert_eq!(written, vec![3, 3, 1]);

        let part3 = fs::read_to_string(temp.path().join("out/concatenated_part_3.txt")).unwrap();
        assert!(part3.contains("content 6"));
    }

    #[test]
    fn test_dispatch_more_partitions_than_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("out").create_dir_all().unwrap();
        let files = write_inputs(&temp, 2);

        let dispatcher = Dispatcher::new(&create_test_config(temp.path())).unwrap();
        let reports = dispatcher.dispatch(files, 5).unwrap();

        assert_eq!(reports.len(), 5);
        assert_eq!(reports.iter().map(|r| r.written).sum::<usize>(), 2);
        for i in 3..=5 {
            temp.child(format!("out/concatenated_part_{i}.txt")).assert("");
        }
    }

    #[test]
    fn test_fault_does_not_cancel_siblings() {
        let temp = assert_fs::TempDir::new().unwrap();
        // a directory squatting on part 2's output path makes that task fail
        temp.child("out/concatenated_part_2.txt")
            .create_dir_all()
            .unwrap();
        let files = write_inputs(&temp, 3);

        let dispatcher = Dispatcher::new(&create_test_config(temp.path())).unwrap();
        let err = dispatcher.dispatch(files, 3).unwrap_err();

        assert!(matches!(err, Error::Worker { partition: 2, .. }));

        let expected = format!(
            "// File: {}\ncontent 0\n\n",
            temp.path().join("in/f0.txt").display()
        );
        temp.child("out/concatenated_part_1.txt").assert(expected);
        assert!(temp.path().join("out/concatenated_part_3.txt").is_file());
    }

    #[test]
    fn test_panicking_task_becomes_worker_fault() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("out").create_dir_all().unwrap();
        let files = write_inputs(&temp, 3);

        let config = create_test_config(temp.path());
        let mut dispatcher = Dispatcher::new(&config).unwrap();
        let formatter = Arc::new(PanickingFormatter {
            poisoned: files[1].clone(),
        });
        dispatcher.writer = Arc::new(Writer::with_formatter(&config, formatter));

        let err = dispatcher.dispatch(files, 3).unwrap_err();

        match err {
            Error::Worker { partition, message } => {
                assert_eq!(partition, 2);
                assert!(message.contains("refusing to format"), "{message}");
            }
            other => panic!("expected a worker fault, got {other:?}"),
        }

        // siblings ran to completion
        for (ordinal, input) in [(1, 0), (3, 2)] {
            let expected = format!(
                "// File: {}\ncontent {input}\n\n",
                temp.path().join(format!("in/f{input}.txt")).display()
            );
            temp.child(format!("out/concatenated_part_{ordinal}.txt"))
                .assert(expected);
        }
    }

    #[test]
    fn test_missing_output_directory_is_worker_fault() {
        let temp = assert_fs::TempDir::new().unwrap();
        let files = write_inputs(&temp, 1);

        let dispatcher = Dispatcher::new(&create_test_config(temp.path())).unwrap();
        let err = dispatcher.dispatch(files, 2).unwrap_err();

        assert!(err.is_worker());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");

        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(&*payload), "task panicked");
    }
}
