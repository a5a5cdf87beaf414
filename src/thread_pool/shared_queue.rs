use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error};

use super::ThreadPool;
use crate::Result;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads fed from a shared job queue.
///
/// The queue is the MPMC [`channel`] from the crossbeam crate, used here
/// with a single producer (the pool handle) and the workers as consumers. A
/// worker that panics while running a job is replaced, so the pool keeps its
/// thread count across panicking jobs.
///
/// Note that a connection occupies its worker until the client disconnects;
/// with `n` threads at most `n` connections are served at once and further
/// ones wait in the queue.
///
/// [`channel`]: https://docs.rs/crossbeam/0.8.1/crossbeam/channel/index.html
pub struct SharedQueueThreadPool {
    /// the sending half of the job channel
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<SharedQueueThreadPool> {
        let (tx, rx) = channel::unbounded::<Job>();
        for _ in 0..threads {
            let worker = Worker(rx.clone());
            thread::Builder::new().spawn(move || run_jobs(worker))?;
        }
        Ok(SharedQueueThreadPool { tx })
    }

    /// # Panics
    ///
    /// panics if every worker thread has died and could not be replaced
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .expect("no worker threads left in the pool");
    }
}

// The receiving half owned by one worker thread. Dropping it while the
// thread is unwinding from a panicked job spawns a replacement worker.
#[derive(Clone)]
struct Worker(Receiver<Job>);

impl Drop for Worker {
    fn drop(&mut self) {
        if thread::panicking() {
            debug!("worker panicked, spawning a replacement");
            let worker = self.clone();
            if let Err(e) = thread::Builder::new().spawn(move || run_jobs(worker)) {
                error!("failed to spawn replacement worker: {}", e);
            }
        }
    }
}

// waits for jobs on the shared channel and runs them, until the pool handle
// is dropped and the channel disconnects
fn run_jobs(worker: Worker) {
    loop {
        match worker.0.recv() {
            Ok(job) => job(),
            Err(_) => {
                debug!("worker exiting, the pool was dropped");
                break;
            }
        }
    }
}
