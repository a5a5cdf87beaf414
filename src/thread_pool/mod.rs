//! Thread pools that run one connection-handling job per accepted
//! connection. The server is generic over [`ThreadPool`], so the dispatch
//! model can be swapped between spawn-per-connection and the two bounded
//! pools without touching the server itself.

use crate::Result;

/// A pool of threads that run connection-handling jobs.
pub trait ThreadPool {
    /// Creates a pool with the given number of `threads`.
    ///
    /// # Errors
    /// returns an error if a worker thread could not be created
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Runs `job` on a thread in the pool.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod rayon_pool;
mod shared_queue;
mod spawning;

pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
pub use self::spawning::SpawningThreadPool;
