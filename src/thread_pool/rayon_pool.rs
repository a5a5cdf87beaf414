use tracing::debug;

use super::ThreadPool;
use crate::error::{KvError, Result};

/// A thread pool that uses the work stealing scheduler of the [`rayon`]
/// library.
///
/// [`rayon`]: https://docs.rs/rayon/latest/rayon/index.html
pub struct RayonThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {
    fn new(threads: u32) -> Result<RayonThreadPool> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build()
            .map_err(|e| KvError::ThreadPool(format!("could not build rayon pool: {}", e)))?;
        debug!("created rayon pool with {} threads", threads);

        Ok(RayonThreadPool { pool })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // `install` would block the calling thread until the job finishes
        self.pool.spawn(job);
    }
}
