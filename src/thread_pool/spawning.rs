use std::thread;

use super::ThreadPool;
use crate::Result;

/// Not a pool at all: every job gets a brand new OS thread that lives until
/// the job returns. This is the server's default and gives exactly one
/// thread per connection; the `threads` count passed to `new` is ignored.
pub struct SpawningThreadPool;

impl ThreadPool for SpawningThreadPool {
    fn new(_threads: u32) -> Result<SpawningThreadPool> {
        Ok(SpawningThreadPool)
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        thread::spawn(job);
    }
}
