//! Parallel page fetches on a rayon pool

use crate::error::CliError;
use epvp_api::EpvpError;
use rayon::prelude::*;

/// Runs independent forum requests on a dedicated thread pool
pub struct Fetcher {
    thread_pool: rayon::ThreadPool,
}

impl Fetcher {
    pub fn new(thread_count: usize) -> Result<Self, CliError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|i| format!("epvp-fetch-{}", i))
            .build()
            .map_err(|e| CliError::ThreadPool(e.to_string()))?;
        Ok(Self { thread_pool })
    }

    /// Apply `fetch` to every key in parallel; results keep the input order
    pub fn fetch_all<K, T, F>(&self, keys: Vec<K>, fetch: F) -> Vec<(K, Result<T, EpvpError>)>
    where
        K: Send,
        T: Send,
        F: Fn(&K) -> Result<T, EpvpError> + Sync,
    {
        self.thread_pool.install(|| {
            keys.into_par_iter()
                .map(|key| {
                    let result = fetch(&key);
                    (key, result)
                })
                .collect()
        })
    }
}

/// Split fetched results into successes, reporting each failure on stderr
///
/// Fails with `CliError::Partial` when nothing but failures came back, so a
/// run with at least one result still prints it.
pub fn successes<K, T>(
    results: Vec<(K, Result<T, EpvpError>)>,
    describe: impl Fn(&K) -> String,
) -> Result<(Vec<T>, usize), CliError> {
    let total = results.len();
    let mut values = Vec::with_capacity(total);
    let mut failed = 0;

    for (key, result) in results {
        match result {
            Ok(value) => values.push(value),
            Err(e) => {
                failed += 1;
                log::warn!("{} failed: {}", describe(&key), e);
                eprintln!("{}: Error - {}", describe(&key), e);
            }
        }
    }

    if values.is_empty() && failed > 0 {
        return Err(CliError::Partial { failed, total });
    }
    Ok((values, failed))
}
