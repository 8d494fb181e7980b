//! Evaluating many sessions against one shared table.

use crate::errors::Result;
use crate::output::ODashboard;
use crate::queries::{self, Query};
use crate::selection::Selection;
use crate::table::Table;
use log::trace;
use std::thread;

type JobResult = std::result::Result<ODashboard, String>;

/// Computes one dashboard per selection, using one worker per CPU.
///
/// Each selection belongs to its own session; workers only share the read-only table.
/// Results are in the same order as `selections`.
pub fn compute_parallel(
    table: &Table,
    selections: &[Selection],
    charts: &[Query],
) -> Result<Vec<ODashboard>> {
    let (s1, r1) = crossbeam_channel::unbounded();
    for job in 0..selections.len() {
        s1.send(job)?;
    }
    drop(s1);
    let nthreads = num_cpus::get().clamp(1, selections.len().max(1));
    trace!(target: "bookings", "{} sessions, {nthreads} threads", selections.len());
    let results: Vec<Option<JobResult>> = thread::scope(|scope| {
        let (s2, r2) = crossbeam_channel::unbounded();
        for _ in 0..nthreads {
            let r1 = r1.clone();
            let s2 = s2.clone();
            scope.spawn(move || {
                while let Ok(job) = r1.recv() {
                    let result = queries::dashboard_with(table, &selections[job], charts)
                        .map_err(|e| e.to_string());
                    if s2.send((job, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(s2);
        let mut results = vec![None; selections.len()];
        while let Ok((job, result)) = r2.recv() {
            results[job] = Some(result);
        }
        results
    });
    results
        .into_iter()
        .enumerate()
        .map(|(job, result)| match result {
            Some(Ok(dashboard)) => Ok(dashboard),
            Some(Err(e)) => Err(e.into()),
            None => Err(format!("session {job} was not evaluated").into()),
        })
        .collect()
}
