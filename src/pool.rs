// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A bounded-concurrency job runner.
//!
//! Each admitted job gets its own named thread.  Admission is guarded
//! by a bounded channel used as a counting semaphore: `submit` pushes
//! a token before spawning and blocks while the channel is full, and a
//! job pulls one token back out when it finishes, even if it panics.
//! Jobs share nothing with each other, so one failing job never
//! disturbs the rest.

use crate::error::{MandelError, Result};
use crossbeam::channel::{bounded, Receiver, Sender};
use std::cmp;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// The concurrency cap used when none is given.
pub const DEFAULT_JOBS: usize = 4;

/// The largest cap a pool accepts: four jobs per logical CPU, and
/// never fewer than `DEFAULT_JOBS`.
pub fn max_jobs() -> usize {
    cmp::max(DEFAULT_JOBS, num_cpus::get() * 4)
}

/// A job that did not complete successfully.
#[derive(Debug)]
pub struct JobFailure {
    /// The name the job was submitted under.
    pub name: String,
    /// Why it failed.
    pub error: MandelError,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}

/// What `wait_all` found once every job had finished.
#[derive(Debug, Default)]
pub struct PoolReport {
    /// Jobs that returned `Ok`.
    pub completed: usize,
    /// Jobs that returned an error or panicked.
    pub failures: Vec<JobFailure>,
}

impl PoolReport {
    /// True when no job failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// Held by a running job; dropping it frees the job's slot.
struct Permit {
    freed: Receiver<()>,
    active: Arc<AtomicUsize>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        let _ = self.freed.recv();
    }
}

// Consulted before each job thread is spawned; an error is treated
// exactly like a failed spawn.
type LaunchGate = Box<dyn FnMut(&str) -> io::Result<()> + Send>;

/// Runs at most `capacity` jobs at a time.
///
/// Dropping a pool waits for its outstanding jobs; failures nobody
/// collected with `wait_all` are logged at error level.
pub struct JobPool {
    capacity: usize,
    slots: Sender<()>,
    freed: Receiver<()>,
    active: Arc<AtomicUsize>,
    handles: Vec<(String, JoinHandle<Result<()>>)>,
    launch: LaunchGate,
}

impl JobPool {
    /// Builds a pool.  `max_concurrent` is clamped into `[1, max_jobs()]`.
    pub fn new(max_concurrent: usize) -> Self {
        JobPool::with_launch_gate(max_concurrent, Box::new(|_| Ok(())))
    }

    pub(crate) fn with_launch_gate(max_concurrent: usize, launch: LaunchGate) -> Self {
        let capacity = num::clamp(max_concurrent, 1, max_jobs());
        let (slots, freed) = bounded(capacity);
        JobPool {
            capacity,
            slots,
            freed,
            active: Arc::new(AtomicUsize::new(0)),
            handles: vec![],
            launch,
        }
    }

    /// The concurrency cap after clamping.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of jobs admitted and not yet finished.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of jobs submitted and not yet collected by `wait_all`.
    pub fn pending(&self) -> usize {
        self.handles.len()
    }

    /// Admits `job`, blocking while `capacity` jobs are already running.
    /// Once admitted the job runs on its own thread and `submit`
    /// returns immediately.  Fails with `ResourceExhaustion` if the
    /// thread could not be started; the slot is released in that case.
    pub fn submit<F>(&mut self, name: &str, job: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.slots
            .send(())
            .map_err(|_| MandelError::render("job pool admission channel closed"))?;
        self.active.fetch_add(1, Ordering::SeqCst);
        let permit = Permit {
            freed: self.freed.clone(),
            active: self.active.clone(),
        };
        debug!(job = name, active = self.active(), "admitted job");

        // On a failed spawn the closure is dropped unrun, and the
        // permit with it.
        let handle = (self.launch)(name)
            .and_then(|()| {
                thread::Builder::new().name(name.to_string()).spawn(move || {
                    let _permit = permit;
                    job()
                })
            })
            .map_err(|cause| MandelError::exhausted(format!("job {}", name), cause))?;
        self.handles.push((name.to_string(), handle));
        Ok(())
    }

    /// Blocks until every submitted job has finished and reports how
    /// they went.  The pool can be reused afterwards.
    pub fn wait_all(&mut self) -> PoolReport {
        let mut report = PoolReport::default();
        for (name, handle) in self.handles.drain(..) {
            match handle.join() {
                Ok(Ok(())) => report.completed += 1,
                Ok(Err(error)) => report.failures.push(JobFailure { name, error }),
                Err(_) => report.failures.push(JobFailure {
                    name,
                    error: MandelError::render("job panicked"),
                }),
            }
        }
        report
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            for failure in self.wait_all().failures {
                error!("uncollected job {} failed: {}", failure.name, failure.error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(JobPool::new(0).capacity(), 1);
        assert_eq!(JobPool::new(3).capacity(), 3);
        assert_eq!(JobPool::new(usize::MAX).capacity(), max_jobs());
        assert!(max_jobs() >= DEFAULT_JOBS);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut pool = JobPool::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        for i in 0..24 {
            let running = running.clone();
            let peak = peak.clone();
            pool.submit(&format!("job-{}", i), move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5 + (i % 4) as u64 * 3));
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
            assert!(pool.active() <= 3);
        }
        let report = pool.wait_all();
        assert_eq!(report.completed, 24);
        assert!(report.is_success());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(pool.active(), 0);
    }

    #[test]
    fn failures_do_not_stop_siblings() {
        let mut pool = JobPool::new(2);
        let done = Arc::new(Mutex::new(vec![]));
        for i in 0..6 {
            let done = done.clone();
            pool.submit(&format!("job-{}", i), move || {
                if i == 1 {
                    return Err(MandelError::render("bad frame"));
                }
                if i == 4 {
                    panic!("worker blew up");
                }
                done.lock().unwrap().push(i);
                Ok(())
            })
            .unwrap();
        }
        let report = pool.wait_all();
        assert_eq!(report.completed, 4);
        let mut names: Vec<_> = report.failures.iter().map(|f| f.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["job-1", "job-4"]);
        let mut done = done.lock().unwrap().clone();
        done.sort();
        assert_eq!(done, vec![0, 2, 3, 5]);
    }

    #[test]
    fn panicking_job_frees_its_slot() {
        let mut pool = JobPool::new(1);
        pool.submit("boom", || panic!("boom")).unwrap();
        pool.submit("after", || Ok(())).unwrap();
        let report = pool.wait_all();
        assert_eq!(report.completed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].to_string().starts_with("boom: render failed"));
    }

    #[test]
    fn wait_all_on_an_empty_pool_returns_immediately() {
        let mut pool = JobPool::new(2);
        let report = pool.wait_all();
        assert_eq!(report.completed, 0);
        assert!(report.is_success());
    }

    #[test]
    fn refused_launch_releases_the_slot() {
        let gate: LaunchGate = Box::new(|name: &str| {
            if name == "job-3" {
                Err(io::Error::new(io::ErrorKind::Other, "no more threads"))
            } else {
                Ok(())
            }
        });
        let mut pool = JobPool::with_launch_gate(2, gate);
        let mut refused = vec![];
        for i in 0..6 {
            match pool.submit(&format!("job-{}", i), || Ok(())) {
                Ok(()) => {}
                Err(MandelError::ResourceExhaustion { what, .. }) => refused.push(what),
                Err(e) => panic!("unexpected error {}", e),
            }
        }
        assert_eq!(refused, vec!["job job-3"]);
        assert_eq!(pool.pending(), 5);
        let report = pool.wait_all();
        assert_eq!(report.completed, 5);
        assert_eq!(pool.pending(), 0);
        assert_eq!(pool.active(), 0);
        assert!(pool.slots.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dropping_the_pool_logs_uncollected_failures() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let ran = Arc::new(AtomicUsize::new(0));
        tracing::subscriber::with_default(subscriber, || {
            let mut pool = JobPool::new(2);
            let counter = ran.clone();
            pool.submit("frame_07.png", || Err(MandelError::render("bad frame"))).unwrap();
            pool.submit("fine", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        });
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("uncollected job frame_07.png failed"), "{}", log);
        assert!(log.contains("bad frame"));
    }
}
