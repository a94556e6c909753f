use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Metrics {
    completion_requests: AtomicU64,
    completion_failures: AtomicU64,
    tasks_created: AtomicU64,
    tasks_completed: AtomicU64,
    rounds: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_completion_requests(&self) {
        self.completion_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_completion_failures(&self) {
        self.completion_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tasks_created(&self, count: usize) {
        self.tasks_created.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn inc_tasks_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rounds(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            completion_requests: self.completion_requests.load(Ordering::Relaxed),
            completion_failures: self.completion_failures.load(Ordering::Relaxed),
            tasks_created: self.tasks_created.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            rounds: self.rounds.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub completion_requests: u64,
    pub completion_failures: u64,
    pub tasks_created: u64,
    pub tasks_completed: u64,
    pub rounds: u64,
}

impl MetricsSnapshot {
    pub fn completion_success_rate(&self) -> f64 {
        if self.completion_requests == 0 {
            return 1.0;
        }
        1.0 - (self.completion_failures as f64 / self.completion_requests as f64)
    }
}
