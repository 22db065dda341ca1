//! Shared test doubles for driving workloads without a live server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mysql::Params;
use mysql_perf::error::BenchError;
use mysql_perf::executor::{ExecutorProvider, StatementExecutor};

/// Call record shared by every executor a provider hands out.
#[derive(Debug, Default)]
pub struct CallLog {
    pub statements: Mutex<Vec<String>>,
    pub commits: AtomicUsize,
    pub executed: AtomicUsize,
}

impl CallLog {
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn executed_count(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }
}

/// Scripted statement executor.
pub struct MockExecutor {
    log: Arc<CallLog>,
    /// Fail any statement containing this fragment; an empty fragment
    /// matches every statement.
    fail_on: Option<String>,
    /// Key range reported to point reads.
    bounds: Option<(u64, u64)>,
    /// Row count returned by fetches.
    rows: usize,
}

impl MockExecutor {
    fn run_stmt(&mut self, stmt: &str) -> Result<(), BenchError> {
        if let Some(fragment) = &self.fail_on {
            if stmt.contains(fragment.as_str()) {
                return Err(BenchError::Execution(format!(
                    "scripted failure on `{fragment}`"
                )));
            }
        }
        self.log.statements.lock().unwrap().push(stmt.to_string());
        self.log.executed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl StatementExecutor for MockExecutor {
    fn execute(&mut self, stmt: &str, _params: Params) -> Result<(), BenchError> {
        self.run_stmt(stmt)
    }

    fn execute_batch(&mut self, stmt: &str, _params: Vec<Params>) -> Result<(), BenchError> {
        self.run_stmt(stmt)
    }

    fn fetch(&mut self, stmt: &str, _params: Params) -> Result<usize, BenchError> {
        self.run_stmt(stmt)?;
        Ok(self.rows)
    }

    fn key_bounds(&mut self) -> Result<Option<(u64, u64)>, BenchError> {
        Ok(self.bounds)
    }

    fn commit(&mut self) -> Result<(), BenchError> {
        self.log.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider handing out scripted executors. Individual executor slots (in
/// creation order) can be made to fail every statement, to exercise partial
/// and total dispatch failure.
pub struct MockProvider {
    log: Arc<CallLog>,
    fail_on: Option<String>,
    bounds: Option<(u64, u64)>,
    rows: usize,
    created: AtomicUsize,
    failing_slots: Vec<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            log: Arc::default(),
            fail_on: None,
            bounds: Some((1, 1000)),
            rows: 1,
            created: AtomicUsize::new(0),
            failing_slots: Vec::new(),
        }
    }

    /// Fail every statement containing `fragment`.
    pub fn with_fail_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    /// Key range reported to point reads; `None` simulates an empty table.
    pub fn with_bounds(mut self, bounds: Option<(u64, u64)>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Executors at these creation indexes fail on every statement.
    pub fn with_failing_slots(mut self, slots: &[usize]) -> Self {
        self.failing_slots = slots.to_vec();
        self
    }

    pub fn log(&self) -> Arc<CallLog> {
        self.log.clone()
    }
}

impl ExecutorProvider for MockProvider {
    type Exec = MockExecutor;

    fn executor(&self) -> Result<MockExecutor, BenchError> {
        let slot = self.created.fetch_add(1, Ordering::SeqCst);
        let fail_on = if self.failing_slots.contains(&slot) {
            Some(String::new())
        } else {
            self.fail_on.clone()
        };
        Ok(MockExecutor {
            log: self.log.clone(),
            fail_on,
            bounds: self.bounds,
            rows: self.rows,
        })
    }
}
