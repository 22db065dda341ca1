//! The statement-execution seam between workload runners and the database.

use mysql::Params;

use crate::error::BenchError;

/// One logical connection with explicit commit control.
///
/// Runners time `execute`/`execute_batch`/`fetch` calls and nothing else, so
/// an implementation must not defer work behind them. An executor is never
/// shared between concurrently running workers.
pub trait StatementExecutor {
    /// Execute a parameterized write statement.
    fn execute(&mut self, stmt: &str, params: Params) -> Result<(), BenchError>;

    /// Execute the same statement once per parameter set in a single call.
    fn execute_batch(&mut self, stmt: &str, params: Vec<Params>) -> Result<(), BenchError>;

    /// Run a query and return the number of rows it produced.
    fn fetch(&mut self, stmt: &str, params: Params) -> Result<usize, BenchError>;

    /// Smallest and largest primary key in the test table, if any rows exist.
    fn key_bounds(&mut self) -> Result<Option<(u64, u64)>, BenchError>;

    /// Commit the open transaction.
    fn commit(&mut self) -> Result<(), BenchError>;
}

/// Source of fresh executors; each concurrent worker draws its own.
pub trait ExecutorProvider {
    type Exec: StatementExecutor;

    fn executor(&self) -> Result<Self::Exec, BenchError>;
}

impl<P: ExecutorProvider> ExecutorProvider for &P {
    type Exec = P::Exec;

    fn executor(&self) -> Result<Self::Exec, BenchError> {
        (**self).executor()
    }
}
