//! MySQL target: pool construction, pre-flight checks, schema management.

use std::path::PathBuf;
use std::time::Duration;

use mysql::prelude::Queryable;
use mysql::{OptsBuilder, Params, Pool, PoolConstraints, PoolOpts, PooledConn, Row, SslOpts};
use tracing::debug;

use crate::error::BenchError;
use crate::executor::{ExecutorProvider, StatementExecutor};

/// Table the workloads write to and read from.
pub const TEST_TABLE: &str = "perf_test_writes";

/// Connection parameters for one benchmark target.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub pool_size: usize,
    pub connect_timeout: Duration,
    /// CA certificate path; enables TLS when set.
    pub ssl_ca: Option<PathBuf>,
}

/// Server identity reported by the connectivity check.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub version: String,
    pub database: Option<String>,
    pub user: String,
    pub ssl_cipher: Option<String>,
}

/// Pooled connection handle to one MySQL server.
pub struct MysqlTarget {
    pool: Pool,
}

impl MysqlTarget {
    pub fn connect(config: &TargetConfig) -> Result<Self, BenchError> {
        let constraints = PoolConstraints::new(1, config.pool_size)
            .ok_or(BenchError::InvalidParameter("pool_size"))?;

        let mut builder = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()))
            .tcp_connect_timeout(Some(config.connect_timeout))
            .pool_opts(PoolOpts::default().with_constraints(constraints));

        if let Some(ca) = &config.ssl_ca {
            builder = builder.ssl_opts(SslOpts::default().with_root_cert_path(Some(ca.clone())));
        }

        let pool = Pool::new(builder)?;
        debug!(host = %config.host, pool_size = config.pool_size, "connection pool initialized");
        Ok(Self { pool })
    }

    /// Verifies connectivity and reports server version, database, user, and
    /// the negotiated SSL cipher if any.
    pub fn server_info(&self) -> Result<ServerInfo, BenchError> {
        let mut conn = self.pool.get_conn()?;
        let (version, database, user): (String, Option<String>, String) = conn
            .query_first("SELECT VERSION(), DATABASE(), USER()")?
            .ok_or_else(|| BenchError::Execution("server identity query returned no row".into()))?;

        let cipher: Option<(String, String)> = conn.query_first("SHOW STATUS LIKE 'Ssl_cipher'")?;
        let ssl_cipher = cipher.and_then(|(_, value)| (!value.is_empty()).then_some(value));

        Ok(ServerInfo {
            version,
            database,
            user,
            ssl_cipher,
        })
    }

    /// Verifies CREATE/DROP and INSERT privileges with a throwaway table.
    pub fn check_permissions(&self) -> Result<(), BenchError> {
        let mut conn = self.pool.get_conn()?;
        conn.query_drop("DROP TABLE IF EXISTS permission_test")?;
        conn.query_drop("CREATE TABLE permission_test (id INT)")?;
        conn.query_drop("INSERT INTO permission_test VALUES (1)")?;
        conn.query_drop("DROP TABLE permission_test")?;
        conn.query_drop("COMMIT")?;
        Ok(())
    }

    /// Drops and recreates the test table in a known-clean state.
    pub fn create_test_table(&self) -> Result<(), BenchError> {
        let mut conn = self.pool.get_conn()?;
        conn.query_drop(format!("DROP TABLE IF EXISTS {TEST_TABLE}"))?;
        conn.query_drop(format!(
            "CREATE TABLE {TEST_TABLE} (
                 id INT AUTO_INCREMENT PRIMARY KEY,
                 test_data VARCHAR(255),
                 numeric_value INT,
                 timestamp_value TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                 INDEX idx_numeric (numeric_value),
                 INDEX idx_timestamp (timestamp_value)
             ) ENGINE=InnoDB"
        ))?;
        conn.query_drop("COMMIT")?;
        Ok(())
    }

    pub fn drop_test_table(&self) -> Result<(), BenchError> {
        let mut conn = self.pool.get_conn()?;
        conn.query_drop(format!("DROP TABLE IF EXISTS {TEST_TABLE}"))?;
        conn.query_drop("COMMIT")?;
        Ok(())
    }
}

impl ExecutorProvider for MysqlTarget {
    type Exec = MysqlExecutor;

    fn executor(&self) -> Result<MysqlExecutor, BenchError> {
        MysqlExecutor::new(self.pool.get_conn()?)
    }
}

/// `StatementExecutor` over a pooled connection with autocommit disabled.
pub struct MysqlExecutor {
    conn: PooledConn,
}

impl MysqlExecutor {
    fn new(mut conn: PooledConn) -> Result<Self, BenchError> {
        conn.query_drop("SET autocommit = 0")?;
        Ok(Self { conn })
    }
}

impl StatementExecutor for MysqlExecutor {
    fn execute(&mut self, stmt: &str, params: Params) -> Result<(), BenchError> {
        self.conn.exec_drop(stmt, params)?;
        Ok(())
    }

    fn execute_batch(&mut self, stmt: &str, params: Vec<Params>) -> Result<(), BenchError> {
        self.conn.exec_batch(stmt, params)?;
        Ok(())
    }

    fn fetch(&mut self, stmt: &str, params: Params) -> Result<usize, BenchError> {
        let rows: Vec<Row> = self.conn.exec(stmt, params)?;
        Ok(rows.len())
    }

    fn key_bounds(&mut self) -> Result<Option<(u64, u64)>, BenchError> {
        let stmt = format!("SELECT MIN(id), MAX(id) FROM {TEST_TABLE}");
        let row: Option<(Option<u64>, Option<u64>)> = self.conn.exec_first(stmt.as_str(), ())?;
        Ok(row.and_then(|(min, max)| min.zip(max)))
    }

    fn commit(&mut self) -> Result<(), BenchError> {
        self.conn.query_drop("COMMIT")?;
        Ok(())
    }
}
