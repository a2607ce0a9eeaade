//! Query timing and pool gauges.

use std::time::Instant;

use metrics::{gauge, histogram};
use sqlx::PgPool;

/// Times one repository query and reports it as a histogram sample.
///
/// The clock starts at construction; call [`QueryTimer::record`] after the
/// query future resolves, on error paths included.
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    /// Reports the elapsed time under `db_query_duration_seconds`.
    pub fn record(self) {
        histogram!("db_query_duration_seconds", "query" => self.query)
            .record(self.started.elapsed().as_secs_f64());
    }
}

/// Publishes pool occupancy gauges. Driven by the pool metrics job.
pub fn record_pool_gauges(pool: &PgPool) {
    let size = pool.size() as f64;
    let idle = pool.num_idle() as f64;

    gauge!("db_pool_connections", "state" => "idle").set(idle);
    gauge!("db_pool_connections", "state" => "busy").set((size - idle).max(0.0));
}
