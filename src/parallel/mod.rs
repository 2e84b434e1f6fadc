//! Size-adaptive parallel execution of per-pixel grid operations.
//!
//! [`crossover`] holds the thresholds and the pure routing decision,
//! [`pool`] wraps the Rayon worker pool and the row-strip partitioning, and
//! [`executor`] ties both to the serial kernels.
pub mod crossover;
pub mod executor;
pub mod pool;

pub use self::crossover::{dispatch, Crossover, CrossoverTable, GridOp, Route};
pub use self::executor::GridExecutor;
pub use self::pool::{strip_partition, strip_rows, PoolError, WorkerPool};
