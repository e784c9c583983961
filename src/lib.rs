pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Error, Result};

use sqlx::SqlitePool;

use application::reports::ReportService;
use application::scheduling::SchedulingService;

/// Container wiring every service to one shared pool.
pub struct AppServices {
    pub scheduling: SchedulingService,
    pub reports: ReportService,
}

impl AppServices {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            // The pool is reference-counted internally, so cloning it is cheap.
            scheduling: SchedulingService::new(pool.clone()),
            reports: ReportService::new(pool),
        }
    }
}
