use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::Duration;
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Check PostgreSQL health with `SELECT 1`.
///
/// Bounded by a short timeout so a hung pool cannot stall a readiness probe.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    tokio::time::timeout(HEALTH_CHECK_TIMEOUT, db.query_one_raw(stmt))
        .await
        .map_err(|_| DatabaseError::Timeout(HEALTH_CHECK_TIMEOUT))?
        .map_err(|e| {
            DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
        })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
