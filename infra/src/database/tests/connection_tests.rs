//! Unit tests for database connection pool

use crate::config::DatabaseConfig;
use crate::database::connection::{DatabasePool, PoolStatistics};

#[tokio::test]
async fn test_pool_creation_with_invalid_url() {
    let config = DatabaseConfig::new("invalid://url");

    let result = DatabasePool::new(&config).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_pool_health_check() {
    let config = DatabaseConfig::from_env().with_max_connections(2);

    let pool = DatabasePool::new(&config).await.unwrap();
    assert!(pool.health_check().await.unwrap());
}

#[test]
fn test_pool_statistics_display() {
    let stats = PoolStatistics {
        connections: 5,
        idle_connections: 3,
        max_connections: 10,
    };

    let display = format!("{}", stats);
    assert!(display.contains("5/10"));
    assert!(display.contains("3 idle"));
}
