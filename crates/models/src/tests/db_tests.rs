use std::time::Duration;

use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::db::{connect_in_memory, connect_options};

#[test]
fn connect_options_follow_config() {
    let cfg = DatabaseConfig {
        url: "postgres://localhost/project_core".into(),
        max_connections: 7,
        min_connections: 3,
        connect_timeout_secs: 5,
        acquire_timeout_secs: 9,
        ..Default::default()
    };
    let opt = connect_options(&cfg);
    assert_eq!(opt.get_url(), "postgres://localhost/project_core");
    assert_eq!(opt.get_max_connections(), Some(7));
    assert_eq!(opt.get_min_connections(), Some(3));
    assert_eq!(opt.get_connect_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(opt.get_acquire_timeout(), Some(Duration::from_secs(9)));
}

#[tokio::test]
async fn migrations_create_all_tables() -> Result<()> {
    let db = connect_in_memory().await?;
    assert_eq!(db.get_database_backend(), DatabaseBackend::Sqlite);

    for table in ["company", "company_member", "project", "project_member"] {
        let stmt = Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = '{table}'"),
        );
        let row = db.query_one(stmt).await?.expect("count row");
        let n: i32 = row.try_get("", "n")?;
        assert_eq!(n, 1, "missing table {table}");
    }
    Ok(())
}
