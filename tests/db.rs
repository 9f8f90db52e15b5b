mod common;

use common::TempDb;
use migration::ContentMigrator;
use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, Statement, TransactionTrait};
use streamflix::db::connect_and_migrate;

async fn pragma<T: sea_orm::TryGetable>(txn: &DatabaseTransaction, name: &str) -> T {
    let row = txn
        .query_one(Statement::from_string(DbBackend::Sqlite, format!("PRAGMA {name}")))
        .await
        .unwrap()
        .unwrap();
    row.try_get_by_index(0).unwrap()
}

#[tokio::test]
async fn every_pooled_connection_gets_the_sqlite_settings() {
    let tmp = TempDb::new();
    let db = connect_and_migrate::<ContentMigrator>(&tmp.url(), 3).await.unwrap();

    // open transactions each hold their own connection
    let mut open = Vec::new();
    for _ in 0..3 {
        open.push(db.begin().await.unwrap());
    }

    for txn in &open {
        assert_eq!(pragma::<i64>(txn, "synchronous").await, 1);
        assert_eq!(pragma::<i64>(txn, "foreign_keys").await, 1);
        assert_eq!(pragma::<String>(txn, "journal_mode").await, "wal");
    }

    for txn in open {
        txn.rollback().await.unwrap();
    }
    db.close().await.unwrap();
}
