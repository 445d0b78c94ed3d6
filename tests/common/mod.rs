use std::sync::Arc;

use sea_orm::{DatabaseConnection, Transaction};

/// Statements recorded by a mock connection. Every clone of the state that
/// shared it must be dropped first.
pub fn transaction_log(orm: Arc<DatabaseConnection>) -> Vec<Transaction> {
    match Arc::try_unwrap(orm) {
        Ok(orm) => orm.into_transaction_log(),
        Err(_) => panic!("mock connection is still shared"),
    }
}
