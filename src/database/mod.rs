pub mod captures;
pub mod connection;
pub mod setup;

pub use captures::UpsertOutcome;
pub use connection::{create_pool, get_connection, DbConn, DbPool};
