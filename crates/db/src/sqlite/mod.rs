//! SQLite-Implementierung des Benutzer-Repositories

mod pool;
mod users;

pub use pool::SqliteDb;
