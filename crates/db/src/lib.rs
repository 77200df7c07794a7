//! zettel-db – Benutzer-Datenhaltung
//!
//! Dieses Crate stellt das Repository-Pattern fuer Benutzer-Datensaetze
//! bereit. Die Geschaeftslogik (zettel-auth) arbeitet ausschliesslich gegen
//! den `BenutzerRepository`-Trait; die konkrete SQLite-Implementierung
//! haengt an einem explizit konstruierten Pool-Handle.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
pub use repository::{BenutzerRepository, DatenbankKonfig};
pub use sqlite::SqliteDb;
