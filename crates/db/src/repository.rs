//! Repository-Trait fuer Benutzer-Datenzugriffe
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. zettel-auth testet gegen In-Memory-Fakes,
//! der Server bindet die SQLite-Implementierung ein.

use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatenbankKonfig {
    /// Verbindungs-URL (z.B. "sqlite://zettel.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatenbankKonfig {
    fn default() -> Self {
        Self {
            url: "sqlite://zettel.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
///
/// Die Implementierung muss die Eindeutigkeit der E-Mail-Adresse
/// erzwingen (`DbError::Eindeutigkeit` bei Verletzung). Die Suche nach
/// E-Mail ist case-insensitiv; der gespeicherte Datensatz behaelt die
/// Schreibweise der Registrierung.
#[allow(async_fn_in_trait)]
pub trait BenutzerRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    async fn einfuegen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner E-Mail laden (case-insensitiv)
    async fn finden_nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner ID laden
    async fn finden_nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer aktualisieren (nur gesetzte Felder)
    async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord>;
}
