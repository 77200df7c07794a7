//! Datenbankmodelle fuer Zettel
//!
//! Diese Typen repraesentieren Benutzer-Datensaetze aus der Datenbank.
//! Passwort-Material liegt ausschliesslich als (Salt, Hash)-Paar vor,
//! niemals im Klartext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Benutzer-Datensatz aus der Datenbank
///
/// `fehlversuche` und `gesperrt` werden mitgefuehrt, aber derzeit von
/// keiner Logik inkrementiert oder geprueft (Konfigurations-Hook fuer
/// eine spaetere Sperr-Richtlinie).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub passwort_hash: String,
    pub salt: String,
    pub fehlversuche: i64,
    pub gesperrt: bool,
    pub erstellt_am: DateTime<Utc>,
    pub aktualisiert_am: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub passwort_hash: &'a str,
    pub salt: &'a str,
}

/// Daten zum Aktualisieren eines Benutzers
///
/// Nur gesetzte Felder werden geaendert (Passwortwechsel bzw.
/// Sperrstatus-Aenderung). Benutzer werden nie hart geloescht.
#[derive(Debug, Clone, Default)]
pub struct BenutzerUpdate {
    pub passwort_hash: Option<String>,
    pub salt: Option<String>,
    pub fehlversuche: Option<i64>,
    pub gesperrt: Option<bool>,
}
