//! Fehlertypen fuer den Auth-Kern
//!
//! Geschlossener Satz getaggter Varianten, damit Aufrufer auf die Art
//! verzweigen koennen statt auf Fehlertexte. Speicherfehler (Datenbank,
//! Cache, Zeitlimit) propagieren immer und werden nie zu "ungueltig"
//! umgedeutet.

use thiserror::Error;

use zettel_cache::CacheError;
use zettel_db::DbError;

/// Alle moeglichen Fehler im Auth-Kern
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Eingabe-Validierung (vor jedem I/O) ---
    #[error("Pflichtfeld fehlt: {0}")]
    FeldFehlt(String),

    // --- Authentifizierung ---
    /// Bewusst nicht unterscheidbar zwischen unbekannter E-Mail und
    /// falschem Passwort.
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Token ungueltig oder abgelaufen")]
    TokenUngueltig,

    // --- Registrierung ---
    #[error("E-Mail bereits vergeben: {0}")]
    EmailVergeben(String),

    // --- Autorisierung ---
    #[error("Ressource unbekannt: {0}")]
    RessourceUnbekannt(String),

    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Speicher (Datenbank / Cache) ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] DbError),

    #[error("Cache-Fehler: {0}")]
    Cache(#[from] CacheError),

    #[error("Zeitlimit ueberschritten: {0}")]
    Zeitlimit(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler einen nicht erreichbaren Speicher
    /// anzeigt (einzige Art, bei der ein Retry mit Backoff sinnvoll ist)
    pub fn ist_speicher_fehler(&self) -> bool {
        matches!(
            self,
            Self::Datenbank(_) | Self::Cache(_) | Self::Zeitlimit(_)
        )
    }

    /// HTTP-Status fuer die Routing-Schicht
    pub fn http_status(&self) -> u16 {
        match self {
            Self::FeldFehlt(_) => 400,
            Self::UngueltigeAnmeldedaten | Self::TokenUngueltig => 401,
            Self::RessourceUnbekannt(_) => 404,
            Self::EmailVergeben(_) => 409,
            Self::Datenbank(_) | Self::Cache(_) | Self::Zeitlimit(_) => 503,
            Self::PasswortHashing(_) | Self::Intern(_) => 500,
        }
    }
}

/// Result-Alias fuer den Auth-Kern
pub type AuthResult<T> = Result<T, AuthError>;
