//! Fehlertypen fuer das Cache-Crate

use thiserror::Error;

/// Cache-Fehlertypen
///
/// Verbindungsfehler muessen als `NichtErreichbar` propagieren und duerfen
/// nie als "Schluessel fehlt" interpretiert werden.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache nicht erreichbar: {0}")]
    NichtErreichbar(String),

    #[error("Interner Cache-Fehler: {0}")]
    Intern(String),
}

impl CacheError {
    pub fn nicht_erreichbar(msg: impl Into<String>) -> Self {
        Self::NichtErreichbar(msg.into())
    }
}

/// Result-Alias fuer das Cache-Crate
pub type CacheResult<T> = Result<T, CacheError>;
