//! Token-Store-Schnittstelle
//!
//! Abstrahiert den fluechtigen Cache, in dem die bidirektionalen
//! Sitzungs-Zuordnungen (email->token, token->email) liegen. Jeder
//! Schluessel traegt eine unabhaengige TTL.

use crate::error::CacheResult;

/// Fluechtiger Key-Value-Store mit per-Schluessel-TTL
///
/// Die Operationen bilden die externe Cache-Schnittstelle ab. `holen` und
/// `existiert` duerfen abgelaufene Schluessel nicht mehr zurueckgeben;
/// Verbindungsfehler propagieren als `CacheError::NichtErreichbar`.
#[allow(async_fn_in_trait)]
pub trait TokenStore: Send + Sync {
    /// Setzt einen Wert (ohne TTL; Ablauf wird separat gesetzt)
    async fn setzen(&self, schluessel: &str, wert: &str) -> CacheResult<()>;

    /// Liest einen Wert; `None` wenn der Schluessel fehlt oder abgelaufen ist
    async fn holen(&self, schluessel: &str) -> CacheResult<Option<String>>;

    /// Prueft ob ein Schluessel existiert (und nicht abgelaufen ist)
    async fn existiert(&self, schluessel: &str) -> CacheResult<bool>;

    /// Setzt die TTL eines Schluessels in Sekunden
    async fn ablauf_setzen(&self, schluessel: &str, ttl_sekunden: u64) -> CacheResult<()>;

    /// Loescht einen Schluessel; fehlende Schluessel sind kein Fehler
    async fn loeschen(&self, schluessel: &str) -> CacheResult<()>;
}
