//! In-Memory-Implementierung des Token-Stores
//!
//! Haelt die Eintraege in einer HashMap mit absoluten Ablauf-Zeitpunkten.
//! Abgelaufene Schluessel werden beim Lesen ausgefiltert; ein
//! Hintergrund-Task raeumt sie zusaetzlich periodisch weg.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::CacheResult;
use crate::store::TokenStore;

/// Intervall fuer den automatischen Cleanup-Task: 5 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(5 * 60);

/// Ein Cache-Eintrag mit optionalem Ablauf-Zeitpunkt
#[derive(Debug, Clone)]
struct Eintrag {
    wert: String,
    /// `None` = kein Ablauf gesetzt
    laeuft_ab: Option<Instant>,
}

impl Eintrag {
    fn ist_abgelaufen(&self, jetzt: Instant) -> bool {
        matches!(self.laeuft_ab, Some(ablauf) if ablauf <= jetzt)
    }
}

/// In-Memory Key-Value-Cache mit per-Schluessel-TTL
#[derive(Debug, Default)]
pub struct MemoryCache {
    eintraege: RwLock<HashMap<String, Eintrag>>,
}

impl MemoryCache {
    /// Erstellt einen neuen leeren Cache
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Erstellt einen neuen Cache und startet den Cleanup-Task
    pub fn neu_mit_cleanup() -> Arc<Self> {
        let cache = Self::neu();
        let cache_klon = Arc::clone(&cache);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = cache_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Cache-Eintraege bereinigt");
                }
            }
        });
        cache
    }

    /// Bereinigt abgelaufene Eintraege und gibt die Anzahl zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Instant::now();
        let mut eintraege = self.eintraege.write().await;
        let vorher = eintraege.len();
        eintraege.retain(|_, e| !e.ist_abgelaufen(jetzt));
        vorher - eintraege.len()
    }

    /// Gibt die Anzahl der nicht abgelaufenen Eintraege zurueck
    pub async fn anzahl(&self) -> usize {
        let jetzt = Instant::now();
        let eintraege = self.eintraege.read().await;
        eintraege.values().filter(|e| !e.ist_abgelaufen(jetzt)).count()
    }
}

impl TokenStore for MemoryCache {
    async fn setzen(&self, schluessel: &str, wert: &str) -> CacheResult<()> {
        let mut eintraege = self.eintraege.write().await;
        eintraege.insert(
            schluessel.to_string(),
            Eintrag {
                wert: wert.to_string(),
                laeuft_ab: None,
            },
        );
        Ok(())
    }

    async fn holen(&self, schluessel: &str) -> CacheResult<Option<String>> {
        let jetzt = Instant::now();
        let eintraege = self.eintraege.read().await;
        Ok(eintraege
            .get(schluessel)
            .filter(|e| !e.ist_abgelaufen(jetzt))
            .map(|e| e.wert.clone()))
    }

    async fn existiert(&self, schluessel: &str) -> CacheResult<bool> {
        let jetzt = Instant::now();
        let eintraege = self.eintraege.read().await;
        Ok(eintraege
            .get(schluessel)
            .is_some_and(|e| !e.ist_abgelaufen(jetzt)))
    }

    async fn ablauf_setzen(&self, schluessel: &str, ttl_sekunden: u64) -> CacheResult<()> {
        let mut eintraege = self.eintraege.write().await;
        if let Some(eintrag) = eintraege.get_mut(schluessel) {
            eintrag.laeuft_ab = Some(Instant::now() + Duration::from_secs(ttl_sekunden));
        }
        Ok(())
    }

    async fn loeschen(&self, schluessel: &str) -> CacheResult<()> {
        let mut eintraege = self.eintraege.write().await;
        eintraege.remove(schluessel);
        Ok(())
    }
}
