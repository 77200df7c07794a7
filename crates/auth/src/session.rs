//! Session-Manager fuer Zettel
//!
//! Stellt kurzlebige Sitzungs-Tokens aus und verwaltet die bidirektionale
//! Zuordnung im Token-Store: `sitzung:email:{email}` -> Token und
//! `sitzung:token:{token}` -> E-Mail, beide mit eigener TTL. Der Store
//! wird als Handle injiziert; jede Store-Operation laeuft gegen ein
//! Zeitlimit, damit ein haengender Cache nie als "Token ungueltig"
//! fehlinterpretiert wird.

use std::{future::Future, sync::Arc, time::Duration};

use rand::RngCore;

use zettel_cache::{CacheResult, TokenStore};

use crate::error::{AuthError, AuthResult};

/// Parameter fuer den Session-Manager
#[derive(Debug, Clone)]
pub struct SessionKonfig {
    /// Token-Laenge in Bytes (hex-codiert also doppelt so viele Zeichen)
    pub token_laenge: usize,
    /// Sitzungs-Lebensdauer in Sekunden
    pub ttl_sekunden: u64,
    /// Zeitlimit pro Store-Operation
    pub zeitlimit: Duration,
}

impl Default for SessionKonfig {
    fn default() -> Self {
        Self {
            token_laenge: 32,
            ttl_sekunden: 3600,
            zeitlimit: Duration::from_secs(2),
        }
    }
}

/// Session-Manager – einzige Komponente, die den Token-Store mutiert
pub struct SessionManager<S: TokenStore> {
    store: Arc<S>,
    konfig: SessionKonfig,
}

impl<S: TokenStore> SessionManager<S> {
    /// Erstellt einen neuen SessionManager mit injiziertem Store-Handle
    pub fn neu(store: Arc<S>, konfig: SessionKonfig) -> Self {
        Self { store, konfig }
    }

    /// Stellt ein neues Token fuer die E-Mail aus
    ///
    /// Schreibt beide Richtungen und setzt anschliessend die TTL auf
    /// beiden Schluesseln. Ein zuvor ausgestelltes Token verwaist dabei:
    /// seine Rueckwaerts-Zuordnung bleibt bis zu ihrer eigenen TTL
    /// bestehen und validiert so lange weiter (bekanntes Zeitfenster,
    /// die beiden Schreibvorgaenge sind nicht atomar).
    pub async fn ausstellen(&self, email: &str) -> AuthResult<String> {
        let token = token_generieren(self.konfig.token_laenge);
        let email_key = email_schluessel(email);
        let token_key = token_schluessel(&token);

        self.mit_zeitlimit("setzen", self.store.setzen(&email_key, &token))
            .await?;
        self.mit_zeitlimit("setzen", self.store.setzen(&token_key, email))
            .await?;
        self.mit_zeitlimit(
            "ablauf_setzen",
            self.store.ablauf_setzen(&email_key, self.konfig.ttl_sekunden),
        )
        .await?;
        self.mit_zeitlimit(
            "ablauf_setzen",
            self.store.ablauf_setzen(&token_key, self.konfig.ttl_sekunden),
        )
        .await?;

        tracing::debug!(email = %email, ttl = self.konfig.ttl_sekunden, "Neues Sitzungs-Token ausgestellt");
        Ok(token)
    }

    /// Prueft ob ein Token existiert (und nicht abgelaufen ist)
    ///
    /// Verlaengert oder verbraucht die TTL nicht. Store-Fehler propagieren
    /// und werden nie zu `false` umgedeutet.
    pub async fn pruefen(&self, token: &str) -> AuthResult<bool> {
        self.mit_zeitlimit("existiert", self.store.existiert(&token_schluessel(token)))
            .await
    }

    /// Gibt die an ein Token gebundene E-Mail zurueck (Rueckwaerts-Zuordnung)
    pub async fn email_fuer_token(&self, token: &str) -> AuthResult<Option<String>> {
        self.mit_zeitlimit("holen", self.store.holen(&token_schluessel(token)))
            .await
    }

    /// Widerruft die aktuelle Sitzung einer E-Mail
    ///
    /// Loescht beide Richtungen. Ist keine Sitzung zugeordnet (bereits
    /// abgemeldet oder TTL abgelaufen), passiert nichts – Widerruf ist
    /// idempotent und nie ein Fehler.
    pub async fn widerrufen(&self, email: &str) -> AuthResult<()> {
        let email_key = email_schluessel(email);

        let token = self
            .mit_zeitlimit("holen", self.store.holen(&email_key))
            .await?;

        let Some(token) = token else {
            tracing::debug!(email = %email, "Widerruf ohne aktive Sitzung (No-Op)");
            return Ok(());
        };

        self.mit_zeitlimit("loeschen", self.store.loeschen(&token_schluessel(&token)))
            .await?;
        self.mit_zeitlimit("loeschen", self.store.loeschen(&email_key))
            .await?;

        tracing::debug!(email = %email, "Sitzung widerrufen");
        Ok(())
    }

    /// Fuehrt eine Store-Operation mit Zeitlimit aus
    async fn mit_zeitlimit<T>(
        &self,
        operation: &str,
        f: impl Future<Output = CacheResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.konfig.zeitlimit, f).await {
            Ok(ergebnis) => Ok(ergebnis?),
            Err(_) => Err(AuthError::Zeitlimit(format!(
                "Token-Store-Operation '{operation}' nach {:?} abgebrochen",
                self.konfig.zeitlimit
            ))),
        }
    }
}

fn email_schluessel(email: &str) -> String {
    format!("sitzung:email:{email}")
}

fn token_schluessel(token: &str) -> String {
    format!("sitzung:token:{token}")
}

/// Generiert ein kryptografisch zufaelliges Token (hex-codiert)
fn token_generieren(laenge: usize) -> String {
    let mut bytes = vec![0u8; laenge];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
