//! Zugriffs-Waechter fuer Zettel
//!
//! Entscheidet pro Request, ob ein Token den Zugriff auf die Ressourcen
//! eines Besitzers erlaubt: Besitzer-E-Mail aus dem Datensatz, Aufrufer-
//! E-Mail aus dem Token, Zugriff genau bei exakter Gleichheit. Ein
//! Nicht-Treffer ist ein legitimes "verboten" (`Ok(false)`), kein Fehler.

use std::sync::Arc;

use uuid::Uuid;

use zettel_cache::TokenStore;
use zettel_db::BenutzerRepository;

use crate::{
    error::{AuthError, AuthResult},
    service::AuthService,
};

/// Waechter fuer ressourcen-gebundene Zugriffe
pub struct ZugriffsWaechter<B: BenutzerRepository, S: TokenStore> {
    benutzer_repo: Arc<B>,
    auth: Arc<AuthService<B, S>>,
}

impl<B: BenutzerRepository, S: TokenStore> ZugriffsWaechter<B, S> {
    /// Erstellt einen neuen Waechter
    pub fn neu(benutzer_repo: Arc<B>, auth: Arc<AuthService<B, S>>) -> Self {
        Self { benutzer_repo, auth }
    }

    /// Prueft ob das Token Zugriff auf die Ressourcen des Besitzers erlaubt
    ///
    /// Fehlerarten bleiben unterscheidbar: `RessourceUnbekannt` wenn der
    /// Besitzer nicht existiert, `TokenUngueltig` wenn das Token unbekannt
    /// oder abgelaufen ist, Speicherfehler propagieren. `Ok(false)` heisst:
    /// gueltiges Token, aber fremde Ressource.
    pub async fn autorisieren(&self, besitzer_id: Uuid, token: &str) -> AuthResult<bool> {
        let besitzer = self
            .benutzer_repo
            .finden_nach_id(besitzer_id)
            .await?
            .ok_or_else(|| AuthError::RessourceUnbekannt(besitzer_id.to_string()))?;

        let aufrufer_email = self.auth.token_validieren(token).await?;

        // Exakter, case-sensitiver Vergleich der aufgeloesten E-Mails
        let erlaubt = besitzer.email == aufrufer_email;
        if !erlaubt {
            tracing::debug!(
                besitzer = %besitzer.email,
                aufrufer = %aufrufer_email,
                "Zugriff verweigert: Token gehoert zu anderer Identitaet"
            );
        }
        Ok(erlaubt)
    }
}
