//! Auth-Service fuer Zettel
//!
//! Orchestriert Registrierung, Login, Logout und Token-Validierung ueber
//! Benutzer-Repository, Passwort-Ableitung und Session-Manager. Die
//! CPU-gebundene Ableitung laeuft auf `spawn_blocking`, damit ein
//! langsamer Hash keine fremden Requests blockiert.

use std::sync::Arc;

use zettel_cache::TokenStore;
use zettel_db::{models::NeuerBenutzer, BenutzerRecord, BenutzerRepository};

use crate::{
    error::{AuthError, AuthResult},
    password::{self, HashKonfig},
    session::SessionManager,
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<B: BenutzerRepository, S: TokenStore> {
    benutzer_repo: Arc<B>,
    sessions: Arc<SessionManager<S>>,
    hash_konfig: HashKonfig,
}

impl<B: BenutzerRepository, S: TokenStore> AuthService<B, S> {
    /// Erstellt einen neuen AuthService
    pub fn neu(
        benutzer_repo: Arc<B>,
        sessions: Arc<SessionManager<S>>,
        hash_konfig: HashKonfig,
    ) -> Self {
        Self {
            benutzer_repo,
            sessions,
            hash_konfig,
        }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Alle drei Felder sind Pflicht und werden vor jedem I/O geprueft.
    /// Eine bereits vergebene E-Mail ergibt `EmailVergeben` – eine eigene
    /// Fehlerart, kein generischer Datenbankfehler.
    pub async fn registrieren(
        &self,
        email: &str,
        name: &str,
        passwort: &str,
    ) -> AuthResult<BenutzerRecord> {
        if email.trim().is_empty() {
            return Err(AuthError::FeldFehlt("email".into()));
        }
        if name.trim().is_empty() {
            return Err(AuthError::FeldFehlt("name".into()));
        }
        if passwort.is_empty() {
            return Err(AuthError::FeldFehlt("passwort".into()));
        }

        let (salt, hash) = self.hash_ableiten(passwort.to_string(), None).await?;

        let benutzer = self
            .benutzer_repo
            .einfuegen(NeuerBenutzer {
                email,
                name,
                passwort_hash: &hash,
                salt: &salt,
            })
            .await
            .map_err(|e| {
                if e.ist_eindeutigkeit() {
                    AuthError::EmailVergeben(email.to_string())
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        tracing::info!(
            benutzer_id = %benutzer.id,
            email = %benutzer.email,
            "Neuer Benutzer registriert"
        );

        Ok(benutzer)
    }

    /// Meldet einen Benutzer an und gibt ein frisches Sitzungs-Token zurueck
    ///
    /// Unbekannte E-Mail und falsches Passwort ergeben bewusst denselben
    /// Fehler, damit die Antwort nicht verraet, welche E-Mails registriert
    /// sind.
    pub async fn anmelden(&self, email: &str, passwort: &str) -> AuthResult<String> {
        if email.trim().is_empty() || passwort.is_empty() {
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let benutzer = self
            .benutzer_repo
            .finden_nach_email(email)
            .await?
            .ok_or(AuthError::UngueltigeAnmeldedaten)?;

        let korrekt = self
            .hash_verifizieren(
                passwort.to_string(),
                benutzer.salt.clone(),
                benutzer.passwort_hash.clone(),
            )
            .await?;
        if !korrekt {
            tracing::warn!(email = %email, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        // Token an die gespeicherte Schreibweise der E-Mail binden, damit
        // der Besitzer-Vergleich im Waechter exakt bleibt
        let token = self.sessions.ausstellen(&benutzer.email).await?;

        tracing::info!(benutzer_id = %benutzer.id, email = %benutzer.email, "Benutzer angemeldet");
        Ok(token)
    }

    /// Meldet einen Benutzer ab
    ///
    /// Der Aufrufer muss das Token vorher ueber den Waechter als zu dieser
    /// E-Mail gehoerig validiert haben. Gibt immer `true` zurueck – auch
    /// ohne aktive Sitzung (idempotent).
    pub async fn abmelden(&self, email: &str) -> AuthResult<bool> {
        self.sessions.widerrufen(email).await?;
        tracing::debug!(email = %email, "Benutzer abgemeldet");
        Ok(true)
    }

    /// Validiert ein Token und gibt die gebundene E-Mail zurueck
    pub async fn token_validieren(&self, token: &str) -> AuthResult<String> {
        if !self.sessions.pruefen(token).await? {
            return Err(AuthError::TokenUngueltig);
        }

        // Zwischen existiert und holen kann die TTL ablaufen
        self.sessions
            .email_fuer_token(token)
            .await?
            .ok_or(AuthError::TokenUngueltig)
    }

    /// Gibt den Session-Manager zurueck (fuer die Server-Verdrahtung)
    pub fn sessions(&self) -> &Arc<SessionManager<S>> {
        &self.sessions
    }

    // --- Interne Hilfsmethoden ---

    /// Leitet ein (Salt, Hash)-Paar auf dem Blocking-Pool ab
    async fn hash_ableiten(
        &self,
        passwort: String,
        salt: Option<String>,
    ) -> AuthResult<(String, String)> {
        let konfig = self.hash_konfig.clone();
        tokio::task::spawn_blocking(move || {
            password::ableiten(&konfig, &passwort, salt.as_deref())
        })
        .await
        .map_err(|e| AuthError::intern(format!("Hashing-Task abgebrochen: {e}")))?
    }

    /// Verifiziert ein Passwort auf dem Blocking-Pool
    async fn hash_verifizieren(
        &self,
        passwort: String,
        salt: String,
        erwarteter_hash: String,
    ) -> AuthResult<bool> {
        let konfig = self.hash_konfig.clone();
        tokio::task::spawn_blocking(move || {
            password::verifizieren(&konfig, &passwort, &salt, &erwarteter_hash)
        })
        .await
        .map_err(|e| AuthError::intern(format!("Hashing-Task abgebrochen: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use uuid::Uuid;
    use zettel_cache::MemoryCache;
    use zettel_db::{models::BenutzerUpdate, DbError, DbResult};

    use crate::session::SessionKonfig;

    // Minimales In-Memory-Repository fuer Tests
    #[derive(Default)]
    struct TestBenutzerRepo {
        benutzer: Mutex<Vec<BenutzerRecord>>,
    }

    impl BenutzerRepository for TestBenutzerRepo {
        async fn einfuegen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
            let mut benutzer = self.benutzer.lock().unwrap();
            if benutzer
                .iter()
                .any(|b| b.email.eq_ignore_ascii_case(daten.email))
            {
                return Err(DbError::Eindeutigkeit(format!(
                    "E-Mail '{}' bereits vergeben",
                    daten.email
                )));
            }
            let jetzt = chrono::Utc::now();
            let record = BenutzerRecord {
                id: Uuid::new_v4(),
                email: daten.email.to_string(),
                name: daten.name.to_string(),
                passwort_hash: daten.passwort_hash.to_string(),
                salt: daten.salt.to_string(),
                fehlversuche: 0,
                gesperrt: false,
                erstellt_am: jetzt,
                aktualisiert_am: jetzt,
            };
            benutzer.push(record.clone());
            Ok(record)
        }

        async fn finden_nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
            Ok(self
                .benutzer
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn finden_nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
            Ok(self
                .benutzer
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == id)
                .cloned())
        }

        async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord> {
            let mut benutzer = self.benutzer.lock().unwrap();
            let record = benutzer
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| DbError::nicht_gefunden(id.to_string()))?;
            if let Some(hash) = daten.passwort_hash {
                record.passwort_hash = hash;
            }
            if let Some(salt) = daten.salt {
                record.salt = salt;
            }
            if let Some(v) = daten.fehlversuche {
                record.fehlversuche = v;
            }
            if let Some(v) = daten.gesperrt {
                record.gesperrt = v;
            }
            Ok(record.clone())
        }
    }

    fn test_service() -> AuthService<TestBenutzerRepo, MemoryCache> {
        let repo = Arc::new(TestBenutzerRepo::default());
        let sessions = Arc::new(SessionManager::neu(
            MemoryCache::neu(),
            SessionKonfig::default(),
        ));
        // Wenige Iterationen, damit die Tests schnell bleiben
        let hash_konfig = HashKonfig {
            iterationen: 100,
            ..Default::default()
        };
        AuthService::neu(repo, sessions, hash_konfig)
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let service = test_service();

        let benutzer = service
            .registrieren("alice@example.com", "Alice", "geheim1")
            .await
            .expect("Registrierung fehlgeschlagen");

        assert_eq!(benutzer.email, "alice@example.com");
        assert!(!benutzer.gesperrt);
        assert_eq!(benutzer.fehlversuche, 0);
        assert_ne!(benutzer.passwort_hash, "geheim1", "Niemals Klartext speichern");

        let token = service
            .anmelden("alice@example.com", "geheim1")
            .await
            .expect("Anmeldung fehlgeschlagen");
        assert!(!token.is_empty());

        let email = service.token_validieren(&token).await.unwrap();
        assert_eq!(email, "alice@example.com");
    }

    #[tokio::test]
    async fn fehlende_felder_werden_benannt() {
        let service = test_service();

        let e = service.registrieren("", "Alice", "pw").await.unwrap_err();
        assert!(matches!(e, AuthError::FeldFehlt(ref feld) if feld == "email"), "war: {e}");

        let e = service
            .registrieren("a@example.com", "", "pw")
            .await
            .unwrap_err();
        assert!(matches!(e, AuthError::FeldFehlt(ref feld) if feld == "name"), "war: {e}");

        let e = service
            .registrieren("a@example.com", "Alice", "")
            .await
            .unwrap_err();
        assert!(matches!(e, AuthError::FeldFehlt(ref feld) if feld == "passwort"), "war: {e}");
    }

    #[tokio::test]
    async fn doppelte_email_gibt_eigene_fehlerart() {
        let service = test_service();
        service
            .registrieren("doppelt@example.com", "Erste", "pw1")
            .await
            .unwrap();

        let e = service
            .registrieren("doppelt@example.com", "Zweite", "pw2")
            .await
            .unwrap_err();
        assert!(matches!(e, AuthError::EmailVergeben(_)), "war: {e}");
    }

    #[tokio::test]
    async fn falsches_passwort_und_unbekannte_email_sind_ununterscheidbar() {
        let service = test_service();
        service
            .registrieren("bob@example.com", "Bob", "richtig")
            .await
            .unwrap();

        let falsches_pw = service.anmelden("bob@example.com", "falsch").await.unwrap_err();
        let unbekannt = service.anmelden("wer@example.com", "egal").await.unwrap_err();

        assert!(matches!(falsches_pw, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(unbekannt, AuthError::UngueltigeAnmeldedaten));
        assert_eq!(falsches_pw.to_string(), unbekannt.to_string());
    }

    #[tokio::test]
    async fn leere_anmeldedaten_gelten_als_ungueltig() {
        let service = test_service();

        let e = service.anmelden("", "pw").await.unwrap_err();
        assert!(matches!(e, AuthError::UngueltigeAnmeldedaten));

        let e = service.anmelden("bob@example.com", "").await.unwrap_err();
        assert!(matches!(e, AuthError::UngueltigeAnmeldedaten));
    }

    #[tokio::test]
    async fn abmelden_invalidiert_token() {
        let service = test_service();
        service
            .registrieren("carl@example.com", "Carl", "pw")
            .await
            .unwrap();
        let token = service.anmelden("carl@example.com", "pw").await.unwrap();

        assert!(service.abmelden("carl@example.com").await.unwrap());

        let e = service.token_validieren(&token).await.unwrap_err();
        assert!(matches!(e, AuthError::TokenUngueltig));
    }

    #[tokio::test]
    async fn abmelden_ist_idempotent() {
        let service = test_service();
        service
            .registrieren("dora@example.com", "Dora", "pw")
            .await
            .unwrap();
        service.anmelden("dora@example.com", "pw").await.unwrap();

        assert!(service.abmelden("dora@example.com").await.unwrap());
        // Zweites Abmelden ohne aktive Sitzung: weiterhin true, kein Fehler
        assert!(service.abmelden("dora@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn unbekanntes_token_gibt_token_ungueltig() {
        let service = test_service();
        let e = service.token_validieren("kein_token").await.unwrap_err();
        assert!(matches!(e, AuthError::TokenUngueltig));
    }

    #[tokio::test]
    async fn anmeldung_mit_anderer_schreibweise_der_email() {
        let service = test_service();
        service
            .registrieren("Eva@Example.com", "Eva", "pw")
            .await
            .unwrap();

        // Suche ist case-insensitiv; Token bindet an die gespeicherte Schreibweise
        let token = service.anmelden("eva@example.com", "pw").await.unwrap();
        let email = service.token_validieren(&token).await.unwrap();
        assert_eq!(email, "Eva@Example.com");
    }
}
