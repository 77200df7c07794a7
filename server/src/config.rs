//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use zettel_auth::{HashKonfig, SessionKonfig};
use zettel_db::DatenbankKonfig;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Passwort-Hashing-Einstellungen
    pub hash: HashEinstellungen,
    /// Session-/Token-Einstellungen
    pub session: SessionEinstellungen,
    /// Sicherheits-Einstellungen
    pub sicherheit: SicherheitsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Zettel Server".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die REST-API
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 9000,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://zettel.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Passwort-Hashing-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashEinstellungen {
    /// Algorithmus-Kennung: "pbkdf2-sha256" oder "pbkdf2-sha512"
    pub algorithmus: String,
    /// Iterationszahl der KDF
    pub iterationen: u32,
    /// Salt-Laenge in Bytes
    pub salt_laenge: usize,
    /// Hash-Laenge in Bytes
    pub hash_laenge: usize,
}

impl Default for HashEinstellungen {
    fn default() -> Self {
        Self {
            algorithmus: "pbkdf2-sha256".into(),
            iterationen: 10_000,
            salt_laenge: 16,
            hash_laenge: 32,
        }
    }
}

/// Session-/Token-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionEinstellungen {
    /// Token-Laenge in Bytes
    pub token_laenge: usize,
    /// Sitzungs-Lebensdauer in Sekunden
    pub ttl_sekunden: u64,
    /// Zeitlimit pro Token-Store-Operation in Millisekunden
    pub zeitlimit_ms: u64,
    /// Header, in dem das Token erwartet wird
    pub token_header: String,
}

impl Default for SessionEinstellungen {
    fn default() -> Self {
        Self {
            token_laenge: 32,
            ttl_sekunden: 3600,
            zeitlimit_ms: 2000,
            token_header: "authorization".into(),
        }
    }
}

/// Sicherheits-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SicherheitsEinstellungen {
    /// Erlaubte Fehlversuche bevor ein Benutzer gesperrt wird.
    /// 0 = Sperre deaktiviert. Derzeit reiner Konfigurations-Hook:
    /// der Zaehler wird mitgefuehrt, aber von keiner Logik ausgewertet.
    pub max_passwort_fehlversuche: u32,
}

impl Default for SicherheitsEinstellungen {
    fn default() -> Self {
        Self {
            max_passwort_fehlversuche: 0,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die vollstaendige Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }

    /// Baut die Hash-Konfiguration fuer zettel-auth
    pub fn hash_konfig(&self) -> anyhow::Result<HashKonfig> {
        let algorithmus = self
            .hash
            .algorithmus
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Konfigurationsfehler: {e}"))?;
        Ok(HashKonfig {
            algorithmus,
            iterationen: self.hash.iterationen,
            salt_laenge: self.hash.salt_laenge,
            hash_laenge: self.hash.hash_laenge,
        })
    }

    /// Baut die Session-Konfiguration fuer zettel-auth
    pub fn session_konfig(&self) -> SessionKonfig {
        SessionKonfig {
            token_laenge: self.session.token_laenge,
            ttl_sekunden: self.session.ttl_sekunden,
            zeitlimit: Duration::from_millis(self.session.zeitlimit_ms),
        }
    }

    /// Baut die Datenbank-Konfiguration fuer zettel-db
    pub fn datenbank_konfig(&self) -> DatenbankKonfig {
        DatenbankKonfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zettel_auth::HashAlgorithmus;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.api_port, 9000);
        assert_eq!(cfg.hash.iterationen, 10_000);
        assert_eq!(cfg.session.ttl_sekunden, 3600);
        assert_eq!(cfg.sicherheit.max_passwort_fehlversuche, 0);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.api_bind_adresse(), "0.0.0.0:9000");
    }

    #[test]
    fn hash_konfig_wird_uebernommen() {
        let cfg = ServerConfig::default();
        let hash = cfg.hash_konfig().unwrap();
        assert_eq!(hash.algorithmus, HashAlgorithmus::Pbkdf2Sha256);
        assert_eq!(hash.iterationen, 10_000);
        assert_eq!(hash.salt_laenge, 16);
        assert_eq!(hash.hash_laenge, 32);
    }

    #[test]
    fn unbekannter_algorithmus_gibt_fehler() {
        let mut cfg = ServerConfig::default();
        cfg.hash.algorithmus = "md5".into();
        assert!(cfg.hash_konfig().is_err());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Mein Zettel"

            [netzwerk]
            api_port = 8080

            [session]
            ttl_sekunden = 600
            token_header = "x-auth-token"
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Mein Zettel");
        assert_eq!(cfg.netzwerk.api_port, 8080);
        assert_eq!(cfg.session.ttl_sekunden, 600);
        assert_eq!(cfg.session.token_header, "x-auth-token");
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.hash.iterationen, 10_000);
    }
}
