//! zettel-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::Result;

use zettel_auth::{AuthService, SessionManager, ZugriffsWaechter};
use zettel_cache::MemoryCache;
use zettel_db::SqliteDb;

use api::ApiState;
use config::ServerConfig;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Token-Store mit Cleanup-Task konstruieren
    /// 3. Auth-Kern verdrahten (Session-Manager, AuthService, Waechter)
    /// 4. REST-API starten
    /// 5. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db = Arc::new(SqliteDb::oeffnen(&self.config.datenbank_konfig()).await?);

        // Token-Store explizit konstruieren und als Handle weiterreichen
        let token_store = MemoryCache::neu_mit_cleanup();
        let sessions = Arc::new(SessionManager::neu(
            token_store,
            self.config.session_konfig(),
        ));

        let auth = Arc::new(AuthService::neu(
            Arc::clone(&db),
            sessions,
            self.config.hash_konfig()?,
        ));
        let waechter = Arc::new(ZugriffsWaechter::neu(Arc::clone(&db), Arc::clone(&auth)));

        let state = ApiState {
            db,
            auth,
            waechter,
            token_header: self.config.session.token_header.clone(),
        };

        let app = api::router(state)
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::cors::CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(self.config.api_bind_adresse()).await?;
        tracing::info!(adresse = %self.config.api_bind_adresse(), "REST-API bereit");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Wartet auf Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Shutdown-Signal konnte nicht registriert werden");
    } else {
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
    }
}
