//! REST-API fuer Zettel
//!
//! Die Routing-Schicht uebersetzt zwischen HTTP und dem Auth-Kern:
//! Fehlerarten werden auf Statuscodes abgebildet, ein Waechter-Nein wird
//! zu 403. Ressourcen-gebundene Endpunkte laufen immer zuerst durch den
//! Zugriffs-Waechter.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use zettel_auth::{AuthError, AuthService, ZugriffsWaechter};
use zettel_cache::MemoryCache;
use zettel_db::{BenutzerRecord, BenutzerRepository, SqliteDb};

/// Gemeinsamer Zustand aller API-Handler
#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SqliteDb>,
    pub auth: Arc<AuthService<SqliteDb, MemoryCache>>,
    pub waechter: Arc<ZugriffsWaechter<SqliteDb, MemoryCache>>,
    /// Header, in dem das Token erwartet wird (konfigurierbar)
    pub token_header: String,
}

/// Erstellt den API-Router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/benutzer", post(registrieren))
        .route("/api/benutzer/:id", get(benutzer_anzeigen))
        .route("/api/benutzer/:id/anmeldung", delete(abmelden))
        .route("/api/anmeldung", post(anmelden))
        .with_state(state)
}

/// Oeffentliche Sicht auf einen Benutzer (ohne Passwort-Material)
#[derive(Debug, Serialize)]
pub struct BenutzerAntwort {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub erstellt_am: DateTime<Utc>,
}

impl From<BenutzerRecord> for BenutzerAntwort {
    fn from(record: BenutzerRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            erstellt_am: record.erstellt_am,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrierungsBody {
    pub email: String,
    pub name: String,
    pub passwort: String,
}

#[derive(Debug, Deserialize)]
pub struct AnmeldeBody {
    pub email: String,
    pub passwort: String,
}

/// GET /health – Health-Check-Endpunkt
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// POST /api/benutzer – Registrierung
async fn registrieren(
    State(state): State<ApiState>,
    Json(body): Json<RegistrierungsBody>,
) -> Response {
    match state
        .auth
        .registrieren(&body.email, &body.name, &body.passwort)
        .await
    {
        Ok(benutzer) => (
            StatusCode::CREATED,
            Json(BenutzerAntwort::from(benutzer)),
        )
            .into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

/// POST /api/anmeldung – Login, gibt das Sitzungs-Token zurueck
async fn anmelden(State(state): State<ApiState>, Json(body): Json<AnmeldeBody>) -> Response {
    match state.auth.anmelden(&body.email, &body.passwort).await {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

/// DELETE /api/benutzer/:id/anmeldung – Logout (ressourcen-gebunden)
async fn abmelden(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let email = match zugriff_pruefen(&state, id, &headers).await {
        Ok(email) => email,
        Err(antwort) => return antwort,
    };

    match state.auth.abmelden(&email).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

/// GET /api/benutzer/:id – eigener Datensatz (ressourcen-gebunden)
///
/// Beispiel fuer das Muster, hinter dem auch die Listen-/Eintrags-
/// Endpunkte haengen: erst der Waechter, dann die Ressource.
async fn benutzer_anzeigen(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if let Err(antwort) = zugriff_pruefen(&state, id, &headers).await {
        return antwort;
    }

    match state.db.finden_nach_id(id).await {
        Ok(Some(benutzer)) => {
            (StatusCode::OK, Json(BenutzerAntwort::from(benutzer))).into_response()
        }
        Ok(None) => fehler_antwort(&AuthError::RessourceUnbekannt(id.to_string())),
        Err(e) => fehler_antwort(&AuthError::Datenbank(e)),
    }
}

/// Laesst einen ressourcen-gebundenen Request durch den Waechter laufen
///
/// Gibt bei Erfolg die an das Token gebundene E-Mail zurueck; sonst die
/// fertige Fehlerantwort (401 Token fehlt/ungueltig, 403 fremde
/// Ressource, 404 unbekannter Besitzer, 503 Speicher nicht erreichbar).
async fn zugriff_pruefen(
    state: &ApiState,
    besitzer_id: Uuid,
    headers: &HeaderMap,
) -> Result<String, Response> {
    let Some(token) = token_aus_headers(headers, &state.token_header) else {
        return Err(fehler_antwort(&AuthError::TokenUngueltig));
    };

    match state.waechter.autorisieren(besitzer_id, token).await {
        Ok(true) => {}
        Ok(false) => {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": { "code": 403, "message": "Zugriff verweigert" } })),
            )
                .into_response())
        }
        Err(e) => return Err(fehler_antwort(&e)),
    }

    state
        .auth
        .token_validieren(token)
        .await
        .map_err(|e| fehler_antwort(&e))
}

/// Extrahiert das Token aus dem konfigurierten Header
///
/// Ein `Bearer `-Praefix wird akzeptiert und abgestreift.
pub fn token_aus_headers<'a>(headers: &'a HeaderMap, header_name: &str) -> Option<&'a str> {
    let wert = headers.get(header_name)?.to_str().ok()?;
    Some(wert.strip_prefix("Bearer ").unwrap_or(wert))
}

/// Fehlerantwort fuer die REST-API
fn fehler_antwort(e: &AuthError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": e.to_string()
            }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_mit_bearer_praefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(token_aus_headers(&headers, "authorization"), Some("abc123"));
    }

    #[test]
    fn token_ohne_praefix_aus_eigenem_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("abc123"));
        assert_eq!(token_aus_headers(&headers, "x-auth-token"), Some("abc123"));
    }

    #[test]
    fn fehlender_header_gibt_none() {
        let headers = HeaderMap::new();
        assert_eq!(token_aus_headers(&headers, "authorization"), None);
    }
}
