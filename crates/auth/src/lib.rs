//! zettel-auth – Auth-, Session- und Berechtigungs-Kern
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit PBKDF2 (konfigurierbare Iterationen und Laengen)
//! - Session-Manager (bidirektionale Token-Zuordnung im Token-Store, TTL)
//! - AuthService (Registrierung, Login, Logout, Token-Validierung)
//! - ZugriffsWaechter (Besitzer-Pruefung: Token-Identitaet == Ressourcen-Besitzer)

pub mod error;
pub mod guard;
pub mod password;
pub mod service;
pub mod session;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use guard::ZugriffsWaechter;
pub use password::{HashAlgorithmus, HashKonfig};
pub use service::AuthService;
pub use session::{SessionKonfig, SessionManager};
