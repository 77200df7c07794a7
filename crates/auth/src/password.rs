//! Passwort-Hashing mit PBKDF2
//!
//! Leitet aus (Passwort, Salt) deterministisch ein (Salt, Hash)-Paar ab.
//! Die Verifikation rechnet den Hash mit dem gespeicherten Salt nach und
//! vergleicht byte-genau – Passwoerter werden nie entschluesselt oder im
//! Klartext verglichen. Algorithmus, Iterationszahl und Laengen sind
//! konfigurierbar.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Sha256, Sha512};

use crate::error::{AuthError, AuthResult};

/// Unterstuetzte Ableitungs-Algorithmen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithmus {
    Pbkdf2Sha256,
    Pbkdf2Sha512,
}

impl HashAlgorithmus {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 => "pbkdf2-sha256",
            Self::Pbkdf2Sha512 => "pbkdf2-sha512",
        }
    }
}

impl std::str::FromStr for HashAlgorithmus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pbkdf2-sha256" | "pbkdf2" => Ok(Self::Pbkdf2Sha256),
            "pbkdf2-sha512" => Ok(Self::Pbkdf2Sha512),
            other => Err(format!("Unbekannter Hash-Algorithmus: {other}")),
        }
    }
}

/// Parameter fuer die Passwort-Ableitung
#[derive(Debug, Clone)]
pub struct HashKonfig {
    /// Ableitungs-Algorithmus
    pub algorithmus: HashAlgorithmus,
    /// Iterationszahl der KDF
    pub iterationen: u32,
    /// Salt-Laenge in Bytes
    pub salt_laenge: usize,
    /// Hash-Laenge in Bytes
    pub hash_laenge: usize,
}

impl Default for HashKonfig {
    fn default() -> Self {
        Self {
            algorithmus: HashAlgorithmus::Pbkdf2Sha256,
            iterationen: 10_000,
            salt_laenge: 16,
            hash_laenge: 32,
        }
    }
}

/// Leitet ein (Salt, Hash)-Paar aus einem Passwort ab
///
/// Ohne uebergebenes Salt wird ein zufaelliges Salt der konfigurierten
/// Laenge erzeugt. Beide Rueckgabewerte sind hex-codiert. Gleiche
/// (Passwort, Salt)-Paare ergeben immer denselben Hash.
///
/// Die Ableitung ist CPU-gebunden; Aufrufer auf dem Async-Pfad sollten
/// sie via `spawn_blocking` auslagern.
pub fn ableiten(
    konfig: &HashKonfig,
    passwort: &str,
    salt: Option<&str>,
) -> AuthResult<(String, String)> {
    let salt_hex = match salt {
        Some(s) => s.to_string(),
        None => salt_generieren(konfig.salt_laenge),
    };

    let salt_bytes = hex::decode(&salt_hex)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Salt-Format: {e}")))?;

    let mut hash = vec![0u8; konfig.hash_laenge];
    match konfig.algorithmus {
        HashAlgorithmus::Pbkdf2Sha256 => pbkdf2_hmac::<Sha256>(
            passwort.as_bytes(),
            &salt_bytes,
            konfig.iterationen,
            &mut hash,
        ),
        HashAlgorithmus::Pbkdf2Sha512 => pbkdf2_hmac::<Sha512>(
            passwort.as_bytes(),
            &salt_bytes,
            konfig.iterationen,
            &mut hash,
        ),
    }

    Ok((salt_hex, hex::encode(hash)))
}

/// Verifiziert ein Passwort gegen ein gespeichertes (Salt, Hash)-Paar
///
/// Gibt `true` zurueck wenn die Nachberechnung byte-genau uebereinstimmt.
pub fn verifizieren(
    konfig: &HashKonfig,
    passwort: &str,
    salt: &str,
    erwarteter_hash: &str,
) -> AuthResult<bool> {
    let (_, hash) = ableiten(konfig, passwort, Some(salt))?;
    Ok(hash == erwarteter_hash)
}

/// Erzeugt ein zufaelliges Salt der angegebenen Byte-Laenge (hex-codiert)
fn salt_generieren(laenge: usize) -> String {
    let mut bytes = vec![0u8; laenge];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
