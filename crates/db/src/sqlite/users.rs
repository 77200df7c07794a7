//! SQLite-Implementierung des BenutzerRepository

use chrono::Utc;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
use crate::repository::BenutzerRepository;
use crate::sqlite::pool::SqliteDb;

impl BenutzerRepository for SqliteDb {
    async fn einfuegen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = Uuid::new_v4();
        let jetzt = Utc::now();
        let jetzt_str = jetzt.to_rfc3339();

        sqlx::query(
            "INSERT INTO benutzer (id, email, name, passwort_hash, salt, fehlversuche, gesperrt, erstellt_am, aktualisiert_am)
             VALUES (?, ?, ?, ?, ?, 0, 0, ?, ?)",
        )
        .bind(id.to_string())
        .bind(daten.email)
        .bind(daten.name)
        .bind(daten.passwort_hash)
        .bind(daten.salt)
        .bind(&jetzt_str)
        .bind(&jetzt_str)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!("E-Mail '{}' bereits vergeben", daten.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id,
            email: daten.email.to_string(),
            name: daten.name.to_string(),
            passwort_hash: daten.passwort_hash.to_string(),
            salt: daten.salt.to_string(),
            fehlversuche: 0,
            gesperrt: false,
            erstellt_am: jetzt,
            aktualisiert_am: jetzt,
        })
    }

    async fn finden_nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, name, passwort_hash, salt, fehlversuche, gesperrt, erstellt_am, aktualisiert_am
             FROM benutzer WHERE lower(email) = lower(?)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_zu_benutzer(&r)).transpose()
    }

    async fn finden_nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, name, passwort_hash, salt, fehlversuche, gesperrt, erstellt_am, aktualisiert_am
             FROM benutzer WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_zu_benutzer(&r)).transpose()
    }

    async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = Vec::new();
        if daten.passwort_hash.is_some() {
            sets.push("passwort_hash = ?");
        }
        if daten.salt.is_some() {
            sets.push("salt = ?");
        }
        if daten.fehlversuche.is_some() {
            sets.push("fehlversuche = ?");
        }
        if daten.gesperrt.is_some() {
            sets.push("gesperrt = ?");
        }

        if sets.is_empty() {
            return self
                .finden_nach_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("Benutzer {id}")));
        }

        sets.push("aktualisiert_am = ?");
        let sql = format!("UPDATE benutzer SET {} WHERE id = ?", sets.join(", "));
        let mut q = sqlx::query(&sql);

        if let Some(ref v) = daten.passwort_hash {
            q = q.bind(v);
        }
        if let Some(ref v) = daten.salt {
            q = q.bind(v);
        }
        if let Some(v) = daten.fehlversuche {
            q = q.bind(v);
        }
        if let Some(v) = daten.gesperrt {
            q = q.bind(v as i64);
        }
        q = q.bind(Utc::now().to_rfc3339());
        q = q.bind(id.to_string());

        let betroffen = q.execute(&self.pool).await?.rows_affected();
        if betroffen == 0 {
            return Err(DbError::nicht_gefunden(format!("Benutzer {id}")));
        }

        self.finden_nach_id(id)
            .await?
            .ok_or_else(|| DbError::intern("Benutzer nach Update nicht gefunden"))
    }
}

fn row_zu_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    let erstellt_str: String = row.try_get("erstellt_am")?;
    let erstellt_am = chrono::DateTime::parse_from_rfc3339(&erstellt_str)
        .map_err(|e| DbError::intern(format!("Ungueltige erstellt_am '{erstellt_str}': {e}")))?
        .with_timezone(&Utc);

    let aktualisiert_str: String = row.try_get("aktualisiert_am")?;
    let aktualisiert_am = chrono::DateTime::parse_from_rfc3339(&aktualisiert_str)
        .map_err(|e| {
            DbError::intern(format!(
                "Ungueltige aktualisiert_am '{aktualisiert_str}': {e}"
            ))
        })?
        .with_timezone(&Utc);

    let gesperrt: i64 = row.try_get("gesperrt")?;

    Ok(BenutzerRecord {
        id,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        passwort_hash: row.try_get("passwort_hash")?,
        salt: row.try_get("salt")?,
        fehlversuche: row.try_get("fehlversuche")?,
        gesperrt: gesperrt != 0,
        erstellt_am,
        aktualisiert_am,
    })
}
