//! Integration-Tests fuer BenutzerRepository (In-Memory SQLite)

use zettel_db::{
    models::{BenutzerUpdate, NeuerBenutzer},
    BenutzerRepository, DbError, SqliteDb,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;

    let benutzer = db
        .einfuegen(NeuerBenutzer {
            email: "alice@example.com",
            name: "Alice",
            passwort_hash: "hash_alice",
            salt: "salt_alice",
        })
        .await
        .expect("Benutzer erstellen fehlgeschlagen");

    assert_eq!(benutzer.email, "alice@example.com");
    assert_eq!(benutzer.name, "Alice");
    assert_eq!(benutzer.fehlversuche, 0);
    assert!(!benutzer.gesperrt);

    let geladen = db
        .finden_nach_id(benutzer.id)
        .await
        .expect("finden_nach_id fehlgeschlagen")
        .expect("Benutzer sollte gefunden werden");

    assert_eq!(geladen.id, benutzer.id);
    assert_eq!(geladen.salt, "salt_alice");
}

#[tokio::test]
async fn email_suche_ist_case_insensitiv() {
    let db = db().await;

    db.einfuegen(NeuerBenutzer {
        email: "Bob@Example.com",
        name: "Bob",
        passwort_hash: "hash_bob",
        salt: "salt_bob",
    })
    .await
    .unwrap();

    let gefunden = db
        .finden_nach_email("bob@example.com")
        .await
        .unwrap()
        .expect("Benutzer 'bob' sollte gefunden werden");

    // Schreibweise der Registrierung bleibt erhalten
    assert_eq!(gefunden.email, "Bob@Example.com");

    let nicht_gefunden = db.finden_nach_email("unbekannt@example.com").await.unwrap();
    assert!(nicht_gefunden.is_none());
}

#[tokio::test]
async fn email_ist_eindeutig() {
    let db = db().await;

    db.einfuegen(NeuerBenutzer {
        email: "charlie@example.com",
        name: "Charlie",
        passwort_hash: "hash1",
        salt: "salt1",
    })
    .await
    .unwrap();

    // Auch mit anderer Schreibweise abgelehnt
    let fehler = db
        .einfuegen(NeuerBenutzer {
            email: "CHARLIE@example.com",
            name: "Charlie Zwei",
            passwort_hash: "hash2",
            salt: "salt2",
        })
        .await
        .expect_err("Doppelte E-Mail muss abgelehnt werden");

    assert!(fehler.ist_eindeutigkeit(), "Erwartet Eindeutigkeitsfehler, war: {fehler}");
}

#[tokio::test]
async fn benutzer_aktualisieren() {
    let db = db().await;

    let benutzer = db
        .einfuegen(NeuerBenutzer {
            email: "dora@example.com",
            name: "Dora",
            passwort_hash: "alter_hash",
            salt: "alter_salt",
        })
        .await
        .unwrap();

    let aktualisiert = db
        .aktualisieren(
            benutzer.id,
            BenutzerUpdate {
                passwort_hash: Some("neuer_hash".into()),
                salt: Some("neuer_salt".into()),
                ..Default::default()
            },
        )
        .await
        .expect("Update fehlgeschlagen");

    assert_eq!(aktualisiert.passwort_hash, "neuer_hash");
    assert_eq!(aktualisiert.salt, "neuer_salt");
    assert!(aktualisiert.aktualisiert_am >= benutzer.aktualisiert_am);
}

#[tokio::test]
async fn update_unbekannter_benutzer_gibt_fehler() {
    let db = db().await;

    let ergebnis = db
        .aktualisieren(
            uuid::Uuid::new_v4(),
            BenutzerUpdate {
                gesperrt: Some(true),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(ergebnis, Err(DbError::NichtGefunden(_))));
}
