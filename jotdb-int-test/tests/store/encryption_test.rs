use jotdb::common::Value;
use jotdb::doc;
use jotdb::errors::ErrorKind;
use jotdb_int_test::test_util::{cleanup, create_test_context_with, run_test};

#[test]
fn test_encrypted_fields_are_transparent() {
    run_test(
        || {
            create_test_context_with(|builder| {
                builder.encrypted_fields(vec!["ssn", "card.number"]).encryption_key("s3cret")
            })
        },
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "a", ssn: "123-45-6789", card: { number: 4111, cvc: 1 } })?;

            let found = collection.find_by_id("a")?.expect("document");
            assert_eq!(found.get("ssn"), Some(&Value::from("123-45-6789")));
            assert_eq!(found.get("card.number"), Some(&Value::from(4111)));
            assert_eq!(found.get("card.cvc"), Some(&Value::from(1)));

            collection.where_("_id", "=", "a").update(doc! { ssn: "999-99-9999" })?;
            let found = collection.find_by_id("a")?.expect("document");
            assert_eq!(found.get("ssn"), Some(&Value::from("999-99-9999")));
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_encrypted_fields_are_not_stored_in_plain_text() {
    run_test(
        || create_test_context_with(|builder| builder.encrypted_fields(vec!["ssn"]).encryption_key("s3cret")),
        |ctx| {
            ctx.collection().insert(doc! { _id: "a", ssn: "123-45-6789", name: "Ann" })?;

            let raw = std::fs::read_to_string(std::path::Path::new(ctx.path()).join("test.json"))?;
            assert!(!raw.contains("123-45-6789"));
            assert!(raw.contains("\"enc:"));
            assert!(raw.contains("Ann"));

            let reopened = ctx.builder().encrypted_fields(vec!["ssn"]).encryption_key("s3cret").open()?;
            let found = reopened.find_by_id("a")?.expect("document");
            assert_eq!(found.get("ssn"), Some(&Value::from("123-45-6789")));
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_wrong_key_leaves_ciphertext() {
    run_test(
        || create_test_context_with(|builder| builder.encrypted_fields(vec!["ssn"]).encryption_key("right")),
        |ctx| {
            ctx.collection().insert(doc! { _id: "a", ssn: "123" })?;

            let reopened = ctx.builder().encrypted_fields(vec!["ssn"]).encryption_key("wrong").open()?;
            let found = reopened.find_by_id("a")?.expect("document");
            let ssn = found.get("ssn").and_then(Value::as_str).unwrap_or_default();
            assert!(ssn.starts_with("enc:"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_encrypted_fields_require_key() {
    let err = jotdb::CollectionBuilder::new()
        .encrypted_fields(vec!["ssn"])
        .open()
        .err()
        .map(|e| e.kind().clone());
    assert_eq!(err, Some(ErrorKind::InvalidOperation));
}
