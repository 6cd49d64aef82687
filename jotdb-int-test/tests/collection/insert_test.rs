use jotdb::common::Value;
use jotdb::doc;
use jotdb::errors::ErrorKind;
use jotdb_int_test::test_util::{cleanup, create_test_context, create_test_docs, generate_people, run_test};

#[test]
fn test_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();

            let document = doc! {
                first_name: "John",
                last_name: "Doe",
                birth_day: 1234567890,
                data: [1, 2, 3],
                body: "This is a test document",
            };

            let inserted = collection.insert(document)?;
            let id = inserted.id().map(String::from).unwrap_or_default();
            assert!(!id.is_empty());

            let found = collection.find_by_id(&id)?.expect("inserted document");
            assert_eq!(found.get("first_name"), Some(&Value::from("John")));
            assert_eq!(found.get("data.1"), Some(&Value::from(2)));
            assert!(found.contains_key("_created"));
            assert!(found.contains_key("_updated"));
            assert_eq!(collection.revisions(&id)?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_batch() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            let inserted = collection.insert_many(create_test_docs())?;
            assert_eq!(inserted.len(), 3);
            assert_eq!(collection.count()?, 3);

            let ids: Vec<_> = collection.all()?.iter().filter_map(|d| d.id().map(String::from)).collect();
            assert_eq!(ids, vec!["d1", "d2", "d3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_generated_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(generate_people(50))?;
            assert_eq!(collection.count()?, 50);
            assert_eq!(collection.where_("age", "<", 10).count()?, 10);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_duplicate_id() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "same", n: 1 })?;

            let err = collection.insert(doc! { _id: "same", n: 2 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateId);

            let stored = collection.find_by_id("same")?.expect("original document");
            assert_eq!(stored.get("n"), Some(&Value::from(1)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_batch_with_conflict_inserts_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "d2" })?;

            let err = collection.insert_many(create_test_docs()).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateId);
            assert_eq!(collection.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_rejected_by_validator() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.register_validator(|doc: &jotdb::Document| {
                if doc.get("email").and_then(Value::as_str).map(|e| e.contains('@')).unwrap_or(false) {
                    Ok(())
                } else {
                    Err("email is required".to_string())
                }
            });

            collection.insert(doc! { email: "a@b.c" })?;
            let err = collection.insert(doc! { email: "nope" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            assert_eq!(collection.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}
