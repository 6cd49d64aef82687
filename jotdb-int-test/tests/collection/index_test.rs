use jotdb::doc;
use jotdb::errors::ErrorKind;
use jotdb_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_create_single_field_index() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let name = collection.create_index(vec!["last_name"], None)?;
            assert_eq!(name, "last_name");
            assert!(collection.has_index("last_name"));

            let query = collection.where_("last_name", "=", "ln2");
            assert_eq!(query.explain().chosen_index(), Some("last_name"));
            assert_eq!(query.count()?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_compound_index() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let name = collection.create_index(vec!["last_name", "address.city"], None)?;
            assert_eq!(name, "last_name_address.city");

            let query = collection
                .where_("address.city", "=", "Oslo")
                .where_("last_name", "=", "ln2");
            let plan = query.explain();
            assert_eq!(plan.chosen_index(), Some("last_name_address.city"));
            assert_eq!(plan.index_scan().map(|scan| scan.key()), Some("ln2|Oslo"));

            let found = query.get()?;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id(), Some("d3"));

            let partial = collection.where_("last_name", "=", "ln2");
            assert_eq!(partial.explain().chosen_index(), None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_named_index_and_drop() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["age"], Some("by_age"))?;
            assert_eq!(collection.index_names(), vec!["by_age".to_string()]);

            assert!(collection.drop_index("by_age")?);
            assert!(!collection.drop_index("by_age")?);
            assert!(collection.index_names().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_follows_writes() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.create_index(vec!["status"], None)?;

            collection.insert(doc! { _id: "a", status: "new" })?;
            collection.insert(doc! { _id: "b", status: "new" })?;
            collection.where_("_id", "=", "a").update(doc! { status: "done" })?;
            collection.delete("b")?;
            collection.insert(doc! { _id: "c" })?;

            assert_eq!(collection.where_("status", "=", "new").count()?, 0);
            assert_eq!(collection.where_("status", "=", "done").count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_with_empty_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.collection().create_index(vec![], None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexingError);
            Ok(())
        },
        cleanup,
    )
}
