//! Integration tests for full-text search.

use jotdb::doc;
use jotdb::errors::ErrorKind;
use jotdb_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test,
};

#[test]
fn test_full_text_search() {
    run_test(
        || create_test_context_with(|builder| builder.full_text_fields(vec!["body"])),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let ids: Vec<_> = collection
                .full_text_search("quick")?
                .iter()
                .filter_map(|d| d.id().map(String::from))
                .collect();
            assert_eq!(ids, vec!["d1", "d2"]);

            assert_eq!(collection.full_text_search("Quick HELLO")?.len(), 1);
            assert!(collection.full_text_search("quick lorem")?.is_empty());
            assert!(collection.full_text_search("!!!")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_text_index_created_later() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            assert!(collection.full_text_search("lorem")?.is_empty());

            collection.create_full_text_index(vec!["body", "first_name"])?;
            assert_eq!(collection.full_text_search("lorem")?.len(), 1);
            assert_eq!(collection.full_text_search("fn2")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_text_index_follows_writes() {
    run_test(
        || create_test_context_with(|builder| builder.full_text_fields(vec!["title"])),
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "a", title: "Café au lait" })?;
            collection.insert(doc! { _id: "b", title: "espresso", tags: "café" })?;

            assert_eq!(collection.full_text_search("café")?.len(), 1);

            collection.where_("_id", "=", "a").update(doc! { title: "black tea" })?;
            assert!(collection.full_text_search("café")?.is_empty());
            assert_eq!(collection.full_text_search("tea")?.len(), 1);

            collection.delete("a")?;
            assert!(collection.full_text_search("tea")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_text_hides_tombstones() {
    run_test(
        || {
            create_test_context_with(|builder| builder.full_text_fields(vec!["body"]).soft_deletes(true))
        },
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.delete("d1")?;
            assert_eq!(collection.full_text_search("quick")?.len(), 1);

            collection.restore("d1")?;
            assert_eq!(collection.full_text_search("quick")?.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_text_index_needs_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.collection().create_full_text_index(vec![]).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexingError);
            Ok(())
        },
        cleanup,
    )
}
