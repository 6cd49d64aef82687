use jotdb::common::Value;
use jotdb::doc;
use jotdb_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test,
};

#[cfg(feature = "file")]
#[test]
fn test_storage_files() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["last_name"], None)?;
            collection.create_full_text_index(vec!["body"])?;

            let dir = std::path::Path::new(ctx.path());
            assert!(dir.join("test.json").exists());
            assert!(dir.join("test.indexes.json").exists());
            assert!(dir.join("test.fts.json").exists());
            assert!(!dir.join("test.json.tmp").exists());

            let raw = std::fs::read_to_string(dir.join("test.json"))?;
            assert!(raw.trim_start().starts_with('['));
            assert!(raw.contains("\"_revisions\""));
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_reopen_restores_state() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true).full_text_fields(vec!["body"])),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["address.city"], Some("city"))?;
            collection.where_("_id", "=", "d2").update(doc! { age: 28 })?;
            collection.delete("d3")?;

            let reopened = ctx
                .builder()
                .soft_deletes(true)
                .full_text_fields(vec!["body"])
                .open()?;
            assert_eq!(reopened.count()?, 2);
            assert_eq!(reopened.query().only_trashed().count()?, 1);
            assert_eq!(
                reopened.find_by_id("d2")?.and_then(|d| d.get("age").cloned()),
                Some(Value::from(28))
            );
            assert_eq!(reopened.revisions("d2")?.len(), 2);

            let query = reopened.where_("address.city", "=", "Oslo");
            assert_eq!(query.explain().chosen_index(), Some("city"));
            assert_eq!(query.count()?, 1);
            assert_eq!(reopened.full_text_search("quick")?.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_missing_full_text_file_is_rebuilt() {
    run_test(
        || create_test_context_with(|builder| builder.full_text_fields(vec!["body"])),
        |ctx| {
            insert_test_documents(&ctx.collection())?;
            std::fs::remove_file(std::path::Path::new(ctx.path()).join("test.fts.json"))?;

            let reopened = ctx.builder().full_text_fields(vec!["body"]).open()?;
            assert_eq!(reopened.full_text_search("lorem")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_stale_index_files_are_rebuilt() {
    run_test(
        || create_test_context_with(|builder| builder.full_text_fields(vec!["body"])),
        |ctx| {
            let dir = std::path::Path::new(ctx.path());
            let collection = ctx.collection();
            collection.insert(doc! { _id: "r1", city: "Rome", body: "old town" })?;
            collection.create_index(vec!["city"], None)?;
            let stale_indexes = std::fs::read(dir.join("test.indexes.json"))?;
            let stale_full_text = std::fs::read(dir.join("test.fts.json"))?;

            collection.insert(doc! { _id: "o1", city: "Oslo", body: "fjord view" })?;
            std::fs::write(dir.join("test.indexes.json"), stale_indexes)?;
            std::fs::write(dir.join("test.fts.json"), stale_full_text)?;

            let reopened = ctx.builder().full_text_fields(vec!["body"]).open()?;
            let query = reopened.where_("city", "=", "Oslo");
            assert_eq!(query.explain().chosen_index(), Some("city"));
            assert_eq!(query.count()?, reopened.where_("city", "like", "Oslo").count()?);
            assert_eq!(reopened.where_("city", "=", "Oslo").count()?, 1);
            assert_eq!(reopened.full_text_search("fjord")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_corrupt_file_fails_to_open() {
    run_test(
        create_test_context,
        |ctx| {
            insert_test_documents(&ctx.collection())?;
            std::fs::write(std::path::Path::new(ctx.path()).join("test.json"), "{ not json")?;

            let err = ctx.builder().open().err().map(|e| e.kind().clone());
            assert_eq!(err, Some(jotdb::errors::ErrorKind::StorageReadError));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            assert_eq!(collection.count()?, 0);
            assert!(collection.first()?.is_none());
            assert!(collection.all()?.is_empty());
            assert_eq!(collection.truncate()?, 0);
            Ok(())
        },
        cleanup,
    )
}
