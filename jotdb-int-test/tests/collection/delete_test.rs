use jotdb::collection::RevisionAction;
use jotdb::doc;
use jotdb_int_test::test_util::{cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test};

#[test]
fn test_hard_delete() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            assert!(collection.delete("d1")?);
            assert!(!collection.delete("d1")?);
            assert!(!collection.delete("missing")?);
            assert_eq!(collection.count()?, 2);
            assert_eq!(collection.query().with_trashed().count()?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_soft_delete_hides_document() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true)),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            assert!(collection.delete("d1")?);
            assert!(collection.find_by_id("d1")?.is_none());
            assert_eq!(collection.count()?, 2);
            assert_eq!(collection.query().with_trashed().count()?, 3);

            let trashed = collection.query().only_trashed().get()?;
            assert_eq!(trashed.len(), 1);
            assert_eq!(trashed[0].id(), Some("d1"));
            assert!(trashed[0].is_deleted());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_restore() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true)),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            collection.delete("d2")?;
            assert!(collection.restore("d2")?);
            assert!(!collection.restore("d2")?);
            assert!(!collection.restore("missing")?);

            let restored = collection.find_by_id("d2")?.expect("restored document");
            assert!(!restored.is_deleted());
            let actions: Vec<_> = collection.revisions("d2")?.iter().map(|r| r.action()).collect();
            assert_eq!(
                actions,
                vec![RevisionAction::Insert, RevisionAction::SoftDelete, RevisionAction::Restore]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_force_delete_removes_tombstone() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true)),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.delete("d3")?;

            assert!(collection.force_delete("d3")?);
            assert_eq!(collection.query().with_trashed().count()?, 2);
            assert!(collection.revisions("d3")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_toggling_soft_deletes_shows_tombstones() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true)),
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.delete("d1")?;

            collection.enable_soft_deletes(false);
            let tombstone = collection.find_by_id("d1")?.expect("tombstone is visible");
            assert!(tombstone.is_deleted());
            assert_eq!(collection.count()?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_truncate() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["last_name"], None)?;

            assert_eq!(collection.truncate()?, 3);
            assert_eq!(collection.count()?, 0);
            assert!(collection.has_index("last_name"));

            collection.insert(doc! { last_name: "ln2" })?;
            assert_eq!(collection.where_("last_name", "=", "ln2").count()?, 1);
            Ok(())
        },
        cleanup,
    )
}
