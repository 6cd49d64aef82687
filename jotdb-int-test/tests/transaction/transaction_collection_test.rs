use jotdb::collection::{CollectionEventInfo, CollectionEventListener, CollectionEvents};
use jotdb::common::Value;
use jotdb::doc;
use jotdb::errors::{ErrorKind, JotResult};
use jotdb_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_commit() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            let events = Arc::new(Mutex::new(Vec::new()));
            let sink = events.clone();
            collection.subscribe(CollectionEventListener::new(move |event: CollectionEventInfo| {
                sink.lock().push(event.event_type());
                Ok(())
            }));

            collection.begin_transaction(None)?;
            collection.insert(doc! { _id: "a", n: 1 })?;
            collection.where_("_id", "=", "a").update(doc! { n: 2 })?;
            assert!(events.lock().is_empty());
            assert_eq!(collection.find_by_id("a")?.and_then(|d| d.get("n").cloned()), Some(Value::from(2)));

            collection.commit()?;
            assert!(!collection.in_transaction());
            assert_eq!(*events.lock(), vec![CollectionEvents::Insert, CollectionEvents::Update]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_rollback() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["last_name"], None)?;
            collection.create_full_text_index(vec!["body"])?;

            collection.begin_transaction(None)?;
            collection.insert(doc! { _id: "d4", last_name: "ln2", body: "quick quick" })?;
            collection.delete("d1")?;
            collection.where_("_id", "=", "d2").update(doc! { last_name: "changed" })?;
            collection.rollback()?;

            assert_eq!(collection.count()?, 3);
            assert!(collection.find_by_id("d4")?.is_none());
            assert!(collection.find_by_id("d1")?.is_some());
            assert_eq!(collection.where_("last_name", "=", "ln2").count()?, 2);
            assert_eq!(collection.full_text_search("quick")?.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[cfg(feature = "file")]
#[test]
fn test_rollback_is_durable() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "kept" })?;

            collection.begin_transaction(None)?;
            collection.insert(doc! { _id: "discarded" })?;
            collection.rollback()?;

            let reopened = ctx.builder().open()?;
            assert!(reopened.find_by_id("kept")?.is_some());
            assert!(reopened.find_by_id("discarded")?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_scoped_transaction() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            collection.begin_transaction(Some("d1"))?;
            collection.where_("_id", "=", "d1").update(doc! { age: 35 })?;

            let err = collection.where_("_id", "=", "d2").update(doc! { age: 1 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionLockError);
            let err = collection.insert(doc! { _id: "d9" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionLockError);
            let err = collection.insert(doc! { age: 1 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionLockError);
            assert!(collection.where_("age", ">", 0).exists()?);

            collection.commit()?;
            collection.insert(doc! { _id: "d9" })?;
            assert_eq!(collection.count()?, 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transaction_state_errors() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            let err = collection.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionStateError);

            collection.begin_transaction(None)?;
            let err = collection.begin_transaction(Some("x")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionStateError);
            collection.commit()?;

            let err = collection.rollback().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TransactionStateError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transaction_closure() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();

            let result: JotResult<()> = collection.transaction(None, |c| {
                c.insert(doc! { _id: "a" })?;
                c.insert(doc! { _id: "b" })?;
                c.insert(doc! { _id: "a" })?;
                Ok(())
            });
            assert_eq!(result.unwrap_err().kind(), &ErrorKind::DuplicateId);
            assert_eq!(collection.count()?, 0);
            assert!(!collection.in_transaction());

            let inserted = collection.transaction(Some("c"), |c| {
                c.insert(doc! { _id: "c" })?;
                c.count()
            })?;
            assert_eq!(inserted, 1);
            Ok(())
        },
        cleanup,
    )
}
