use jotdb::collection::{CollectionEventInfo, CollectionEventListener, CollectionEvents, Document};
use jotdb::common::Value;
use jotdb::doc;
use jotdb::errors::{ErrorKind, JotError};
use jotdb::Collection;
use jotdb_int_test::test_util::{cleanup, create_test_context, create_test_context_with, run_test};
use parking_lot::Mutex;
use std::sync::Arc;

type Recorded = Arc<Mutex<Vec<(CollectionEvents, Document)>>>;

fn record_events(collection: &Collection) -> Recorded {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    collection.subscribe(CollectionEventListener::new(move |event: CollectionEventInfo| {
        sink.lock().push((event.event_type(), event.item().clone()));
        Ok(())
    }));
    recorded
}

#[test]
fn test_insert_update_delete_events() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            let recorded = record_events(&collection);

            collection.insert_many(vec![doc! { _id: "a", n: 1 }, doc! { _id: "b", n: 1 }])?;
            collection.query().update(doc! { n: 2 })?;
            collection.delete("a")?;

            let recorded = recorded.lock();
            let kinds: Vec<_> = recorded.iter().map(|(kind, _)| *kind).collect();
            assert_eq!(
                kinds,
                vec![
                    CollectionEvents::Insert,
                    CollectionEvents::Insert,
                    CollectionEvents::Update,
                    CollectionEvents::Update,
                    CollectionEvents::Delete,
                ]
            );
            assert_eq!(recorded[2].1.get("n"), Some(&Value::from(2)));
            assert_eq!(recorded[4].1.id(), Some("a"));
            assert_eq!(recorded[4].1.get("n"), Some(&Value::from(2)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_soft_delete_and_restore_events() {
    run_test(
        || create_test_context_with(|builder| builder.soft_deletes(true)),
        |ctx| {
            let collection = ctx.collection();
            collection.insert(doc! { _id: "a" })?;
            let recorded = record_events(&collection);

            collection.delete("a")?;
            collection.restore("a")?;

            let recorded = recorded.lock();
            assert_eq!(recorded[0].0, CollectionEvents::Delete);
            assert_eq!(recorded[1].0, CollectionEvents::Update);
            assert!(!recorded[1].1.is_deleted());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_truncate_publishes_delete_per_document() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(vec![doc! {}, doc! {}, doc! {}])?;
            let recorded = record_events(&collection);

            collection.truncate()?;
            let recorded = recorded.lock();
            assert_eq!(recorded.len(), 3);
            assert!(recorded.iter().all(|(kind, _)| *kind == CollectionEvents::Delete));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failing_listener_does_not_stop_others() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.subscribe(CollectionEventListener::new(|_event: CollectionEventInfo| {
                Err(JotError::new("listener failed", ErrorKind::InternalError))
            }));
            collection.subscribe(CollectionEventListener::new(|_event: CollectionEventInfo| {
                panic!("listener panicked")
            }));
            let recorded = record_events(&collection);

            collection.insert(doc! { _id: "a" })?;
            assert_eq!(recorded.lock().len(), 1);
            assert!(collection.find_by_id("a")?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unsubscribe() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            let counter = Arc::new(Mutex::new(0));
            let sink = counter.clone();
            let subscriber = collection.subscribe(CollectionEventListener::new(move |_event: CollectionEventInfo| {
                *sink.lock() += 1;
                Ok(())
            }));

            collection.insert(doc! {})?;
            assert!(collection.unsubscribe(subscriber));
            assert!(!collection.unsubscribe(subscriber));
            collection.insert(doc! {})?;
            assert_eq!(*counter.lock(), 1);
            Ok(())
        },
        cleanup,
    )
}
