use jotdb::common::SortOrder;
use jotdb_int_test::test_util::{cleanup, create_test_context, generate_people, run_test};

#[test]
fn test_paginate() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(generate_people(25))?;

            let page = collection.query().order_by("age", SortOrder::Ascending).paginate(1, 10)?;
            assert_eq!(page.total, 25);
            assert_eq!(page.per_page, 10);
            assert_eq!(page.current_page, 1);
            assert_eq!(page.last_page, 3);
            assert_eq!(page.from, Some(1));
            assert_eq!(page.to, Some(10));
            assert!(page.has_more_pages);
            assert_eq!(page.next_page, Some(2));
            assert_eq!(page.prev_page, None);

            let last = collection.query().order_by("age", SortOrder::Ascending).paginate(3, 10)?;
            assert_eq!(last.data.len(), 5);
            assert_eq!(last.from, Some(21));
            assert_eq!(last.to, Some(25));
            assert!(!last.has_more_pages);
            assert_eq!(last.prev_page, Some(2));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_paginate_past_the_end() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(generate_people(5))?;

            let page = collection.query().paginate(4, 10)?;
            assert!(page.is_empty());
            assert_eq!(page.total, 5);
            assert_eq!(page.from, None);
            assert_eq!(page.to, None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_paginate_filtered() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(generate_people(30))?;

            let page = collection.where_("age", ">=", 20).paginate(2, 4)?;
            assert_eq!(page.total, 10);
            assert_eq!(page.last_page, 3);
            assert_eq!(page.data.len(), 4);
            Ok(())
        },
        cleanup,
    )
}
