use jotdb::common::{SortOrder, Value};
use jotdb::doc;
use jotdb_int_test::test_util::{
    cleanup, create_test_context, generate_people, insert_test_documents, is_sorted, run_test, string_values,
};

#[test]
fn test_find_with_comparison_operators() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            assert_eq!(collection.where_("age", ">", 30).count()?, 2);
            assert_eq!(collection.where_("age", ">=", 34).count()?, 2);
            assert_eq!(collection.where_("age", "<", 34).count()?, 1);
            assert_eq!(collection.where_("age", "<=", 34).count()?, 2);
            assert_eq!(collection.where_("last_name", "!=", "ln2").count()?, 1);
            assert_eq!(collection.where_("address.zip", "==", 151).count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_in_and_like() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let ids = collection
                .query()
                .where_in("first_name", vec!["fn1", "fn3", "fn9"])
                .pluck("_id")?;
            assert_eq!(string_values(ids), vec!["d1", "d3"]);

            assert_eq!(collection.where_("body", "like", "QUICK").count()?, 2);
            assert_eq!(collection.where_("body", "like", "%lorem%").count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_with_or_groups() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let ids = collection
                .where_("address.city", "=", "Oslo")
                .where_("age", ">", 40)
                .or_where("first_name", "=", "fn1")
                .pluck("_id")?;
            assert_eq!(string_values(ids), vec!["d1", "d3"]);

            let any = collection
                .query()
                .where_any(vec![("age", "<", 30), ("age", ">", 40)])
                .count()?;
            assert_eq!(any, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_missing_field_compares_as_null() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.insert(doc! { _id: "bare" })?;

            assert_eq!(collection.where_("age", ">", 0).count()?, 3);
            assert_eq!(collection.where_("age", "=", Value::Null).count()?, 1);
            assert_eq!(collection.where_("nickname", "!=", "x").count()?, 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_order_by() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(generate_people(20))?;
            collection.insert(doc! { first_name: "Nobody" })?;

            let ages: Vec<i64> = collection
                .query()
                .order_by("age", SortOrder::Descending)
                .pluck("age")?
                .iter()
                .filter_map(Value::as_i64)
                .collect();
            assert_eq!(ages.len(), 20);
            assert!(is_sorted(ages, false));

            let last = collection.query().order_by("age", SortOrder::Ascending).get()?;
            assert_eq!(last.last().and_then(|d| d.get("first_name")), Some(&Value::from("Nobody")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_order_by_strings_uses_collation() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            collection.insert_many(vec![
                doc! { name: "banana" },
                doc! { name: "Apple" },
                doc! { name: "cherry" },
            ])?;

            let names = collection.query().order_by("name", SortOrder::Ascending).pluck("name")?;
            assert_eq!(string_values(names), vec!["Apple", "banana", "cherry"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_first_exists_and_limit() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;

            let youngest = collection.query().order_by("age", SortOrder::Ascending).first()?;
            assert_eq!(youngest.and_then(|d| d.id().map(String::from)).as_deref(), Some("d2"));
            assert_eq!(collection.first()?.and_then(|d| d.id().map(String::from)).as_deref(), Some("d1"));

            assert!(collection.where_("age", "=", 27).exists()?);
            assert!(!collection.where_("age", "=", 28).exists()?);

            let page = collection.query().skip(1).limit(1).get()?;
            assert_eq!(page.len(), 1);
            assert_eq!(page[0].id(), Some("d2"));
            assert_eq!(collection.query().skip(10).get()?.len(), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_explain() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.collection();
            insert_test_documents(&collection)?;
            collection.create_index(vec!["last_name"], None)?;

            let plan = collection
                .where_("last_name", "=", "ln2")
                .where_("age", ">", 30)
                .order_by("age", SortOrder::Ascending)
                .limit(5)
                .explain();
            assert_eq!(plan.chosen_index(), Some("last_name"));
            assert_eq!(plan.predicates().len(), 2);
            assert_eq!(plan.limit(), Some(5));
            assert!(plan.referenced_fields().contains("age"));
            assert_eq!(plan.eligible_indexes(), &["last_name".to_string()]);
            Ok(())
        },
        cleanup,
    )
}
