use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use jotdb::collection::Document;
use jotdb::common::Value;
use jotdb::doc;
use jotdb::errors::JotResult;
use jotdb::{Collection, CollectionBuilder};
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test between a setup and a teardown step, retrying a failed run
/// up to three times.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> JotResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> JotResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> JotResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            let ctx = before().map_err(|e| (format!("Before run failed: {:?}", e), backtrace.to_string()))?;
            match test(ctx.clone()) {
                Ok(_) => after(ctx).map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            }
        });

        let elapsed = start_time.elapsed();
        let error = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                if !bt.is_empty() && !bt.contains("disabled") {
                    eprintln!("Backtrace:\n{}", bt);
                }
                e
            }
            Err(panic_err) => {
                let message = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                format!("Panic: {}", message)
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", error);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(error);
    }

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    collection: Collection,
}

impl TestContext {
    pub fn new(path: String, collection: Collection) -> Self {
        Self { path, collection }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn collection(&self) -> Collection {
        self.collection.clone()
    }

    /// A builder pointing at the same storage location as the context's
    /// collection, used to open it again.
    pub fn builder(&self) -> CollectionBuilder {
        configure(CollectionBuilder::new().name("test"), &self.path)
    }
}

#[cfg(feature = "file")]
fn configure(builder: CollectionBuilder, path: &str) -> CollectionBuilder {
    builder.storage_dir(path)
}

#[cfg(not(feature = "file"))]
fn configure(builder: CollectionBuilder, _path: &str) -> CollectionBuilder {
    builder
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(id.to_string()).to_string_lossy().into_owned()
}

pub fn create_test_context() -> JotResult<TestContext> {
    create_test_context_with(|builder| builder)
}

/// Opens the test collection after applying `configure_fn` to its builder.
pub fn create_test_context_with<F>(configure_fn: F) -> JotResult<TestContext>
where
    F: FnOnce(CollectionBuilder) -> CollectionBuilder,
{
    let path = random_path();
    let builder = configure(CollectionBuilder::new().name("test"), &path);
    let collection = configure_fn(builder).open()?;
    Ok(TestContext::new(path, collection))
}

pub fn cleanup(ctx: TestContext) -> JotResult<()> {
    let path = ctx.path().to_string();
    drop(ctx);
    if std::path::Path::new(&path).exists() {
        if let Err(e) = fs::remove_dir_all(&path) {
            eprintln!("Warning: Failed to remove test directory {}: {:?}", path, e);
        }
    }
    Ok(())
}

pub fn create_test_docs() -> Vec<Document> {
    let doc1 = doc! {
        _id: "d1",
        first_name: "fn1",
        last_name: "ln1",
        birth_day: "2012-07-01T02:15:22+02:00",
        age: 34,
        arr: [1, 2, 3],
        address: { city: "Oslo", zip: 150 },
        body: "a quick brown fox jump over the lazy dog",
    };

    let doc2 = doc! {
        _id: "d2",
        first_name: "fn2",
        last_name: "ln2",
        birth_day: "2010-06-12T12:05:35+05:30",
        age: 27,
        arr: [3, 4, 3],
        address: { city: "Rome", zip: 118 },
        body: "quick hello world from jotdb",
    };

    let doc3 = doc! {
        _id: "d3",
        first_name: "fn3",
        last_name: "ln2",
        birth_day: "2014-04-17T22:25:44-04:00",
        age: 45,
        arr: [9, 4, 8],
        address: { city: "Oslo", zip: 151 },
        body: "Lorem ipsum dolor sit amet, consectetur \
        adipiscing elit. Sed nunc mi, mattis ullamcorper \
        dignissim vitae, condimentum non lorem.",
    };

    vec![doc1, doc2, doc3]
}

pub fn insert_test_documents(collection: &Collection) -> JotResult<()> {
    collection.insert_many(create_test_docs())?;
    Ok(())
}

/// `count` documents with random names and ages `0..count`.
pub fn generate_people(count: usize) -> Vec<Document> {
    (0..count)
        .map(|age| {
            doc! {
                first_name: (FirstName().fake::<String>()),
                last_name: (LastName().fake::<String>()),
                age: age,
            }
        })
        .collect()
}

pub fn string_values(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| value.as_str().map(String::from))
        .collect()
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if (ascending && prev > current) || (!ascending && prev < current) {
                return false;
            }
            prev = current;
        }
    }
    true
}
