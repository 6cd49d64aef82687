use crate::collection::Document;
use crate::common::util::get_current_time_or_zero;
use crate::errors::JotResult;
use std::fmt::Debug;
use std::sync::Arc;

/// Kinds of change a collection reports to its listeners.
///
/// # Variants
/// - `Insert`: a document was added
/// - `Update`: a document was modified (restoring a tombstone included)
/// - `Delete`: a document was soft deleted or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvents {
    Insert,
    Update,
    Delete,
}

/// Information about one change applied to a collection.
///
/// The item is a decrypted snapshot of the document taken when the change was
/// applied. Delete events replayed from a committed transaction only carry the
/// `_id` of the removed document.
///
/// ```ignore
/// collection.subscribe(CollectionEventListener::new(|event: CollectionEventInfo| {
///     match event.event_type() {
///         CollectionEvents::Insert => println!("inserted {:?}", event.item().id()),
///         _ => {}
///     }
///     Ok(())
/// }));
/// ```
#[derive(Clone)]
pub struct CollectionEventInfo {
    inner: Arc<CollectionEventInner>,
}

impl CollectionEventInfo {
    /// Creates a new event stamped with the current time.
    pub fn new(item: Document, event_type: CollectionEvents) -> Self {
        CollectionEventInfo {
            inner: Arc::new(CollectionEventInner {
                item,
                event_type,
                timestamp: get_current_time_or_zero(),
            }),
        }
    }

    pub fn event_type(&self) -> CollectionEvents {
        self.inner.event_type
    }

    /// The document snapshot associated with this event.
    pub fn item(&self) -> &Document {
        &self.inner.item
    }

    /// Milliseconds since the Unix epoch at which the event was created.
    pub fn timestamp(&self) -> u128 {
        self.inner.timestamp
    }
}

impl Debug for CollectionEventInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionEventInfo")
            .field("item", &self.item())
            .field("event_type", &self.event_type())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

struct CollectionEventInner {
    item: Document,
    event_type: CollectionEvents,
    timestamp: u128,
}

/// Signature of closure based event handlers.
///
/// Any `Fn(CollectionEventInfo) -> JotResult<()>` that is `Send + Sync`
/// implements this trait.
pub trait CollectionEventCallback: Send + Sync + Fn(CollectionEventInfo) -> JotResult<()> {}

impl<F> CollectionEventCallback for F where F: Send + Sync + Fn(CollectionEventInfo) -> JotResult<()> {}

/// Listener for collection events.
///
/// Listeners run synchronously on the thread that applied the change, after
/// the collection has released its lock, so a listener may read from the
/// collection it observes. Errors returned by a listener are logged and do not
/// affect the mutation or the other listeners.
#[derive(Clone)]
pub struct CollectionEventListener {
    on_event: Arc<dyn CollectionEventCallback>,
}

impl CollectionEventListener {
    /// Creates a new event listener wrapping the provided callback.
    ///
    /// # Arguments
    ///
    /// * `on_event` - A closure matching the [CollectionEventCallback] signature
    pub fn new(on_event: impl CollectionEventCallback + 'static) -> Self {
        CollectionEventListener {
            on_event: Arc::new(on_event),
        }
    }

    pub(crate) fn handle(&self, event: CollectionEventInfo) -> JotResult<()> {
        (self.on_event)(event)
    }
}

impl Debug for CollectionEventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionEventListener").finish()
    }
}
