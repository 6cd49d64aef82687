// doc constants
pub const DOC_ID: &str = "_id";
pub const DOC_CREATED: &str = "_created";
pub const DOC_UPDATED: &str = "_updated";
pub const DOC_DELETED: &str = "_deleted";
pub const DOC_REVISIONS: &str = "_revisions";
pub const RESERVED_FIELDS: [&str; 5] = [DOC_ID, DOC_CREATED, DOC_UPDATED, DOC_DELETED, DOC_REVISIONS];

// revision entry keys
pub const REVISION_ID: &str = "revisionId";
pub const REVISION_TIMESTAMP: &str = "timestamp";
pub const REVISION_ACTION: &str = "action";

// field path separator
pub const FIELD_SEPARATOR: char = '.';

// index constants
pub const KEY_SEPARATOR: &str = "|";
pub const NULL_KEY: &str = "NULL";
pub const INDEX_NAME_SEPARATOR: &str = "_";

// storage constants
pub const DOCUMENTS_SUFFIX: &str = ".json";
pub const INDEXES_SUFFIX: &str = ".indexes.json";
pub const FULL_TEXT_SUFFIX: &str = ".fts.json";
pub const TEMP_SUFFIX: &str = ".tmp";
pub const DEFAULT_COLLECTION_NAME: &str = "documents";
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

// security constants
pub const ENCRYPTED_PREFIX: &str = "enc:";
pub const KEY_SALT_PREFIX: &str = "jotdb-field-key:";

pub const JOTDB_VERSION: &str = env!("CARGO_PKG_VERSION");
