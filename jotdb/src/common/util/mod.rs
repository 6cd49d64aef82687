mod date_utils;
mod document_utils;
mod id_utils;

pub use date_utils::*;
pub use document_utils::*;
pub use id_utils::*;
