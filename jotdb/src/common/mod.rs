mod constants;
mod event_bus;
mod security;
mod sort_order;
pub mod util;
mod value;

pub use constants::*;
pub use event_bus::*;
pub(crate) use security::*;
pub use sort_order::*;
pub use value::*;
