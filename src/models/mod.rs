mod analytics;
mod collections;
mod equipment;
pub(crate) mod user;

pub use analytics::*;
pub use collections::*;
pub use equipment::*;
pub use user::*;
