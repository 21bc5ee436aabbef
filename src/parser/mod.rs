pub mod header;
pub mod loader;
pub mod timestamp;

pub use header::*;
pub use loader::*;
pub use timestamp::*;
