pub mod parameter;
pub mod summary;
pub mod table;

pub use parameter::*;
pub use summary::*;
pub use table::*;
