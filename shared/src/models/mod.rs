//! Catalog and account models
//!
//! Flat documents: entities reference each other by id only.

pub mod account;
pub mod addition;
pub mod carousel;
pub mod category;
pub mod delivery;
pub mod discount;
pub mod product;
pub mod restaurant;
pub mod staff;

// Re-exports
pub use account::*;
pub use addition::*;
pub use carousel::*;
pub use category::*;
pub use delivery::*;
pub use discount::*;
pub use product::*;
pub use restaurant::*;
pub use staff::*;
