pub mod identity;
pub mod location;
pub mod product;
pub mod query;
pub mod report;
pub mod stats;
