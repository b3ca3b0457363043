pub mod helpers;
pub mod records;
pub mod resources;
pub mod schema;
pub mod usage;
