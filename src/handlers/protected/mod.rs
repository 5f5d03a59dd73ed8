pub mod mappings;
pub mod me;
pub mod organizations;
pub mod resources;
pub mod users;
