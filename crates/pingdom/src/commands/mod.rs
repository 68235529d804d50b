pub mod maintenance;
pub mod occurrence;
