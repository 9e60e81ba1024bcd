pub mod policy;
pub mod vehicle;
