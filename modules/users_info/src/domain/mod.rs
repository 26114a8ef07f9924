pub mod age;
pub mod error;
pub mod merge;
pub mod ports;
pub mod range;
pub mod repo;
pub mod service;
pub mod validation;
pub mod violations;
