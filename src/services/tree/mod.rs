pub mod build;
pub mod mutation;
pub mod scheduler;
