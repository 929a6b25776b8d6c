pub mod cardinality;
pub mod config;
pub mod db;
pub mod error;
pub mod flatten;
pub mod plan;
pub mod record;
pub mod runner;
pub mod tables;
