pub mod collector;
pub mod config;
pub mod domain;
pub mod errors;
pub mod exec;
pub mod models;
pub mod publisher;
pub mod source;
pub mod startup;
pub mod storage;
