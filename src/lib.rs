pub mod catalog;
pub mod config;
pub mod job;
pub mod present;
pub mod transcribe;
