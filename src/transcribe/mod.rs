pub mod artifacts;
pub mod backend;
pub mod command;
pub mod format;
pub mod locks;
pub mod progress;
pub mod runner;
pub mod stage;
pub mod workspace;
