//! Backend worker: runs prediction requests off the UI thread.

pub mod commands;
pub mod runtime;
