//! UI layer for desktop GUI: the form, the result panels and the app shell.

pub mod app;

pub use app::CropAdvisorApp;
