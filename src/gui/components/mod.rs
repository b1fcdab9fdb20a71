//! Reusable GUI components

pub mod url_input;

pub use url_input::url_input;
