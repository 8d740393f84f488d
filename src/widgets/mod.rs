pub mod command_input;
pub mod error_toast;
pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod timeline;
