pub mod action;
pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod event;
pub mod i18n;
pub mod input;
pub mod nav;
pub mod presenter;
pub mod store;
pub mod theme;
pub mod tui;
pub mod widgets;
pub mod worker;

#[cfg(test)]
mod testing;
