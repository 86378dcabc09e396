pub mod app;
pub mod bus;
pub mod clipboard;
pub mod events;
pub mod feed;
pub mod i18n;
pub mod overlay;
pub mod palette;
pub mod theme;
pub mod ui;
pub mod usage;
