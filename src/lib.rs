pub mod app;
pub mod artwork;
pub mod catalog;
pub mod library;
pub mod player;
pub mod theme;
pub mod ui;
