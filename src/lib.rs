pub mod backend;
pub mod crawler;
pub mod dispatch;
pub mod input;
pub mod settings;
pub mod target;
