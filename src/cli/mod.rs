pub mod commands;
pub mod dispatch;
pub mod terminal;
pub mod view;
