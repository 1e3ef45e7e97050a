pub mod cli;
pub mod commands;
pub mod menu;
pub mod render;
