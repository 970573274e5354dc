pub mod api;
pub mod cli;
pub mod command;
pub mod domain;
pub mod metadata;
pub mod navigation;
pub mod playback;
pub mod repository;
pub mod servers;
pub mod session;
pub mod startup;
pub mod terminal;
