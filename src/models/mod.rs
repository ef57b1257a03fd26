pub mod blacklist;
pub mod catalog;
pub mod error;
pub mod game;
pub mod launch_options;
pub mod library;
pub mod paths;
