pub mod bottle;
pub mod cache;
pub mod catalog;
pub mod environment;
pub mod launcher;
pub mod library;
pub mod library_service;
pub mod manifest;
pub mod mount;
pub mod registry;
pub mod terminator;
pub mod transport;
