pub mod document;
pub mod flags;
pub mod identity;
pub mod keys;
pub mod models;
pub mod service;
pub mod store;
