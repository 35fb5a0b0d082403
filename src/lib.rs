#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, routing"]
#![doc = "configuration, and error handling for the taskboard application. It is used"]
#![doc = "by the main binary (`main.rs`) to construct and run the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
