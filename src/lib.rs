pub mod build_model;
pub mod cache;
pub mod config;
pub mod dependency;
pub mod errors;
pub mod origin;
pub mod overrides;
pub mod platform;
pub mod pom;
pub mod types;
