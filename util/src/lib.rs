pub mod config;
pub mod filters;
pub mod locks;
pub mod paths;
