pub mod dashboard;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod workflow;
