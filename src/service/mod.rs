pub mod access;
pub mod background_jobs;
pub mod catalog_service;
pub mod enrollment_service;
pub mod error;
pub mod identity;
pub mod plan_service;
pub mod user_service;
