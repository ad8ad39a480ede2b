pub mod auth;
pub mod enrollments;
pub mod plans;
pub mod services;
pub mod users;
