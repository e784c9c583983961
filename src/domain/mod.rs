pub mod auth_model;
pub mod schedule_model;
