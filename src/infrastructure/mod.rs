pub mod db;
pub mod schedule_repo;
