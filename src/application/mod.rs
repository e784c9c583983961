pub mod dto;
pub mod reports;
pub mod scheduling;
