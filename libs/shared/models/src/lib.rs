pub mod address;
pub mod appointment;
pub mod auth;
pub mod error;
pub mod pagination;
pub mod patient;
pub mod physician;
pub mod validation;
