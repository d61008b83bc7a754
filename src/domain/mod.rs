pub mod dashboard;
pub mod enums;
pub mod error;
pub mod expense;
pub mod income;
pub mod investment;
pub mod period;
pub mod report;
pub mod repository;
pub mod user;
pub mod validation;
