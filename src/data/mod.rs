pub mod db;
pub mod expense_repository;
pub mod income_repository;
pub mod investment_repository;
pub mod user_repository;
