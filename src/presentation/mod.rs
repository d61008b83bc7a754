pub mod auth;
pub mod dashboard;
pub mod error;
pub mod expenses;
pub mod handlers;
pub mod incomes;
pub mod investments;
pub mod middleware;
pub mod params;
pub mod reports;
pub mod routes;
pub mod state;
pub mod users;
