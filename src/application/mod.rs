pub mod auth_service;
pub mod dashboard_service;
pub mod expense_service;
pub mod income_service;
pub mod investment_service;
pub mod report_service;
pub mod user_service;
