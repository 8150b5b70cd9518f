pub mod analytics_service;
pub mod budget_service;
pub mod expense_service;
pub mod investment_service;
pub mod market;
pub mod savings_service;
