pub mod analytics;
pub mod budget;
pub mod content;
pub mod expense;
pub mod game;
pub mod page;
pub mod portfolio;
pub mod quiz;
pub mod record;
pub mod savings;
pub mod session;
pub mod settings;
pub mod stock;
pub mod student;
