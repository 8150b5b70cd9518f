use serde::{Deserialize, Serialize};

/// A dashboard feature card (`GET /student/features`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub path: String,
    pub category: String,
    #[serde(default)]
    pub xp_reward: u32,
}

/// An achievement badge (`GET /student/achievements`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub unlocked: bool,
}

fn feature(id: u32, title: &str, description: &str, path: &str, category: &str, xp: u32) -> Feature {
    Feature {
        id,
        title: title.to_string(),
        description: description.to_string(),
        path: path.to_string(),
        category: category.to_string(),
        xp_reward: xp,
    }
}

/// Built-in feature cards served when the API has nothing better.
pub fn default_features() -> Vec<Feature> {
    vec![
        feature(1, "Financial Literacy", "Learn the basics of personal finance and money management", "/learn/financial-literacy", "education", 50),
        feature(5, "Financial Quiz", "Test your financial knowledge", "/learn/financial-quiz", "education", 55),
        feature(6, "Budget Planner", "Plan income and expenses and see where your money goes", "/student/budget-planner", "finance", 40),
        feature(7, "Expense Tracker", "Track daily spending by category", "/student/expense-tracker", "finance", 30),
        feature(8, "Savings Goals", "Set goals and watch your savings grow", "/student/savings-goals", "finance", 35),
        feature(9, "Investment Simulator", "Practice investing with virtual money", "/student/investment-simulator", "finance", 60),
    ]
}

fn achievement(id: &str, title: &str, description: &str) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        unlocked: false,
    }
}

/// Built-in achievement list served when the API has nothing better.
pub fn default_achievements() -> Vec<Achievement> {
    vec![
        achievement("first-game", "First Steps", "Finish your first mini-game"),
        achievement("budget-hero", "Budget Hero", "Save a budget with a surplus"),
        achievement("smart-saver", "Smart Saver", "Complete a savings goal"),
        achievement("smart-investor", "Smart Investor", "Finish the 30-day investment simulation"),
        achievement("quiz-master", "Quiz Master", "Score 100% on the financial quiz"),
    ]
}
