// ═══════════════════════════════════════════════════════════════════
// Service Tests: market, investment, analytics, budget, expenses,
// savings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use finplay_core::errors::CoreError;
use finplay_core::models::expense::{Expense, ExpenseCategory, ExpenseFilter};
use finplay_core::models::portfolio::{HistoryEntry, Portfolio, TradeKind};
use finplay_core::models::record::RecordId;
use finplay_core::models::savings::{Priority, SavingsGoal};
use finplay_core::models::stock::{Sector, Stock};
use finplay_core::models::budget::Budget;
use finplay_core::services::analytics_service::AnalyticsService;
use finplay_core::services::budget_service::BudgetService;
use finplay_core::services::expense_service::{ExpenseService, CSV_HEADER};
use finplay_core::services::investment_service::InvestmentService;
use finplay_core::services::market::{next_price, round_cents, trend, Market, PRICE_FLOOR};
use finplay_core::services::savings_service::{GoalDraft, SavingsService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two-stock market: TECH at 150 (Technology), FOOD at 40 (Food).
fn fixed_market() -> Market {
    Market::from_stocks(
        vec![
            Stock::new(1, "TECH", "TechCorp", Sector::Technology, 150.0, 0.05),
            Stock::new(2, "FOOD", "FoodServices", Sector::Food, 40.0, 0.02),
        ],
        7,
    )
    .unwrap()
}

fn all_time() -> ExpenseFilter {
    ExpenseFilter {
        category: None,
        from: date(2000, 1, 1),
        to: date(2100, 1, 1),
    }
}

fn entry(day: u32, total: f64) -> HistoryEntry {
    HistoryEntry {
        day,
        cash: total,
        investments: 0.0,
        total,
    }
}

// ── Market ──────────────────────────────────────────────────────────

mod market {
    use super::*;

    #[test]
    fn default_universe() {
        let m = Market::seeded(1);
        assert_eq!(m.stocks().len(), 8);
        let ids: Vec<u32> = m.stocks().iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        for s in m.stocks() {
            assert!(s.price >= 20.0 && s.price <= 120.0, "{} at {}", s.symbol, s.price);
            assert!(s.history.is_empty());
        }
        assert_eq!(m.stock(1).unwrap().name, "TechCorp");
    }

    #[test]
    fn seeded_markets_are_reproducible() {
        let mut a = Market::seeded(42);
        let mut b = Market::seeded(42);
        assert_eq!(a.stocks(), b.stocks());
        for day in 1..=10 {
            a.advance(day);
            b.advance(day);
        }
        assert_eq!(a.stocks(), b.stocks());
    }

    #[test]
    fn advance_records_history_and_change() {
        let mut m = fixed_market();
        m.advance(1);
        let tech = m.stock(1).unwrap();
        assert_eq!(tech.previous_price, Some(150.0));
        assert_eq!(tech.history.len(), 1);
        assert_eq!(tech.history[0].day, 1);
        assert_eq!(tech.history[0].price, tech.price);
        let expected = (tech.price - 150.0) / 150.0 * 100.0;
        assert!((tech.percent_change - expected).abs() < 1e-9);
        // trend 0.02·sin(0.1) ≈ 0.002 plus at most 5 % noise
        assert!(tech.price >= 142.0 && tech.price <= 158.0);
    }

    #[test]
    fn next_price_formula() {
        assert_eq!(trend(0), 0.0);
        assert_eq!(next_price(100.0, 0, 0.05, 1.0), 105.0);
        assert_eq!(next_price(100.0, 0, 0.05, -1.0), 95.0);
        let with_trend = next_price(100.0, 10, 0.0, 0.0);
        assert_eq!(with_trend, round_cents(100.0 + 100.0 * (1.0f64).sin() * 0.02));
    }

    #[test]
    fn next_price_has_a_floor() {
        assert_eq!(next_price(0.01, 0, 0.5, -1.0), PRICE_FLOOR);
        assert_eq!(next_price(1.0, 0, 2.0, -1.0), PRICE_FLOOR);
    }

    #[test]
    fn prices_never_go_below_floor() {
        let mut m = Market::from_stocks(
            vec![Stock::new(1, "PENNY", "Penny", Sector::Retail, 0.02, 0.9)],
            3,
        )
        .unwrap();
        for day in 1..=200 {
            m.advance(day);
            assert!(m.stock(1).unwrap().price >= PRICE_FLOOR);
        }
    }

    #[test]
    fn rounding_to_cents() {
        assert_eq!(round_cents(10.005_1), 10.01);
        assert_eq!(round_cents(3.14159), 3.14);
    }

    #[test]
    fn from_stocks_rejects_duplicates_and_bad_prices() {
        let dup = Market::from_stocks(
            vec![
                Stock::new(1, "A", "A", Sector::Energy, 10.0, 0.1),
                Stock::new(1, "B", "B", Sector::Energy, 10.0, 0.1),
            ],
            0,
        );
        assert!(matches!(dup, Err(CoreError::ValidationError(_))));
        let bad = Market::from_stocks(vec![Stock::new(1, "A", "A", Sector::Energy, 0.0, 0.1)], 0);
        assert!(bad.is_err());
    }

    #[test]
    fn set_price_validates() {
        let mut m = fixed_market();
        m.set_price(1, 160.0).unwrap();
        assert_eq!(m.price_of(1).unwrap(), 160.0);
        assert!(m.set_price(1, -5.0).is_err());
        assert!(matches!(m.set_price(99, 5.0), Err(CoreError::NotFound { kind: "Stock", .. })));
    }
}

// ── Investment ──────────────────────────────────────────────────────

mod investment {
    use super::*;

    #[test]
    fn buy_then_sell_at_profit() {
        let svc = InvestmentService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::with_cash(100_000.0);

        let tx = svc.buy(&mut p, &market, 1, 10).unwrap();
        assert_eq!(tx.kind, TradeKind::Buy);
        assert_eq!(tx.total, 1500.0);
        assert_eq!(p.cash, 98_500.0);
        let pos = p.position(1).unwrap();
        assert_eq!((pos.shares, pos.average_price, pos.purchase_price), (10, 150.0, 150.0));

        market.set_price(1, 160.0).unwrap();
        let receipt = svc.sell(&mut p, &market, 1, 10).unwrap();
        assert_eq!(receipt.proceeds, 1600.0);
        assert_eq!(receipt.profit, 100.0);
        assert!(receipt.position_closed);
        assert_eq!(p.cash, 100_100.0);
        assert!(p.position(1).is_none());
        assert_eq!(p.realized_profit(), 100.0);
        assert_eq!(p.transactions.len(), 2);
    }

    #[test]
    fn average_price_is_weighted() {
        let svc = InvestmentService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::with_cash(10_000.0);
        svc.buy(&mut p, &market, 2, 10).unwrap();
        market.set_price(2, 50.0).unwrap();
        svc.buy(&mut p, &market, 2, 30).unwrap();
        let pos = p.position(2).unwrap();
        assert_eq!(pos.shares, 40);
        assert!((pos.average_price - 47.5).abs() < 1e-9);
        assert_eq!(pos.purchase_price, 40.0);
    }

    #[test]
    fn buy_rejects_overspending() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::with_cash(1000.0);
        let err = svc.buy(&mut p, &market, 1, 7).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientCash { cost, available } if cost == 1050.0 && available == 1000.0));
        assert_eq!(p.cash, 1000.0);
        assert!(p.investments.is_empty());
        assert!(p.transactions.is_empty());
    }

    #[test]
    fn buy_exact_cash_is_allowed() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::with_cash(400.0);
        svc.buy(&mut p, &market, 2, 10).unwrap();
        assert_eq!(p.cash, 0.0);
    }

    #[test]
    fn zero_quantity_rejected() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        assert!(matches!(svc.buy(&mut p, &market, 1, 0), Err(CoreError::ValidationError(_))));
        assert!(matches!(svc.sell(&mut p, &market, 1, 0), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn unknown_stock_rejected() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        assert!(matches!(svc.buy(&mut p, &market, 42, 1), Err(CoreError::NotFound { kind: "Stock", .. })));
    }

    #[test]
    fn sell_more_than_held() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 2, 5).unwrap();
        let err = svc.sell(&mut p, &market, 2, 6).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientShares { requested: 6, held: 5, .. }));
        assert_eq!(p.shares_of(2), 5);
    }

    #[test]
    fn sell_without_position() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        assert!(matches!(svc.sell(&mut p, &market, 1, 1), Err(CoreError::NotFound { kind: "Position", .. })));
        assert!(svc.sell_all(&mut p, &market, 1).is_err());
    }

    #[test]
    fn partial_sell_keeps_position() {
        let svc = InvestmentService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 2, 10).unwrap();
        market.set_price(2, 30.0).unwrap();
        let receipt = svc.sell(&mut p, &market, 2, 4).unwrap();
        assert!(!receipt.position_closed);
        assert_eq!(receipt.profit, -40.0);
        assert_eq!(p.shares_of(2), 6);
        assert_eq!(p.position(2).unwrap().average_price, 40.0);
    }

    #[test]
    fn sell_all_liquidates() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 1, 3).unwrap();
        let receipt = svc.sell_all(&mut p, &market, 1).unwrap();
        assert!(receipt.position_closed);
        assert_eq!(p.cash, 10_000.0);
    }

    #[test]
    fn simulate_day_records_history() {
        let svc = InvestmentService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 1, 10).unwrap();

        let entry = svc.simulate_day(&mut p, &mut market, 30).unwrap();
        assert_eq!(entry.day, 1);
        assert_eq!(p.current_day, 2);
        assert_eq!(p.history.len(), 1);
        assert_eq!(entry.cash, p.cash);
        assert!((entry.investments - market.price_of(1).unwrap() * 10.0).abs() < 1e-9);
        assert!((entry.total - svc.total_value(&p, &market)).abs() < 1e-9);
    }

    #[test]
    fn simulation_stops_at_day_limit() {
        let svc = InvestmentService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::default();
        for _ in 1..5 {
            svc.simulate_day(&mut p, &mut market, 5).unwrap();
        }
        assert_eq!(p.current_day, 5);
        let err = svc.simulate_day(&mut p, &mut market, 5).unwrap_err();
        assert!(matches!(err, CoreError::SimulationComplete(5)));
        assert_eq!(p.history.len(), 4);
    }

    #[test]
    fn total_value_invariant_holds() {
        let svc = InvestmentService::new();
        let mut market = Market::seeded(9);
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 1, 5).unwrap();
        svc.buy(&mut p, &market, 3, 8).unwrap();
        for _ in 0..5 {
            svc.simulate_day(&mut p, &mut market, 30).unwrap();
        }
        svc.sell(&mut p, &market, 3, 2).unwrap();
        let expected: f64 = p.cash
            + p.investments
                .iter()
                .map(|pos| market.price_of(pos.stock_id).unwrap() * f64::from(pos.shares))
                .sum::<f64>();
        assert!((svc.total_value(&p, &market) - expected).abs() < 1e-9);
    }

    #[test]
    fn watchlist() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        assert!(svc.watch(&mut p, &market, 1).unwrap());
        assert!(!svc.watch(&mut p, &market, 1).unwrap());
        assert!(svc.watch(&mut p, &market, 77).is_err());
        assert!(svc.unwatch(&mut p, 1));
        assert!(!svc.unwatch(&mut p, 1));
    }

    #[test]
    fn transactions_newest_first() {
        let svc = InvestmentService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        svc.buy(&mut p, &market, 1, 1).unwrap();
        svc.buy(&mut p, &market, 2, 1).unwrap();
        let txs = svc.transactions(&p);
        assert_eq!(txs[0].symbol, "FOOD");
        assert_eq!(txs[1].symbol, "TECH");
    }
}

// ── Analytics ───────────────────────────────────────────────────────

mod analytics {
    use super::*;

    #[test]
    fn summary_values() {
        let inv = InvestmentService::new();
        let svc = AnalyticsService::new();
        let mut market = fixed_market();
        let mut p = Portfolio::with_cash(10_000.0);
        inv.buy(&mut p, &market, 1, 10).unwrap(); // 1500
        inv.buy(&mut p, &market, 2, 25).unwrap(); // 1000
        market.set_price(1, 165.0).unwrap();

        let s = svc.summary(&p, &market, 10_000.0);
        assert_eq!(s.cash, 7_500.0);
        assert_eq!(s.investments_value, 2_650.0);
        assert_eq!(s.total_value, 10_150.0);
        assert_eq!(s.cost_basis, 2_500.0);
        assert_eq!(s.unrealized_gain, 150.0);
        assert!((s.unrealized_gain_pct - 6.0).abs() < 1e-9);
        assert!((s.total_return_pct - 1.5).abs() < 1e-9);
        assert_eq!(s.positions.len(), 2);
        assert_eq!(s.positions[0].symbol, "TECH");
        assert!((s.positions[0].gain_pct - 10.0).abs() < 1e-9);
        let alloc: f64 = s.positions.iter().map(|p| p.allocation_pct).sum();
        assert!((alloc - 100.0).abs() < 1e-9);
        assert!(s.sharpe_ratio.is_none());
    }

    #[test]
    fn empty_portfolio_summary() {
        let svc = AnalyticsService::new();
        let s = svc.summary(&Portfolio::default(), &fixed_market(), 10_000.0);
        assert_eq!(s.investments_value, 0.0);
        assert_eq!(s.unrealized_gain_pct, 0.0);
        assert_eq!(s.total_return_pct, 0.0);
        assert!(s.sectors.is_empty());
    }

    #[test]
    fn sectors_sorted_by_value() {
        let inv = InvestmentService::new();
        let svc = AnalyticsService::new();
        let market = fixed_market();
        let mut p = Portfolio::default();
        inv.buy(&mut p, &market, 2, 50).unwrap(); // 2000 Food
        inv.buy(&mut p, &market, 1, 4).unwrap(); // 600 Technology
        let sectors = svc.sector_allocation(&p, &market);
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].sector, Sector::Food);
        assert_eq!(sectors[0].value, 2_000.0);
        assert!((sectors[1].pct - 600.0 / 2_600.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn sharpe_needs_two_returns() {
        let svc = AnalyticsService::new();
        assert!(svc.sharpe_ratio(&[]).is_none());
        assert!(svc.sharpe_ratio(&[entry(1, 100.0), entry(2, 110.0)]).is_none());
    }

    #[test]
    fn sharpe_flat_returns() {
        let svc = AnalyticsService::new();
        let flat: Vec<HistoryEntry> = (1..=5).map(|d| entry(d, 100.0)).collect();
        assert!(svc.sharpe_ratio(&flat).is_none());
    }

    #[test]
    fn sharpe_mean_over_stdev() {
        let svc = AnalyticsService::new();
        // Returns: +10 %, 0 %  → mean 5, population stdev 5
        let history = [entry(1, 100.0), entry(2, 110.0), entry(3, 110.0)];
        let ratio = svc.sharpe_ratio(&history).unwrap();
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sharpe_uses_recent_window() {
        let svc = AnalyticsService::new();
        // A crash long ago, then steady alternating gains
        let mut history = vec![entry(1, 1_000.0), entry(2, 100.0)];
        let mut total = 100.0;
        for day in 3..=40 {
            total *= if day % 2 == 0 { 1.02 } else { 1.01 };
            history.push(entry(day, total));
        }
        let ratio = svc.sharpe_ratio(&history).unwrap();
        assert!(ratio > 1.0, "old crash leaked into the window: {ratio}");
    }
}

// ── Budget ──────────────────────────────────────────────────────────

mod budget {
    use super::*;

    #[test]
    fn summary_totals_and_ratio() {
        let svc = BudgetService::new();
        let mut b = Budget::default();
        svc.add_income(&mut b, "Allowance", 200.0).unwrap();
        svc.add_income(&mut b, "Job", 300.0).unwrap();
        svc.add_expense(&mut b, "Lunch", 100.0, ExpenseCategory::Food).unwrap();
        svc.add_expense(&mut b, "Snacks", 50.0, ExpenseCategory::Food).unwrap();
        svc.add_expense(&mut b, "Bus", 75.0, ExpenseCategory::Transportation).unwrap();

        let s = svc.summary(&b);
        assert_eq!(s.total_income, 500.0);
        assert_eq!(s.total_expenses, 225.0);
        assert_eq!(s.balance, 275.0);
        assert!(s.has_surplus());
        assert!((s.spending_ratio_pct.unwrap() - 45.0).abs() < 1e-9);
        assert_eq!(s.categories[0].category, ExpenseCategory::Food);
        assert_eq!(s.categories[0].total, 150.0);
        assert!((s.categories[1].pct - 75.0 / 225.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn no_income_means_no_ratio() {
        let svc = BudgetService::new();
        let mut b = Budget::default();
        svc.add_expense(&mut b, "Game", 20.0, ExpenseCategory::Entertainment).unwrap();
        let s = svc.summary(&b);
        assert!(s.spending_ratio_pct.is_none());
        assert_eq!(s.balance, -20.0);
        assert!(!s.has_surplus());
    }

    #[test]
    fn invalid_lines_rejected() {
        let svc = BudgetService::new();
        let mut b = Budget::default();
        assert!(svc.add_income(&mut b, "  ", 10.0).is_err());
        assert!(svc.add_income(&mut b, "Gift", 0.0).is_err());
        assert!(svc.add_expense(&mut b, "Bad", f64::NAN, ExpenseCategory::Other).is_err());
        assert!(b.incomes.is_empty() && b.expenses.is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let svc = BudgetService::new();
        let mut b = Budget::default();
        let item = svc.add_income(&mut b, "  Gift ", 10.0).unwrap();
        assert_eq!(item.name, "Gift");
    }

    #[test]
    fn remove_lines() {
        let svc = BudgetService::new();
        let mut b = Budget::default();
        let income = svc.add_income(&mut b, "Gift", 10.0).unwrap();
        let line = svc.add_expense(&mut b, "Book", 5.0, ExpenseCategory::Education).unwrap();
        assert_eq!(svc.remove_income(&mut b, &income.id).unwrap().name, "Gift");
        assert_eq!(svc.remove_expense(&mut b, &line.id).unwrap().name, "Book");
        assert!(svc.remove_income(&mut b, &income.id).is_err());
        assert!(matches!(
            svc.remove_expense(&mut b, &RecordId::new()),
            Err(CoreError::NotFound { kind: "Budget expense", .. })
        ));
    }
}

// ── Expenses ────────────────────────────────────────────────────────

mod expenses {
    use super::*;

    fn sample() -> Vec<Expense> {
        let svc = ExpenseService::new();
        let mut list = Vec::new();
        svc.add(&mut list, "Pizza", 12.5, ExpenseCategory::Food, date(2026, 3, 2)).unwrap();
        svc.add(&mut list, "Bus pass", 30.0, ExpenseCategory::Transportation, date(2026, 3, 10)).unwrap();
        svc.add(&mut list, "Burger, fries", 7.5, ExpenseCategory::Food, date(2026, 3, 5)).unwrap();
        list
    }

    #[test]
    fn add_validates() {
        let svc = ExpenseService::new();
        let mut list = Vec::new();
        assert!(svc.add(&mut list, "", 5.0, ExpenseCategory::Food, date(2026, 1, 1)).is_err());
        assert!(svc.add(&mut list, "Gum", -1.0, ExpenseCategory::Food, date(2026, 1, 1)).is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn filtered_newest_first() {
        let svc = ExpenseService::new();
        let list = sample();
        let view = svc.filtered(&list, &all_time());
        let names: Vec<&str> = view.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Bus pass", "Burger, fries", "Pizza"]);
    }

    #[test]
    fn totals_respect_filter() {
        let svc = ExpenseService::new();
        let list = sample();
        assert_eq!(svc.total(&list, &all_time()), 50.0);
        let food = ExpenseFilter {
            category: Some(ExpenseCategory::Food),
            ..all_time()
        };
        assert_eq!(svc.total(&list, &food), 20.0);
        let early = ExpenseFilter {
            category: None,
            from: date(2026, 3, 1),
            to: date(2026, 3, 5),
        };
        assert_eq!(svc.total(&list, &early), 20.0);
    }

    #[test]
    fn category_totals() {
        let svc = ExpenseService::new();
        let totals = svc.category_totals(&sample(), &all_time());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, ExpenseCategory::Food);
        assert_eq!(totals[0].total, 20.0);
        assert!((totals[0].pct - 40.0).abs() < 1e-9);
        assert!((totals[1].pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn csv_export() {
        let svc = ExpenseService::new();
        let csv = svc.export_csv(&sample(), &all_time());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "2026-03-10,Bus pass,Transportation,30.00");
        assert_eq!(lines[2], "2026-03-05,\"Burger, fries\",Food,7.50");
        assert_eq!(lines[3], "2026-03-02,Pizza,Food,12.50");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn csv_escapes_quotes() {
        let svc = ExpenseService::new();
        let mut list = Vec::new();
        svc.add(&mut list, "The \"big\" one", 1.0, ExpenseCategory::Other, date(2026, 1, 1)).unwrap();
        let csv = svc.export_csv(&list, &all_time());
        assert!(csv.ends_with("2026-01-01,\"The \"\"big\"\" one\",Other,1.00"));
    }

    #[test]
    fn empty_export_is_header_only() {
        let svc = ExpenseService::new();
        assert_eq!(svc.export_csv(&[], &all_time()), CSV_HEADER);
    }

    #[test]
    fn remove_expense() {
        let svc = ExpenseService::new();
        let mut list = sample();
        let id = list[0].id.clone();
        assert_eq!(svc.remove(&mut list, &id).unwrap().description, "Pizza");
        assert_eq!(list.len(), 2);
        assert!(matches!(svc.remove(&mut list, &id), Err(CoreError::NotFound { kind: "Expense", .. })));
    }
}

// ── Savings ─────────────────────────────────────────────────────────

mod savings {
    use super::*;

    fn goal(svc: &SavingsService, goals: &mut Vec<SavingsGoal>, name: &str, target: f64) -> SavingsGoal {
        svc.create(goals, GoalDraft::new(name, target, date(2026, 12, 31))).unwrap()
    }

    #[test]
    fn create_validates() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        assert!(svc.create(&mut goals, GoalDraft::new(" ", 10.0, date(2026, 1, 1))).is_err());
        assert!(svc.create(&mut goals, GoalDraft::new("Bike", 0.0, date(2026, 1, 1))).is_err());
        let mut no_deadline = GoalDraft::new("Bike", 10.0, date(2026, 1, 1));
        no_deadline.deadline = None;
        assert!(svc.create(&mut goals, no_deadline).is_err());
        assert!(goals.is_empty());
    }

    #[test]
    fn contributions_clamp_at_target() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let g = goal(&svc, &mut goals, "Headphones", 100.0);
        assert_eq!(svc.contribute(&mut goals, &g.id, 60.0).unwrap().progress_pct(), 60);
        let done = svc.contribute(&mut goals, &g.id, 60.0).unwrap();
        assert_eq!(done.current_amount, 100.0);
        assert!(done.is_complete());
    }

    #[test]
    fn contribution_must_be_positive() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let g = goal(&svc, &mut goals, "Headphones", 100.0);
        assert!(svc.contribute(&mut goals, &g.id, 0.0).is_err());
        assert!(svc.contribute(&mut goals, &RecordId::new(), 5.0).is_err());
    }

    #[test]
    fn update_clamps_progress() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let g = goal(&svc, &mut goals, "Trip", 500.0);
        svc.contribute(&mut goals, &g.id, 300.0).unwrap();
        let mut draft = GoalDraft::new("Short trip", 200.0, date(2026, 8, 1));
        draft.priority = Priority::High;
        let updated = svc.update(&mut goals, &g.id, draft).unwrap();
        assert_eq!(updated.name, "Short trip");
        assert_eq!(updated.current_amount, 200.0);
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.id, g.id);
    }

    #[test]
    fn overview() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let a = goal(&svc, &mut goals, "A", 100.0);
        let b = goal(&svc, &mut goals, "B", 300.0);
        svc.contribute(&mut goals, &a.id, 100.0).unwrap();
        svc.contribute(&mut goals, &b.id, 50.0).unwrap();
        let o = svc.overview(&goals);
        assert_eq!(o.total_saved, 150.0);
        assert_eq!(o.total_target, 400.0);
        assert_eq!(o.overall_progress_pct, 38);
        assert_eq!(o.completed_goals, 1);
        assert_eq!(svc.overview(&[]).overall_progress_pct, 0);
    }

    #[test]
    fn priority_order() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let mut low = GoalDraft::new("Low", 10.0, date(2026, 1, 1));
        low.priority = Priority::Low;
        let mut high_late = GoalDraft::new("High late", 10.0, date(2026, 9, 1));
        high_late.priority = Priority::High;
        let mut high_soon = GoalDraft::new("High soon", 10.0, date(2026, 2, 1));
        high_soon.priority = Priority::High;
        for d in [low, high_late, high_soon] {
            svc.create(&mut goals, d).unwrap();
        }
        let names: Vec<&str> = svc.by_priority(&goals).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["High soon", "High late", "Low"]);
    }

    #[test]
    fn delete_goal() {
        let svc = SavingsService::new();
        let mut goals = Vec::new();
        let g = goal(&svc, &mut goals, "A", 100.0);
        svc.delete(&mut goals, &g.id).unwrap();
        assert!(matches!(
            svc.delete(&mut goals, &g.id),
            Err(CoreError::NotFound { kind: "Savings goal", .. })
        ));
    }
}
