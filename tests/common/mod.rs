#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use zbb_budget::{
    domain::{
        Account, Category, CategoryKind, LedgerSnapshot, MonthId, Money, MonthlyBudget,
        RolloverStrategy, Transaction, UserId,
    },
    storage::save_snapshot_to_path,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory usable as `ZBB_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn user() -> UserId {
    UserId::new("alice").expect("user id")
}

pub fn money(raw: &str) -> Money {
    Money::parse(raw).expect("amount")
}

pub fn month(raw: &str) -> MonthId {
    MonthId::parse(raw).expect("month")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

/// A small January 2024 household ledger.
pub struct Household {
    pub snapshot: LedgerSnapshot,
    pub salary: Category,
    pub rent: Category,
    pub groceries: Category,
}

pub fn household() -> Household {
    let salary = Category::new("Salary", CategoryKind::Income).with_sort_order(0);
    let rent = Category::new("Rent", CategoryKind::Fix)
        .with_strategy(RolloverStrategy::Reset)
        .with_target(money("1000.00"))
        .with_sort_order(1);
    let groceries = Category::new("Groceries", CategoryKind::Variable)
        .with_strategy(RolloverStrategy::Accumulate)
        .with_sort_order(2);
    let checking = Account::new("Checking", money("500.00"));

    let mut snapshot = LedgerSnapshot::new();
    snapshot.add_category(salary.clone());
    snapshot.add_category(rent.clone());
    snapshot.add_category(groceries.clone());
    let checking_id = snapshot.add_account(checking);
    for (category, amount, on) in [
        (salary.id, "3000.00", date(2024, 1, 1)),
        (rent.id, "-1000.00", date(2024, 1, 3)),
        (groceries.id, "-200.00", date(2024, 1, 10)),
        (groceries.id, "-150.00", date(2024, 1, 24)),
    ] {
        snapshot.add_transaction(
            Transaction::new(money(amount), on)
                .with_category(category)
                .with_account(checking_id),
        );
    }
    snapshot.insert_budget_row(MonthlyBudget::new(
        rent.id,
        month("2024-01"),
        money("1000.00"),
        Money::ZERO,
    ));
    snapshot.insert_budget_row(MonthlyBudget::new(
        groceries.id,
        month("2024-01"),
        money("300.00"),
        Money::ZERO,
    ));

    Household {
        snapshot,
        salary,
        rent,
        groceries,
    }
}

pub fn write_snapshot(dir: &Path, snapshot: &LedgerSnapshot) -> PathBuf {
    let path = dir.join("snapshot.json");
    save_snapshot_to_path(snapshot, &path).expect("write snapshot");
    path
}

/// `zbb_cli` pointed at `home`, colors off and logging at defaults.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("zbb_cli").expect("zbb_cli binary");
    cmd.env("ZBB_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
