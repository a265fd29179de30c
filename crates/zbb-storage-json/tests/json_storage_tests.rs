use std::{fs, thread};

use chrono::NaiveDate;
use tempfile::tempdir;
use zbb_core::{
    AssignmentService, BudgetLedger, LedgerRepository, MonthInitializer, RepositoryError,
};
use zbb_domain::{
    Category, CategoryKind, LedgerSnapshot, MonthId, Money, MonthlyBudget, RolloverStrategy,
    Transaction, UserId,
};
use zbb_storage_json::{load_snapshot_from_path, save_snapshot_to_path, JsonLedgerRepository};

fn user(name: &str) -> UserId {
    UserId::new(name).expect("user id")
}

fn month(raw: &str) -> MonthId {
    MonthId::parse(raw).expect("month")
}

#[test]
fn json_repository_persists_records_across_handles() {
    let dir = tempdir().expect("tempdir");
    let alice = user("alice");
    let category_id = {
        let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
        let id = repo
            .add_category(
                &alice,
                Category::new("Groceries", CategoryKind::Variable)
                    .with_strategy(RolloverStrategy::Accumulate),
            )
            .expect("add category");
        repo.add_transaction(
            &alice,
            Transaction::new(
                Money::parse("-42.10").expect("amount"),
                NaiveDate::from_ymd_opt(2024, 3, 9).expect("date"),
            )
            .with_category(id),
        )
        .expect("add transaction");
        AssignmentService::new(&repo)
            .assign_budget(&alice, id, month("2024-03"), Money::from_major(100))
            .expect("assign");
        id
    };

    let reopened = JsonLedgerRepository::new(dir.path()).expect("reopen repository");
    assert!(reopened.user_path(&alice).exists());
    let views = BudgetLedger::new(&reopened)
        .get_month_view(&alice, month("2024-03"))
        .expect("month view");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].category_id, category_id);
    assert_eq!(views[0].available.to_string(), "57.90");
}

#[test]
fn json_repository_keeps_users_apart() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
    repo.add_category(&user("alice"), Category::new("Rent", CategoryKind::Fix))
        .expect("add category");

    assert!(repo
        .list_active_categories(&user("bob"))
        .expect("list categories")
        .is_empty());
    assert_ne!(repo.user_path(&user("alice")), repo.user_path(&user("bob")));
}

#[test]
fn json_repository_separates_ids_differing_in_case_or_punctuation() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
    let owner = user("Alice");
    let id = repo
        .add_category(&owner, Category::new("Secret", CategoryKind::Variable))
        .expect("add category");
    repo.add_transaction(
        &owner,
        Transaction::new(
            Money::parse("-42.00").expect("amount"),
            NaiveDate::from_ymd_opt(2024, 5, 2).expect("date"),
        )
        .with_category(id),
    )
    .expect("add transaction");
    repo.add_category(&user("a@b"), Category::new("Travel", CategoryKind::Fix))
        .expect("add category");

    for other in ["alice", "ALICE", "a_b", "a-b"] {
        let other = user(other);
        assert_ne!(repo.user_path(&other), repo.user_path(&owner));
        assert!(repo
            .list_active_categories(&other)
            .expect("list categories")
            .is_empty());
        assert!(repo
            .list_transactions(&other, None, None)
            .expect("list transactions")
            .is_empty());
    }
    assert_eq!(repo.list_active_categories(&owner).expect("list").len(), 1);
    assert_eq!(repo.list_active_categories(&user("a@b")).expect("list").len(), 1);
}

#[test]
fn json_repository_rejects_duplicate_rows() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
    let alice = user("alice");
    let id = repo
        .add_category(&alice, Category::new("Phone", CategoryKind::Fix))
        .expect("add category");
    let row = MonthlyBudget::new(id, month("2024-01"), Money::ZERO, Money::ZERO);

    repo.insert_budget_row(&alice, &row).expect("first insert");
    let second = repo.insert_budget_row(&alice, &row);
    assert!(matches!(second, Err(RepositoryError::Conflict(_))));
    assert_eq!(
        repo.list_budget_rows(&alice, month("2024-01"))
            .expect("list rows")
            .len(),
        1
    );
}

#[test]
fn json_repository_serializes_concurrent_initialization() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
    let alice = user("alice");
    for name in ["Rent", "Phone", "Gym"] {
        repo.add_category(&alice, Category::new(name, CategoryKind::Fix))
            .expect("add category");
    }

    thread::scope(|scope| {
        for _ in 0..3 {
            let repo = &repo;
            let alice = alice.clone();
            scope.spawn(move || {
                MonthInitializer::new(repo)
                    .initialize_month(&alice, month("2024-02"))
                    .expect("initialize");
            });
        }
    });

    assert_eq!(
        repo.list_budget_rows(&alice, month("2024-02"))
            .expect("list rows")
            .len(),
        3
    );
}

#[test]
fn snapshot_files_round_trip_and_import() {
    let dir = tempdir().expect("tempdir");
    let mut snapshot = LedgerSnapshot::new();
    snapshot.add_category(Category::new("Salary", CategoryKind::Income));
    let export = dir.path().join("exports").join("ledger.json");
    save_snapshot_to_path(&snapshot, &export).expect("save snapshot");
    assert_eq!(load_snapshot_from_path(&export).expect("load snapshot"), snapshot);

    let repo = JsonLedgerRepository::new(dir.path().join("data")).expect("create repository");
    let imported = repo
        .import_from_path(&user("carol"), &export)
        .expect("import snapshot");
    assert_eq!(imported.categories.len(), 1);
    assert_eq!(repo.load_snapshot(&user("carol")).expect("load"), snapshot);
}

#[test]
fn corrupt_snapshot_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonLedgerRepository::new(dir.path()).expect("create repository");
    let alice = user("alice");
    fs::write(repo.user_path(&alice), "{ not json").expect("write corrupt file");

    let result = repo.list_active_categories(&alice);
    assert!(matches!(result, Err(RepositoryError::Serde(_))));
}
