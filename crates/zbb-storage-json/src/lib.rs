use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::info;
use uuid::Uuid;
use zbb_core::{LedgerRepository, RepositoryError};
use zbb_domain::{
    Account, BudgetRowFields, Category, DateRange, LedgerSnapshot, MonthId, MonthlyBudget,
    Transaction, UserId,
};

const SNAPSHOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const USERS_DIR: &str = "users";

/// Filesystem-backed JSON persistence, one snapshot file per user.
///
/// Every write is a read-modify-write of the user's file under a process-wide
/// lock, so the (category, month) uniqueness check and the insert are atomic
/// for all handles sharing this repository.
#[derive(Debug)]
pub struct JsonLedgerRepository {
    users_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonLedgerRepository {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let users_dir = root.into().join(USERS_DIR);
        fs::create_dir_all(&users_dir)?;
        Ok(Self {
            users_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn user_path(&self, user: &UserId) -> PathBuf {
        self.users_dir
            .join(format!("{}.{}", canonical_name(user.as_str()), SNAPSHOT_EXTENSION))
    }

    /// Snapshot of `user`; empty when nothing was stored yet.
    pub fn load_snapshot(&self, user: &UserId) -> Result<LedgerSnapshot, RepositoryError> {
        let _guard = self.guard()?;
        self.read_snapshot(user)
    }

    /// Replaces every record of `user`.
    pub fn replace_snapshot(
        &self,
        user: &UserId,
        snapshot: &LedgerSnapshot,
    ) -> Result<(), RepositoryError> {
        let _guard = self.guard()?;
        self.write_snapshot(user, snapshot)
    }

    /// Loads a snapshot file and stores it as the records of `user`.
    pub fn import_from_path(&self, user: &UserId, path: &Path) -> Result<LedgerSnapshot, RepositoryError> {
        let snapshot = load_snapshot_from_path(path)?;
        self.replace_snapshot(user, &snapshot)?;
        info!(
            user = %user,
            categories = snapshot.categories.len(),
            transactions = snapshot.transactions.len(),
            "imported ledger snapshot"
        );
        Ok(snapshot)
    }

    pub fn add_category(&self, user: &UserId, category: Category) -> Result<Uuid, RepositoryError> {
        self.modify(user, |snapshot| snapshot.add_category(category))
    }

    pub fn add_transaction(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Uuid, RepositoryError> {
        self.modify(user, |snapshot| snapshot.add_transaction(transaction))
    }

    pub fn add_account(&self, user: &UserId, account: Account) -> Result<Uuid, RepositoryError> {
        self.modify(user, |snapshot| snapshot.add_account(account))
    }

    pub fn remove_transaction(&self, user: &UserId, id: Uuid) -> Result<bool, RepositoryError> {
        self.modify(user, |snapshot| snapshot.remove_transaction(id))
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, RepositoryError> {
        self.lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ledger file lock poisoned".into()))
    }

    fn read_snapshot(&self, user: &UserId) -> Result<LedgerSnapshot, RepositoryError> {
        let path = self.user_path(user);
        if !path.exists() {
            return Ok(LedgerSnapshot::default());
        }
        load_snapshot_from_path(&path)
    }

    fn write_snapshot(&self, user: &UserId, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError> {
        save_snapshot_to_path(snapshot, &self.user_path(user))
    }

    fn read<T>(&self, user: &UserId, f: impl FnOnce(&LedgerSnapshot) -> T) -> Result<T, RepositoryError> {
        let _guard = self.guard()?;
        Ok(f(&self.read_snapshot(user)?))
    }

    fn modify<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut LedgerSnapshot) -> T,
    ) -> Result<T, RepositoryError> {
        let _guard = self.guard()?;
        let mut snapshot = self.read_snapshot(user)?;
        let result = f(&mut snapshot);
        self.write_snapshot(user, &snapshot)?;
        Ok(result)
    }
}

impl LedgerRepository for JsonLedgerRepository {
    fn list_active_categories(&self, user: &UserId) -> Result<Vec<Category>, RepositoryError> {
        self.read(user, LedgerSnapshot::active_categories)
    }

    fn get_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Option<Category>, RepositoryError> {
        self.read(user, |snapshot| snapshot.category(category_id).cloned())
    }

    fn list_transactions(
        &self,
        user: &UserId,
        range: Option<DateRange>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        self.read(user, |snapshot| {
            snapshot.transactions_matching(range.as_ref(), category_id)
        })
    }

    fn list_budget_rows(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_rows_for_month(month))
    }

    fn list_budget_rows_for_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_rows_for_category(category_id))
    }

    fn get_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
    ) -> Result<Option<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_row(category_id, month).cloned())
    }

    fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, RepositoryError> {
        self.read(user, |snapshot| snapshot.accounts.clone())
    }

    fn insert_budget_row(&self, user: &UserId, row: &MonthlyBudget) -> Result<(), RepositoryError> {
        let _guard = self.guard()?;
        let mut snapshot = self.read_snapshot(user)?;
        if !snapshot.insert_budget_row(row.clone()) {
            return Err(RepositoryError::Conflict(format!(
                "budget row for category {} in {} already exists",
                row.category_id, row.month
            )));
        }
        self.write_snapshot(user, &snapshot)
    }

    fn upsert_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
        fields: &BudgetRowFields,
    ) -> Result<MonthlyBudget, RepositoryError> {
        self.modify(user, |snapshot| snapshot.upsert_budget_row(category_id, month, fields))
    }
}

/// Saves a snapshot to an arbitrary path on disk.
pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_snapshot(snapshot)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a snapshot from the provided filesystem path.
pub fn load_snapshot_from_path(path: &Path) -> Result<LedgerSnapshot, RepositoryError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| RepositoryError::Serde(err.to_string()))
}

/// Lossless file stem for a user id. Lowercase ASCII letters, digits and `-`
/// pass through; every other byte becomes `_` followed by two hex digits.
fn canonical_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("_{byte:02x}")),
        }
    }
    encoded
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_snapshot(snapshot: &LedgerSnapshot) -> Result<String, RepositoryError> {
    serde_json::to_string_pretty(snapshot).map_err(|err| RepositoryError::Serde(err.to_string()))
}
