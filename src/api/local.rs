//! Offline backend answering [`ExpenseApi`] calls from a SQLite file.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use rusqlite::Connection;

use super::{ApiResult, ExpenseApi};
use crate::db;
use crate::error::ApiError;
use crate::month::YearMonth;
use crate::types::{
    Account, AccountId, AccountPayload, Category, CategoryId, CategoryPayload, DashboardData, Tag,
    TagId, TagPayload, Transaction, TransactionPayload,
};

pub struct LocalStore {
    conn: Mutex<Connection>,
}

fn require_name(name: &str, kind: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::Rejected(format!("{kind} name cannot be empty.")));
    }
    Ok(())
}

impl LocalStore {
    pub fn open(path: &Path) -> ApiResult<Self> {
        tracing::info!(path = %path.display(), "opening local store");
        Ok(Self {
            conn: Mutex::new(db::init(path)?),
        })
    }

    pub fn in_memory() -> ApiResult<Self> {
        Ok(Self {
            conn: Mutex::new(db::init_in_memory()?),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExpenseApi for LocalStore {
    fn dashboard(&self, month: YearMonth) -> ApiResult<DashboardData> {
        let today = Local::now().date_naive();
        Ok(db::month_summary(month, today, &self.conn())?)
    }

    fn categories(&self) -> ApiResult<Vec<Category>> {
        Ok(db::query_categories(&self.conn())?)
    }

    fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category> {
        require_name(&payload.name, "Category")?;
        let conn = self.conn();
        if db::check_category_name_taken(&payload.name, None, &conn)? {
            return Err(ApiError::Rejected(format!(
                "Category '{}' already exists.",
                payload.name
            )));
        }
        let category = db::create_category(payload, &conn)?;
        tracing::info!(id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> ApiResult<Category> {
        require_name(&payload.name, "Category")?;
        let conn = self.conn();
        if db::check_category_name_taken(&payload.name, Some(id), &conn)? {
            return Err(ApiError::Rejected(format!(
                "Category '{}' already exists.",
                payload.name
            )));
        }
        if !db::update_category(id, payload, &conn)? {
            return Err(ApiError::NotFound(format!("category {id}")));
        }
        db::query_category_by_id(id, &conn)?
            .ok_or_else(|| ApiError::NotFound(format!("category {id}")))
    }

    fn delete_category(&self, id: CategoryId) -> ApiResult<()> {
        if !db::delete_category(id, &self.conn())? {
            return Err(ApiError::NotFound(format!("category {id}")));
        }
        tracing::info!(id, "category deleted");
        Ok(())
    }

    fn tags(&self) -> ApiResult<Vec<Tag>> {
        Ok(db::query_tags(&self.conn())?)
    }

    fn create_tag(&self, payload: &TagPayload) -> ApiResult<Tag> {
        require_name(&payload.name, "Tag")?;
        let conn = self.conn();
        if db::check_tag_name_taken(&payload.name, None, &conn)? {
            return Err(ApiError::Rejected(format!(
                "Tag '{}' already exists.",
                payload.name
            )));
        }
        Ok(db::create_tag(payload, &conn)?)
    }

    fn update_tag(&self, id: TagId, payload: &TagPayload) -> ApiResult<Tag> {
        require_name(&payload.name, "Tag")?;
        let conn = self.conn();
        if db::check_tag_name_taken(&payload.name, Some(id), &conn)? {
            return Err(ApiError::Rejected(format!(
                "Tag '{}' already exists.",
                payload.name
            )));
        }
        if !db::update_tag(id, payload, &conn)? {
            return Err(ApiError::NotFound(format!("tag {id}")));
        }
        db::query_tag_by_id(id, &conn)?.ok_or_else(|| ApiError::NotFound(format!("tag {id}")))
    }

    fn delete_tag(&self, id: TagId) -> ApiResult<()> {
        if !db::delete_tag(id, &self.conn())? {
            return Err(ApiError::NotFound(format!("tag {id}")));
        }
        Ok(())
    }

    fn accounts(&self) -> ApiResult<Vec<Account>> {
        Ok(db::query_accounts(&self.conn())?)
    }

    fn create_account(&self, payload: &AccountPayload) -> ApiResult<Account> {
        require_name(&payload.name, "Account")?;
        let conn = self.conn();
        if db::check_account_name_taken(&payload.name, None, &conn)? {
            return Err(ApiError::Rejected(format!(
                "Account '{}' already exists.",
                payload.name
            )));
        }
        Ok(db::create_account(payload, &conn)?)
    }

    fn update_account(&self, id: AccountId, payload: &AccountPayload) -> ApiResult<Account> {
        require_name(&payload.name, "Account")?;
        let conn = self.conn();
        if db::check_account_name_taken(&payload.name, Some(id), &conn)? {
            return Err(ApiError::Rejected(format!(
                "Account '{}' already exists.",
                payload.name
            )));
        }
        if !db::update_account(id, payload, &conn)? {
            return Err(ApiError::NotFound(format!("account {id}")));
        }
        db::query_account_by_id(id, &conn)?
            .ok_or_else(|| ApiError::NotFound(format!("account {id}")))
    }

    fn delete_account(&self, id: AccountId) -> ApiResult<()> {
        let conn = self.conn();
        let linked = db::count_account_transactions(id, &conn)?;
        if linked > 0 {
            return Err(ApiError::Rejected(format!(
                "Account has {linked} transaction(s) and cannot be deleted."
            )));
        }
        if !db::delete_account(id, &conn)? {
            return Err(ApiError::NotFound(format!("account {id}")));
        }
        Ok(())
    }

    fn create_transaction(&self, payload: &TransactionPayload) -> ApiResult<Transaction> {
        if !payload.amount.is_finite() || payload.amount <= 0.0 {
            return Err(ApiError::Rejected(
                "Amount must be a positive number.".to_string(),
            ));
        }
        let conn = self.conn();
        if db::query_account_by_id(payload.account_id, &conn)?.is_none() {
            return Err(ApiError::NotFound(format!("account {}", payload.account_id)));
        }
        if let Some(category_id) = payload.category_id {
            if db::query_category_by_id(category_id, &conn)?.is_none() {
                return Err(ApiError::NotFound(format!("category {category_id}")));
            }
        }
        Ok(db::create_transaction(payload, &conn)?)
    }

    fn delete_my_account(&self, _password: &str) -> ApiResult<()> {
        Err(ApiError::Unsupported(
            "Deleting your account is only possible against the server.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use chrono::NaiveDate;

    fn category(name: &str, icon: Option<&str>) -> CategoryPayload {
        CategoryPayload {
            name: name.to_string(),
            icon_name: icon.map(str::to_string),
            is_income: false,
        }
    }

    fn account(name: &str) -> AccountPayload {
        AccountPayload {
            name: name.to_string(),
            kind: "savings".to_string(),
            provider: "HDFC".to_string(),
            account_number: None,
        }
    }

    fn debit(account_id: AccountId, category_id: Option<CategoryId>) -> TransactionPayload {
        TransactionPayload {
            txn_date: NaiveDate::from_ymd_opt(2025, 3, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            description: "Lunch".to_string(),
            amount: 250.0,
            kind: TransactionKind::Debit,
            source: "manual".to_string(),
            account_id,
            category_id,
        }
    }

    #[test]
    fn duplicate_category_names_are_rejected() {
        let store = LocalStore::in_memory().unwrap();
        store.create_category(&category("Food", None)).unwrap();
        let err = store.create_category(&category("Food", None)).unwrap_err();
        assert_eq!(err.detail(), Some("Category 'Food' already exists."));
    }

    #[test]
    fn renaming_to_own_name_is_allowed() {
        let store = LocalStore::in_memory().unwrap();
        let food = store.create_category(&category("Food", None)).unwrap();
        let updated = store
            .update_category(food.id, &category("Food", Some("pizza")))
            .unwrap();
        assert_eq!(updated.icon_name.as_deref(), Some("pizza"));
    }

    #[test]
    fn updating_missing_category_is_not_found() {
        let store = LocalStore::in_memory().unwrap();
        let err = store.update_category(42, &category("Ghost", None)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn deleting_category_uncategorizes_transactions() {
        let store = LocalStore::in_memory().unwrap();
        let wallet = store.create_account(&account("Wallet")).unwrap();
        let food = store.create_category(&category("Food", None)).unwrap();
        store.create_transaction(&debit(wallet.id, Some(food.id))).unwrap();

        store.delete_category(food.id).unwrap();

        let uncategorized: i64 = store
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM transactions WHERE category_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(uncategorized, 1);
    }

    #[test]
    fn account_with_transactions_cannot_be_deleted() {
        let store = LocalStore::in_memory().unwrap();
        let wallet = store.create_account(&account("Wallet")).unwrap();
        store.create_transaction(&debit(wallet.id, None)).unwrap();

        let err = store.delete_account(wallet.id).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));

        let empty = store.create_account(&account("Spare")).unwrap();
        store.delete_account(empty.id).unwrap();
        assert_eq!(store.accounts().unwrap().len(), 1);
    }

    #[test]
    fn transaction_needs_existing_account() {
        let store = LocalStore::in_memory().unwrap();
        let err = store.create_transaction(&debit(7, None)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn blank_tag_name_is_rejected() {
        let store = LocalStore::in_memory().unwrap();
        let err = store
            .create_tag(&TagPayload {
                name: "   ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.detail(), Some("Tag name cannot be empty."));
    }

    #[test]
    fn account_deletion_is_server_only() {
        let store = LocalStore::in_memory().unwrap();
        assert!(matches!(
            store.delete_my_account("pw"),
            Err(ApiError::Unsupported(_))
        ));
    }

    #[test]
    fn store_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("spendr.db");
        {
            let store = LocalStore::open(&path).unwrap();
            store.create_category(&category("Bills", Some("receipt"))).unwrap();
        }
        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.categories().unwrap()[0].name, "Bills");
    }
}
