//! Backend seam: every screen and CLI command talks to an [`ExpenseApi`].
//!
//! [`RestClient`] speaks to the tracker server over HTTP, [`LocalStore`]
//! answers the same calls from a SQLite file.

mod local;
mod rest;

use std::thread;

pub use local::LocalStore;
pub use rest::RestClient;

use crate::error::ApiError;
use crate::month::YearMonth;
use crate::types::{
    Account, AccountId, AccountPayload, Category, CategoryId, CategoryPayload, DashboardData, Tag,
    TagId, TagPayload, Transaction, TransactionPayload,
};

pub type ApiResult<T> = Result<T, ApiError>;

pub trait ExpenseApi: Send + Sync {
    fn dashboard(&self, month: YearMonth) -> ApiResult<DashboardData>;

    fn categories(&self) -> ApiResult<Vec<Category>>;
    fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category>;
    fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> ApiResult<Category>;
    fn delete_category(&self, id: CategoryId) -> ApiResult<()>;

    fn tags(&self) -> ApiResult<Vec<Tag>>;
    fn create_tag(&self, payload: &TagPayload) -> ApiResult<Tag>;
    fn update_tag(&self, id: TagId, payload: &TagPayload) -> ApiResult<Tag>;
    fn delete_tag(&self, id: TagId) -> ApiResult<()>;

    fn accounts(&self) -> ApiResult<Vec<Account>>;
    fn create_account(&self, payload: &AccountPayload) -> ApiResult<Account>;
    fn update_account(&self, id: AccountId, payload: &AccountPayload) -> ApiResult<Account>;
    fn delete_account(&self, id: AccountId) -> ApiResult<()>;

    fn create_transaction(&self, payload: &TransactionPayload) -> ApiResult<Transaction>;

    /// Deletes the signed-in user after re-checking their password.
    fn delete_my_account(&self, password: &str) -> ApiResult<()>;
}

/// Everything the settings screen lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsData {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub accounts: Vec<Account>,
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Fetches the month aggregate and the full category list concurrently.
///
/// Both requests always run to completion; the first error wins.
pub fn fetch_dashboard(
    api: &dyn ExpenseApi,
    month: YearMonth,
) -> ApiResult<(DashboardData, Vec<Category>)> {
    let (dashboard, categories) = thread::scope(|s| {
        let dashboard = s.spawn(|| api.dashboard(month));
        let categories = s.spawn(|| api.categories());
        (join(dashboard), join(categories))
    });
    Ok((dashboard?, categories?))
}

/// Fetches categories, tags and accounts concurrently.
pub fn fetch_settings(api: &dyn ExpenseApi) -> ApiResult<SettingsData> {
    let (categories, tags, accounts) = thread::scope(|s| {
        let categories = s.spawn(|| api.categories());
        let tags = s.spawn(|| api.tags());
        let accounts = s.spawn(|| api.accounts());
        (join(categories), join(tags), join(accounts))
    });
    Ok(SettingsData {
        categories: categories?,
        tags: tags?,
        accounts: accounts?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountPayload;

    #[test]
    fn settings_fetch_collects_all_three_lists() {
        let store = LocalStore::in_memory().unwrap();
        store
            .create_tag(&TagPayload {
                name: "groceries".to_string(),
            })
            .unwrap();
        store
            .create_account(&AccountPayload {
                name: "HDFC Savings".to_string(),
                kind: "savings".to_string(),
                provider: "HDFC".to_string(),
                account_number: Some("1234".to_string()),
            })
            .unwrap();

        let data = fetch_settings(&store).unwrap();
        assert!(data.categories.is_empty());
        assert_eq!(data.tags.len(), 1);
        assert_eq!(data.accounts[0].provider, "HDFC");
    }

    #[test]
    fn dashboard_fetch_fails_when_either_request_fails() {
        struct Broken;

        impl ExpenseApi for Broken {
            fn dashboard(&self, _: YearMonth) -> ApiResult<DashboardData> {
                Ok(DashboardData::default())
            }
            fn categories(&self) -> ApiResult<Vec<Category>> {
                Err(ApiError::Unsupported("categories"))
            }
            fn create_category(&self, _: &CategoryPayload) -> ApiResult<Category> {
                unimplemented!()
            }
            fn update_category(&self, _: CategoryId, _: &CategoryPayload) -> ApiResult<Category> {
                unimplemented!()
            }
            fn delete_category(&self, _: CategoryId) -> ApiResult<()> {
                unimplemented!()
            }
            fn tags(&self) -> ApiResult<Vec<Tag>> {
                unimplemented!()
            }
            fn create_tag(&self, _: &TagPayload) -> ApiResult<Tag> {
                unimplemented!()
            }
            fn update_tag(&self, _: TagId, _: &TagPayload) -> ApiResult<Tag> {
                unimplemented!()
            }
            fn delete_tag(&self, _: TagId) -> ApiResult<()> {
                unimplemented!()
            }
            fn accounts(&self) -> ApiResult<Vec<Account>> {
                unimplemented!()
            }
            fn create_account(&self, _: &AccountPayload) -> ApiResult<Account> {
                unimplemented!()
            }
            fn update_account(&self, _: AccountId, _: &AccountPayload) -> ApiResult<Account> {
                unimplemented!()
            }
            fn delete_account(&self, _: AccountId) -> ApiResult<()> {
                unimplemented!()
            }
            fn create_transaction(&self, _: &TransactionPayload) -> ApiResult<Transaction> {
                unimplemented!()
            }
            fn delete_my_account(&self, _: &str) -> ApiResult<()> {
                unimplemented!()
            }
        }

        let err = fetch_dashboard(&Broken, YearMonth::new(2025, 3).unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::Unsupported("categories")));
    }
}
