//! HTTP client for the tracker server's `/api/v1` endpoints.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{ApiResult, ExpenseApi};
use crate::error::ApiError;
use crate::month::YearMonth;
use crate::types::{
    Account, AccountId, AccountPayload, Category, CategoryId, CategoryPayload, DashboardData, Tag,
    TagId, TagPayload, Transaction, TransactionPayload,
};

const API_PREFIX: &str = "/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Pulls the user-facing message out of an error body.
///
/// The server answers with `{"detail": "..."}`, or for validation failures
/// `{"detail": [{"msg": "..."}, ...]}`. Returns `None` for anything else.
fn extract_detail(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Map a non-2xx response to [`ApiError::Status`].
fn check_response(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let detail = extract_detail(&body);
    tracing::warn!(status = status.as_u16(), detail = ?detail, "request rejected");
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

pub struct RestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    /// `server_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(server_url: &str, token: Option<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("spendr/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}{API_PREFIX}", server_url.trim_end_matches('/')),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%method, %url, "sending request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = check_response(builder.send()?)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        check_response(builder.send()?)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(self.request(Method::GET, path))
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.send(self.request(Method::POST, path).json(body))
    }

    fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.send(self.request(Method::PUT, path).json(body))
    }

    fn delete(&self, path: &str) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, path))
    }
}

impl ExpenseApi for RestClient {
    fn dashboard(&self, month: YearMonth) -> ApiResult<DashboardData> {
        self.send(
            self.request(Method::GET, "dashboard/")
                .query(&[("month", month.to_string())]),
        )
    }

    fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get("categories/")
    }

    fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category> {
        self.post("categories/", payload)
    }

    fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> ApiResult<Category> {
        self.put(&format!("categories/{id}"), payload)
    }

    fn delete_category(&self, id: CategoryId) -> ApiResult<()> {
        self.delete(&format!("categories/{id}"))
    }

    fn tags(&self) -> ApiResult<Vec<Tag>> {
        self.get("tags/")
    }

    fn create_tag(&self, payload: &TagPayload) -> ApiResult<Tag> {
        self.post("tags/", payload)
    }

    fn update_tag(&self, id: TagId, payload: &TagPayload) -> ApiResult<Tag> {
        self.put(&format!("tags/{id}"), payload)
    }

    fn delete_tag(&self, id: TagId) -> ApiResult<()> {
        self.delete(&format!("tags/{id}"))
    }

    fn accounts(&self) -> ApiResult<Vec<Account>> {
        self.get("accounts/")
    }

    fn create_account(&self, payload: &AccountPayload) -> ApiResult<Account> {
        self.post("accounts/", payload)
    }

    fn update_account(&self, id: AccountId, payload: &AccountPayload) -> ApiResult<Account> {
        self.put(&format!("accounts/{id}"), payload)
    }

    fn delete_account(&self, id: AccountId) -> ApiResult<()> {
        self.delete(&format!("accounts/{id}"))
    }

    fn create_transaction(&self, payload: &TransactionPayload) -> ApiResult<Transaction> {
        self.post("transactions/", payload)
    }

    fn delete_my_account(&self, password: &str) -> ApiResult<()> {
        self.send_empty(
            self.request(Method::DELETE, "users/me")
                .json(&json!({ "password": password })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn detail_string_is_extracted() {
        assert_eq!(
            extract_detail(r#"{"detail": "Category already exists"}"#).as_deref(),
            Some("Category already exists")
        );
    }

    #[test]
    fn validation_details_are_joined() {
        let body = r#"{"detail": [{"msg": "field required"}, {"msg": "too short"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; too short")
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"message": "nope"}"#), None);
    }

    #[test]
    fn categories_are_fetched_with_bearer_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/categories/")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "Food", "icon_name": "utensils", "is_income": false}]"#)
            .create();

        let client = RestClient::new(&server.url(), Some("secret".to_string())).unwrap();
        let categories = client.categories().unwrap();

        mock.assert();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].icon_name.as_deref(), Some("utensils"));
    }

    #[test]
    fn dashboard_sends_month_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/dashboard/")
            .match_query(Matcher::UrlEncoded("month".into(), "2025-03".into()))
            .with_status(200)
            .with_body(
                r#"{"totalSpent": 1200.5, "dailyAverageSpend": 40.0, "projectedMonthlySpend": 1240.0,
                    "percentChangeFromLastMonth": -12.5,
                    "spendingTrend": [{"date": "2025-03-01", "amount": 40.0}],
                    "topSpendingCategories": [{"id": 2, "category": "Food", "amount": 800.0}],
                    "recentTransactions": []}"#,
            )
            .create();

        let client = RestClient::new(&format!("{}/", server.url()), None).unwrap();
        let data = client.dashboard(YearMonth::new(2025, 3).unwrap()).unwrap();

        mock.assert();
        assert_eq!(data.total_spent, 1200.5);
        assert_eq!(data.percent_change_from_last_month, Some(-12.5));
        assert_eq!(data.top_spending_categories[0].category, "Food");
    }

    #[test]
    fn error_status_carries_server_detail() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/v1/categories/")
            .with_status(400)
            .with_body(r#"{"detail": "Category with this name already exists"}"#)
            .create();

        let client = RestClient::new(&server.url(), None).unwrap();
        let err = client
            .create_category(&CategoryPayload {
                name: "Food".to_string(),
                icon_name: None,
                is_income: false,
            })
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert_eq!(
            err.user_message("An error occurred while saving."),
            "Category with this name already exists"
        );
    }

    #[test]
    fn delete_my_account_posts_password() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/api/v1/users/me")
            .match_body(Matcher::Json(json!({ "password": "hunter2" })))
            .with_status(204)
            .create();

        let client = RestClient::new(&server.url(), Some("t".to_string())).unwrap();
        client.delete_my_account("hunter2").unwrap();
        mock.assert();
    }
}
