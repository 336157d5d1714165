use std::{collections::BTreeMap, collections::HashMap, future::Future};

use api_types::{
    DecodeError,
    account::{Account, AccountAttributes, AccountFlow, AccountType, NewAccount},
    category::{Category, CategoryAttributes, CategoryFlow, NewCategory},
    envelope::{DataItem, DataList, ErrorBody, Item},
    insight::InsightEntry,
    summary::{SummaryEntry, SummaryItem, summary_items},
    transaction::{GroupAttributes, NewTransaction, TransactionGroup},
};
use reqwest::{Response, Url, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use thiserror::Error;

use crate::{
    app::period::Period,
    config::AppConfig,
    error::{AppError, Result},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized, check the access token")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("rejected: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("connection failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<DecodeError> for ClientError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Remote operations the dashboard depends on.
pub trait DataApi: Clone + Send + Sync + 'static {
    fn accounts(
        &self,
        account_type: AccountType,
    ) -> impl Future<Output = ClientResult<Vec<Account>>> + Send;

    /// Accounts of `account_type` with their movement over `period`.
    fn account_flows(
        &self,
        account_type: AccountType,
        period: Period,
    ) -> impl Future<Output = ClientResult<Vec<AccountFlow>>> + Send;

    fn categories(
        &self,
        period: Period,
    ) -> impl Future<Output = ClientResult<Vec<CategoryFlow>>> + Send;

    fn transactions(
        &self,
        period: Period,
    ) -> impl Future<Output = ClientResult<Vec<TransactionGroup>>> + Send;

    fn summary(&self, period: Period) -> impl Future<Output = ClientResult<Vec<SummaryItem>>> + Send;

    /// Returns the id of the created account.
    fn create_account(
        &self,
        account: NewAccount,
    ) -> impl Future<Output = ClientResult<String>> + Send;

    fn create_category(
        &self,
        category: NewCategory,
    ) -> impl Future<Output = ClientResult<String>> + Send;

    fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = ClientResult<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    token: String,
    page_size: u32,
    http: reqwest::Client,
}

type Query = Vec<(&'static str, String)>;

fn period_query(period: Period) -> Query {
    vec![
        ("start", period.start.format("%Y-%m-%d").to_string()),
        ("end", period.end.format("%Y-%m-%d").to_string()),
    ]
}

/// Sums insight rows per id; an id may appear once per currency.
fn insight_totals(entries: &[InsightEntry]) -> ClientResult<HashMap<String, (f64, Option<String>)>> {
    let mut totals: HashMap<String, (f64, Option<String>)> = HashMap::new();
    for entry in entries {
        let total = totals
            .entry(entry.id.clone())
            .or_insert((0.0, entry.currency_code.clone()));
        total.0 += entry.amount()?.abs();
    }
    Ok(totals)
}

fn merge_account_flows(accounts: Vec<Account>, entries: &[InsightEntry]) -> ClientResult<Vec<AccountFlow>> {
    let totals = insight_totals(entries)?;
    Ok(accounts
        .into_iter()
        .map(|account| {
            let amount = totals.get(&account.id).map_or(0.0, |(amount, _)| *amount);
            AccountFlow { account, amount }
        })
        .collect())
}

fn merge_category_flows(
    categories: Vec<Category>,
    spent: &[InsightEntry],
    earned: &[InsightEntry],
) -> ClientResult<Vec<CategoryFlow>> {
    let spent = insight_totals(spent)?;
    let earned = insight_totals(earned)?;
    Ok(categories
        .into_iter()
        .map(|category| {
            let out = spent.get(&category.id);
            let inc = earned.get(&category.id);
            let currency_code = out
                .and_then(|(_, code)| code.clone())
                .or_else(|| inc.and_then(|(_, code)| code.clone()))
                .unwrap_or_default();
            CategoryFlow {
                spent: out.map_or(0.0, |(amount, _)| *amount),
                earned: inc.map_or(0.0, |(amount, _)| *amount),
                currency_code,
                category,
            }
        })
        .collect())
}

impl Client {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url).map_err(|err| AppError::Url(err.to_string()))?;
        if config.token.is_empty() {
            tracing::warn!("no access token configured, requests will be rejected");
        }
        Ok(Self {
            base_url,
            token: config.token.clone(),
            page_size: config.page_size.max(1),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint {path}: {err}")))
    }

    async fn check(res: Response) -> ClientResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!(status = status.as_u16(), "request failed: {body}");

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T> {
        let endpoint = self.endpoint(path)?;
        tracing::debug!(%endpoint, "GET");
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;
        let res = Self::check(res).await?;
        res.json::<T>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<String> {
        let endpoint = self.endpoint(path)?;
        tracing::debug!(%endpoint, "POST");
        let res = self
            .http
            .post(endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let res = Self::check(res).await?;
        let created = res
            .json::<DataItem<IgnoredAny>>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        Ok(created.data.id)
    }

    /// Follows `meta.pagination` until the last page.
    async fn get_all<T: DeserializeOwned>(&self, path: &str, query: Query) -> ClientResult<Vec<Item<T>>> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut paged = query.clone();
            paged.push(("page", page.to_string()));
            paged.push(("limit", self.page_size.to_string()));

            let list = self.get::<DataList<T>>(path, &paged).await?;
            let more = list.has_more();
            items.extend(list.data);
            if !more {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

impl DataApi for Client {
    async fn accounts(&self, account_type: AccountType) -> ClientResult<Vec<Account>> {
        let query = vec![("type", account_type.as_str().to_string())];
        self.get_all::<AccountAttributes>("api/v1/accounts", query)
            .await?
            .into_iter()
            .map(|item| Account::from_item(item).map_err(ClientError::from))
            .collect()
    }

    async fn account_flows(
        &self,
        account_type: AccountType,
        period: Period,
    ) -> ClientResult<Vec<AccountFlow>> {
        let accounts = self.accounts(account_type).await?;
        let path = match account_type {
            AccountType::Expense => "api/v1/insight/expense/expense",
            AccountType::Revenue => "api/v1/insight/income/revenue",
            _ => return merge_account_flows(accounts, &[]),
        };
        let entries = self.get::<Vec<InsightEntry>>(path, &period_query(period)).await?;
        merge_account_flows(accounts, &entries)
    }

    async fn categories(&self, period: Period) -> ClientResult<Vec<CategoryFlow>> {
        let categories = self
            .get_all::<CategoryAttributes>("api/v1/categories", Vec::new())
            .await?
            .into_iter()
            .map(Category::from)
            .collect::<Vec<_>>();
        let query = period_query(period);
        let spent = self
            .get::<Vec<InsightEntry>>("api/v1/insight/expense/category", &query)
            .await?;
        let earned = self
            .get::<Vec<InsightEntry>>("api/v1/insight/income/category", &query)
            .await?;
        merge_category_flows(categories, &spent, &earned)
    }

    async fn transactions(&self, period: Period) -> ClientResult<Vec<TransactionGroup>> {
        self.get_all::<GroupAttributes>("api/v1/transactions", period_query(period))
            .await?
            .into_iter()
            .map(|item| TransactionGroup::from_item(item).map_err(ClientError::from))
            .collect()
    }

    async fn summary(&self, period: Period) -> ClientResult<Vec<SummaryItem>> {
        let entries = self
            .get::<BTreeMap<String, SummaryEntry>>("api/v1/summary/basic", &period_query(period))
            .await?;
        Ok(summary_items(entries)?)
    }

    async fn create_account(&self, account: NewAccount) -> ClientResult<String> {
        let id = self.post("api/v1/accounts", &account).await?;
        tracing::info!(%id, name = %account.name, "account created");
        Ok(id)
    }

    async fn create_category(&self, category: NewCategory) -> ClientResult<String> {
        let id = self.post("api/v1/categories", &category).await?;
        tracing::info!(%id, name = %category.name, "category created");
        Ok(id)
    }

    async fn create_transaction(&self, transaction: NewTransaction) -> ClientResult<String> {
        let id = self.post("api/v1/transactions", &transaction).await?;
        tracing::info!(%id, "transaction created");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, name: &str) -> Account {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            account_type: AccountType::Expense,
            currency_code: "EUR".to_string(),
            balance: 0.0,
            liability_type: None,
            liability_direction: None,
            active: true,
        }
    }

    fn entries(raw: &str) -> Vec<InsightEntry> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn flows_default_to_zero_and_use_magnitudes() {
        let insight = entries(
            r#"[{"id": "2", "name": "Supermarket", "difference": "-84.20", "difference_float": -84.2, "currency_code": "EUR"}]"#,
        );
        let flows = merge_account_flows(
            vec![account("1", "Cinema"), account("2", "Supermarket")],
            &insight,
        )
        .unwrap();
        assert_eq!(flows[0].amount, 0.0);
        assert_eq!(flows[1].amount, 84.2);
    }

    #[test]
    fn category_flows_combine_both_sides() {
        let spent = entries(r#"[{"id": "5", "difference": "-40", "currency_code": "EUR"}]"#);
        let earned = entries(r#"[{"id": "5", "difference": "15.5", "currency_code": "EUR"}]"#);
        let flows = merge_category_flows(
            vec![Category {
                id: "5".to_string(),
                name: "Gifts".to_string(),
                notes: None,
            }],
            &spent,
            &earned,
        )
        .unwrap();
        assert_eq!(flows[0].spent, 40.0);
        assert_eq!(flows[0].earned, 15.5);
        assert_eq!(flows[0].net(), -24.5);
        assert_eq!(flows[0].currency_code, "EUR");
    }

    #[test]
    fn invalid_insight_amount_is_a_decode_error() {
        let insight = entries(r#"[{"id": "1", "difference": "lots"}]"#);
        let err = merge_account_flows(vec![account("1", "Cinema")], &insight).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = AppConfig {
            base_url: "https://budget.example.com/firefly".to_string(),
            ..AppConfig::default()
        };
        let client = Client::new(&config).unwrap();
        assert_eq!(
            client.endpoint("api/v1/accounts").unwrap().as_str(),
            "https://budget.example.com/firefly/api/v1/accounts"
        );
    }

    #[test]
    fn period_query_uses_iso_dates() {
        let period = Period::month_of(chrono::NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
        assert_eq!(
            period_query(period),
            vec![
                ("start", "2024-02-01".to_string()),
                ("end", "2024-02-29".to_string())
            ]
        );
    }
}
