use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid amount `{0}`")]
    Amount(String),
    #[error("invalid date `{0}`")]
    Date(String),
}

/// Monetary value as sent by the service.
///
/// Most endpoints encode amounts as decimal strings (`"12.50"`), a few
/// (summary, insight floats) as JSON numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn value(&self) -> Result<f64, DecodeError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| DecodeError::Amount(raw.clone())),
        }
    }
}

fn optional_amount(raw: Option<&RawAmount>) -> Result<Option<f64>, DecodeError> {
    raw.map(RawAmount::value).transpose()
}

fn parse_date(raw: &str) -> Result<NaiveDate, DecodeError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .ok_or_else(|| DecodeError::Date(raw.to_string()))
}

pub mod envelope {
    use super::*;

    /// A paginated JSON:API collection.
    #[derive(Debug, Deserialize)]
    pub struct DataList<T> {
        pub data: Vec<Item<T>>,
        #[serde(default)]
        pub meta: Meta,
    }

    impl<T> DataList<T> {
        /// True when the service reports pages after the current one.
        pub fn has_more(&self) -> bool {
            self.meta
                .pagination
                .as_ref()
                .is_some_and(|page| page.current_page < page.total_pages)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct DataItem<T> {
        pub data: Item<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Item<T> {
        pub id: String,
        pub attributes: T,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Meta {
        #[serde(default)]
        pub pagination: Option<Pagination>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Pagination {
        #[serde(default)]
        pub total: u64,
        pub current_page: u32,
        pub total_pages: u32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: String,
    }
}

pub mod account {
    use super::*;
    use super::envelope::Item;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AccountType {
        Asset,
        Expense,
        Revenue,
        #[serde(alias = "liability")]
        Liabilities,
        #[serde(other)]
        Other,
    }

    impl AccountType {
        /// Value of the `type` query parameter on `GET /accounts`.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Asset => "asset",
                Self::Expense => "expense",
                Self::Revenue => "revenue",
                Self::Liabilities => "liabilities",
                Self::Other => "all",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LiabilityDirection {
        Credit,
        Debit,
    }

    impl LiabilityDirection {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Credit => "credit",
                Self::Debit => "debit",
            }
        }

        pub fn parse(raw: &str) -> Option<Self> {
            match raw.trim().to_lowercase().as_str() {
                "credit" => Some(Self::Credit),
                "debit" => Some(Self::Debit),
                _ => None,
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LiabilityType {
        Loan,
        Debt,
        Mortgage,
    }

    impl LiabilityType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Loan => "loan",
                Self::Debt => "debt",
                Self::Mortgage => "mortgage",
            }
        }

        pub fn parse(raw: &str) -> Option<Self> {
            match raw.trim().to_lowercase().as_str() {
                "loan" => Some(Self::Loan),
                "debt" => Some(Self::Debt),
                "mortgage" => Some(Self::Mortgage),
                _ => None,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct AccountAttributes {
        pub name: String,
        #[serde(rename = "type")]
        pub account_type: AccountType,
        #[serde(default)]
        pub currency_code: Option<String>,
        #[serde(default)]
        pub current_balance: Option<RawAmount>,
        #[serde(default)]
        pub liability_type: Option<LiabilityType>,
        #[serde(default)]
        pub liability_direction: Option<LiabilityDirection>,
        #[serde(default = "default_active")]
        pub active: bool,
    }

    fn default_active() -> bool {
        true
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct Account {
        pub id: String,
        pub name: String,
        pub account_type: AccountType,
        pub currency_code: String,
        pub balance: f64,
        pub liability_type: Option<LiabilityType>,
        pub liability_direction: Option<LiabilityDirection>,
        pub active: bool,
    }

    impl Account {
        pub fn from_item(item: Item<AccountAttributes>) -> Result<Self, DecodeError> {
            let attrs = item.attributes;
            Ok(Self {
                id: item.id,
                name: attrs.name,
                account_type: attrs.account_type,
                currency_code: attrs.currency_code.unwrap_or_default(),
                balance: optional_amount(attrs.current_balance.as_ref())?.unwrap_or(0.0),
                liability_type: attrs.liability_type,
                liability_direction: attrs.liability_direction,
                active: attrs.active,
            })
        }

        /// Balance as presented to the user.
        ///
        /// A liability we are in debit on is money we owe, so its sign flips.
        pub fn signed_balance(&self) -> f64 {
            match self.liability_direction {
                Some(LiabilityDirection::Debit) => -self.balance,
                _ => self.balance,
            }
        }
    }

    /// An account together with its net movement over a period.
    #[derive(Clone, Debug, PartialEq)]
    pub struct AccountFlow {
        pub account: Account,
        pub amount: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct NewAccount {
        pub name: String,
        #[serde(rename = "type")]
        pub account_type: AccountType,
        pub currency_code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub account_role: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub liability_type: Option<LiabilityType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub liability_direction: Option<LiabilityDirection>,
    }
}

pub mod insight {
    use super::*;

    /// One row of `GET /insight/{expense,income}/{expense,revenue,category}`.
    #[derive(Debug, Deserialize)]
    pub struct InsightEntry {
        pub id: String,
        #[serde(default)]
        pub name: String,
        pub difference: RawAmount,
        #[serde(default)]
        pub difference_float: Option<f64>,
        #[serde(default)]
        pub currency_code: Option<String>,
    }

    impl InsightEntry {
        pub fn amount(&self) -> Result<f64, DecodeError> {
            match self.difference_float {
                Some(value) => Ok(value),
                None => self.difference.value(),
            }
        }
    }
}

pub mod category {
    use super::*;
    use super::envelope::Item;

    #[derive(Debug, Deserialize)]
    pub struct CategoryAttributes {
        pub name: String,
        #[serde(default)]
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct Category {
        pub id: String,
        pub name: String,
        pub notes: Option<String>,
    }

    impl From<Item<CategoryAttributes>> for Category {
        fn from(item: Item<CategoryAttributes>) -> Self {
            Self {
                id: item.id,
                name: item.attributes.name,
                notes: item.attributes.notes,
            }
        }
    }

    /// Spending and earning booked on a category over a period.
    ///
    /// Both sides are stored as positive magnitudes.
    #[derive(Clone, Debug, PartialEq)]
    pub struct CategoryFlow {
        pub category: Category,
        pub spent: f64,
        pub earned: f64,
        pub currency_code: String,
    }

    impl CategoryFlow {
        pub fn net(&self) -> f64 {
            self.earned - self.spent
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct NewCategory {
        pub name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }
}

pub mod transaction {
    use super::*;
    use super::envelope::Item;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionType {
        Withdrawal,
        Deposit,
        Transfer,
        #[serde(rename = "opening balance")]
        OpeningBalance,
        Reconciliation,
        #[serde(other)]
        Other,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Withdrawal => "withdrawal",
                Self::Deposit => "deposit",
                Self::Transfer => "transfer",
                Self::OpeningBalance => "opening balance",
                Self::Reconciliation => "reconciliation",
                Self::Other => "other",
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct SplitAttributes {
        #[serde(default)]
        pub transaction_journal_id: Option<String>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub date: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub source_id: Option<String>,
        #[serde(default)]
        pub source_name: Option<String>,
        #[serde(default)]
        pub destination_id: Option<String>,
        #[serde(default)]
        pub destination_name: Option<String>,
        #[serde(default)]
        pub category_id: Option<String>,
        #[serde(default)]
        pub category_name: Option<String>,
        pub amount: RawAmount,
        #[serde(default)]
        pub currency_code: Option<String>,
        #[serde(default)]
        pub foreign_amount: Option<RawAmount>,
        #[serde(default)]
        pub foreign_currency_code: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GroupAttributes {
        #[serde(default)]
        pub group_title: Option<String>,
        pub transactions: Vec<SplitAttributes>,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct Split {
        pub journal_id: String,
        pub kind: TransactionType,
        pub date: NaiveDate,
        pub description: String,
        pub source_id: Option<String>,
        pub source_name: String,
        pub destination_id: Option<String>,
        pub destination_name: String,
        pub category_id: Option<String>,
        pub category_name: Option<String>,
        pub amount: f64,
        pub currency_code: String,
        pub foreign_amount: Option<f64>,
        pub foreign_currency_code: Option<String>,
    }

    impl Split {
        fn from_attributes(attrs: SplitAttributes) -> Result<Self, DecodeError> {
            Ok(Self {
                journal_id: attrs.transaction_journal_id.unwrap_or_default(),
                kind: attrs.kind,
                date: parse_date(&attrs.date)?,
                description: attrs.description,
                source_id: attrs.source_id,
                source_name: attrs.source_name.unwrap_or_default(),
                destination_id: attrs.destination_id,
                destination_name: attrs.destination_name.unwrap_or_default(),
                category_id: attrs.category_id,
                category_name: attrs.category_name,
                amount: attrs.amount.value()?,
                currency_code: attrs.currency_code.unwrap_or_default(),
                foreign_amount: optional_amount(attrs.foreign_amount.as_ref())?,
                foreign_currency_code: attrs.foreign_currency_code,
            })
        }
    }

    /// A transaction group; multi-split transactions carry several splits.
    #[derive(Clone, Debug, PartialEq)]
    pub struct TransactionGroup {
        pub id: String,
        pub title: Option<String>,
        pub splits: Vec<Split>,
    }

    impl TransactionGroup {
        pub fn from_item(item: Item<GroupAttributes>) -> Result<Self, DecodeError> {
            let splits = item
                .attributes
                .transactions
                .into_iter()
                .map(Split::from_attributes)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                id: item.id,
                title: item.attributes.group_title,
                splits,
            })
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct NewSplit {
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub date: NaiveDate,
        pub amount: String,
        pub description: String,
        pub source_name: String,
        pub destination_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_name: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct NewTransaction {
        pub error_if_duplicate_hash: bool,
        pub apply_rules: bool,
        pub transactions: Vec<NewSplit>,
    }
}

pub mod summary {
    use std::collections::BTreeMap;

    use super::*;

    /// One entry of `GET /summary/basic`, keyed like `balance-in-EUR`.
    #[derive(Debug, Deserialize)]
    pub struct SummaryEntry {
        pub key: String,
        #[serde(default)]
        pub title: String,
        pub monetary_value: RawAmount,
        #[serde(default)]
        pub currency_code: String,
        #[serde(default)]
        pub value_parsed: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct SummaryItem {
        pub key: String,
        pub title: String,
        pub value: f64,
        pub currency_code: String,
        pub formatted: String,
    }

    /// Flattens the keyed summary object, ordered by key.
    pub fn summary_items(
        entries: BTreeMap<String, SummaryEntry>,
    ) -> Result<Vec<SummaryItem>, DecodeError> {
        entries
            .into_values()
            .map(|entry| {
                Ok(SummaryItem {
                    value: entry.monetary_value.value()?,
                    key: entry.key,
                    title: entry.title,
                    currency_code: entry.currency_code,
                    formatted: entry.value_parsed,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::account::{Account, AccountAttributes, AccountType, LiabilityDirection, NewAccount};
    use super::envelope::DataList;
    use super::insight::InsightEntry;
    use super::summary::{SummaryEntry, summary_items};
    use super::transaction::{GroupAttributes, TransactionGroup, TransactionType};
    use super::*;

    #[test]
    fn decodes_paginated_account_list() {
        let raw = r#"{
            "data": [
                {"id": "1", "attributes": {"name": "Checking", "type": "asset",
                 "currency_code": "EUR", "current_balance": "1250.40"}},
                {"id": "7", "attributes": {"name": "Car loan", "type": "liabilities",
                 "currency_code": "EUR", "current_balance": "120.00",
                 "liability_type": "loan", "liability_direction": "debit", "active": false}}
            ],
            "meta": {"pagination": {"total": 3, "current_page": 1, "total_pages": 2}}
        }"#;
        let list: DataList<AccountAttributes> = serde_json::from_str(raw).unwrap();
        assert!(list.has_more());

        let accounts = list
            .data
            .into_iter()
            .map(Account::from_item)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(accounts[0].account_type, AccountType::Asset);
        assert_eq!(accounts[0].balance, 1250.40);
        assert!(accounts[0].active);
        assert_eq!(
            accounts[1].liability_direction,
            Some(LiabilityDirection::Debit)
        );
        assert!(!accounts[1].active);
    }

    #[test]
    fn last_page_has_no_more() {
        let raw = r#"{"data": [], "meta": {"pagination": {"total": 0, "current_page": 1, "total_pages": 1}}}"#;
        let list: DataList<AccountAttributes> = serde_json::from_str(raw).unwrap();
        assert!(!list.has_more());

        let bare: DataList<AccountAttributes> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(!bare.has_more());
    }

    #[test]
    fn debit_liability_flips_sign() {
        let mut account = Account {
            id: "7".to_string(),
            name: "Car loan".to_string(),
            account_type: AccountType::Liabilities,
            currency_code: "EUR".to_string(),
            balance: 120.0,
            liability_type: None,
            liability_direction: Some(LiabilityDirection::Debit),
            active: true,
        };
        assert_eq!(account.signed_balance(), -120.0);

        account.liability_direction = Some(LiabilityDirection::Credit);
        assert_eq!(account.signed_balance(), 120.0);
    }

    #[test]
    fn unknown_account_type_is_other() {
        let raw = r#"{"name": "Cash", "type": "cash"}"#;
        let attrs: AccountAttributes = serde_json::from_str(raw).unwrap();
        assert_eq!(attrs.account_type, AccountType::Other);
    }

    #[test]
    fn invalid_amount_is_rejected() {
        let amount = RawAmount::Text("12,50".to_string());
        assert_eq!(
            amount.value(),
            Err(DecodeError::Amount("12,50".to_string()))
        );
    }

    #[test]
    fn insight_prefers_float_difference() {
        let raw = r#"{"id": "3", "name": "Groceries", "difference": "-10.00",
                      "difference_float": -10.25, "currency_code": "EUR"}"#;
        let entry: InsightEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.amount().unwrap(), -10.25);

        let raw = r#"{"id": "3", "difference": "-10.00"}"#;
        let entry: InsightEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.amount().unwrap(), -10.0);
    }

    #[test]
    fn decodes_multi_split_group() {
        let raw = r#"{"id": "42", "attributes": {"group_title": "Weekend trip", "transactions": [
            {"transaction_journal_id": "100", "type": "withdrawal", "date": "2025-03-08T10:00:00+01:00",
             "description": "Hotel", "source_id": "1", "source_name": "Checking",
             "destination_id": "9", "destination_name": "Hotel Alpina",
             "category_id": "4", "category_name": "Travel", "amount": "180.00",
             "currency_code": "EUR", "foreign_amount": "190.50", "foreign_currency_code": "CHF"},
            {"transaction_journal_id": "101", "type": "withdrawal", "date": "2025-03-08",
             "description": "Dinner", "source_name": "Checking", "destination_name": "Trattoria",
             "amount": "45.5", "currency_code": "EUR"}
        ]}}"#;
        let item: envelope::Item<GroupAttributes> = serde_json::from_str(raw).unwrap();
        let group = TransactionGroup::from_item(item).unwrap();

        assert_eq!(group.title.as_deref(), Some("Weekend trip"));
        assert_eq!(group.splits.len(), 2);
        assert_eq!(group.splits[0].kind, TransactionType::Withdrawal);
        assert_eq!(
            group.splits[0].date,
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()
        );
        assert_eq!(group.splits[0].foreign_amount, Some(190.5));
        assert_eq!(group.splits[1].category_name, None);
        assert_eq!(group.splits[1].amount, 45.5);
    }

    #[test]
    fn summary_entries_are_ordered_by_key() {
        let raw = r#"{
            "spent-in-EUR": {"key": "spent-in-EUR", "title": "Spent (EUR)",
                             "monetary_value": -310.2, "currency_code": "EUR", "value_parsed": "€-310.20"},
            "balance-in-EUR": {"key": "balance-in-EUR", "title": "Balance (EUR)",
                               "monetary_value": "1200.00", "currency_code": "EUR", "value_parsed": "€1,200.00"}
        }"#;
        let entries: BTreeMap<String, SummaryEntry> = serde_json::from_str(raw).unwrap();
        let items = summary_items(entries).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "balance-in-EUR");
        assert_eq!(items[0].value, 1200.0);
        assert_eq!(items[1].value, -310.2);
    }

    #[test]
    fn new_account_omits_empty_liability_fields() {
        let payload = NewAccount {
            name: "Savings".to_string(),
            account_type: AccountType::Asset,
            currency_code: "EUR".to_string(),
            account_role: Some("defaultAsset".to_string()),
            liability_type: None,
            liability_direction: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "asset");
        assert_eq!(json["account_role"], "defaultAsset");
        assert!(json.get("liability_direction").is_none());
    }
}
