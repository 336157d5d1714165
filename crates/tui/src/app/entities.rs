use api_types::{
    account::{Account, AccountFlow, AccountType, LiabilityDirection, LiabilityType, NewAccount},
    category::{CategoryFlow, NewCategory},
};
use thiserror::Error;

use crate::app::{
    command::{Cmd, CreateRequest, FetchRequest, Msg, Payload, Resource},
    entity_list::{ListConfig, ListRow},
    transactions::TransactionFilter,
    view::View,
};

const ASSET_ROLE: &str = "defaultAsset";

/// The kinds of entity that can be created from a one-line prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    Asset,
    Expense,
    Revenue,
    Liability,
    Category,
}

impl CreateKind {
    pub fn noun(self) -> &'static str {
        match self {
            Self::Asset => "asset account",
            Self::Expense => "expense account",
            Self::Revenue => "revenue account",
            Self::Liability => "liability",
            Self::Category => "category",
        }
    }

    /// Comma separated fields, required ones first.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Asset | Self::Expense | Self::Revenue => &["name", "currency"],
            Self::Liability => &["name", "currency", "type", "direction"],
            Self::Category => &["name", "notes"],
        }
    }

    fn required(self) -> usize {
        match self {
            Self::Category => 1,
            other => other.fields().len(),
        }
    }

    fn account_type(self) -> AccountType {
        match self {
            Self::Asset => AccountType::Asset,
            Self::Expense => AccountType::Expense,
            Self::Revenue => AccountType::Revenue,
            Self::Liability => AccountType::Liabilities,
            Self::Category => AccountType::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input, expected: {expected}")]
pub struct InputError {
    expected: String,
}

impl InputError {
    fn for_kind(kind: CreateKind) -> Self {
        Self {
            expected: kind.fields().join(", "),
        }
    }
}

/// Parses the prompt line for `kind` into a creation request.
pub fn parse_create(kind: CreateKind, input: &str) -> Result<CreateRequest, InputError> {
    let invalid = || InputError::for_kind(kind);
    let parts = input.split(',').map(str::trim).collect::<Vec<_>>();
    if parts.len() < kind.required() || parts.len() > kind.fields().len() {
        return Err(invalid());
    }
    if parts[..kind.required()].iter().any(|part| part.is_empty()) {
        return Err(invalid());
    }

    let name = parts[0].to_string();
    let request = match kind {
        CreateKind::Category => CreateRequest::Category(NewCategory {
            name,
            notes: parts
                .get(1)
                .filter(|notes| !notes.is_empty())
                .map(|notes| notes.to_string()),
        }),
        CreateKind::Liability => CreateRequest::Account(NewAccount {
            name,
            account_type: kind.account_type(),
            currency_code: parts[1].to_uppercase(),
            account_role: None,
            liability_type: Some(LiabilityType::parse(parts[2]).ok_or_else(invalid)?),
            liability_direction: Some(LiabilityDirection::parse(parts[3]).ok_or_else(invalid)?),
        }),
        CreateKind::Asset | CreateKind::Expense | CreateKind::Revenue => {
            CreateRequest::Account(NewAccount {
                name,
                account_type: kind.account_type(),
                currency_code: parts[1].to_uppercase(),
                account_role: (kind == CreateKind::Asset).then(|| ASSET_ROLE.to_string()),
                liability_type: None,
                liability_direction: None,
            })
        }
    };
    Ok(request)
}

fn account_filter(account: &Account) -> Cmd {
    Cmd::msg(Msg::FilterTransactions(TransactionFilter::Account {
        id: account.id.clone(),
        name: account.name.clone(),
    }))
}

fn account_select(account: &Account) -> Cmd {
    Cmd::sequence([
        account_filter(account),
        Cmd::msg(Msg::SetFocusedView(View::Transactions)),
    ])
}

fn flow_filter(flow: &AccountFlow) -> Cmd {
    account_filter(&flow.account)
}

fn flow_select(flow: &AccountFlow) -> Cmd {
    account_select(&flow.account)
}

fn category_filter(flow: &CategoryFlow) -> Cmd {
    Cmd::msg(Msg::FilterTransactions(TransactionFilter::Category {
        id: flow.category.id.clone(),
        name: flow.category.name.clone(),
    }))
}

fn category_select(flow: &CategoryFlow) -> Cmd {
    Cmd::sequence([
        category_filter(flow),
        Cmd::msg(Msg::SetFocusedView(View::Transactions)),
    ])
}

fn accounts(payload: Payload) -> Option<Vec<Account>> {
    match payload {
        Payload::Accounts(accounts) => Some(accounts),
        _ => None,
    }
}

fn flows(payload: Payload) -> Option<Vec<AccountFlow>> {
    match payload {
        Payload::AccountFlows(flows) => Some(flows),
        _ => None,
    }
}

fn category_flows(payload: Payload) -> Option<Vec<CategoryFlow>> {
    match payload {
        Payload::Categories(flows) => Some(flows),
        _ => None,
    }
}

fn balance_rows(accounts: &[Account]) -> Vec<ListRow<Account>> {
    accounts
        .iter()
        .map(|account| {
            ListRow::new(
                account.clone(),
                &account.name,
                account.balance,
                &account.currency_code,
            )
        })
        .collect()
}

fn liability_rows(accounts: &[Account]) -> Vec<ListRow<Account>> {
    accounts
        .iter()
        .map(|account| {
            ListRow::new(
                account.clone(),
                &account.name,
                account.signed_balance(),
                &account.currency_code,
            )
        })
        .collect()
}

fn flow_rows(flows: &[AccountFlow]) -> Vec<ListRow<AccountFlow>> {
    flows
        .iter()
        .map(|flow| {
            ListRow::new(
                flow.clone(),
                &flow.account.name,
                flow.amount,
                &flow.account.currency_code,
            )
        })
        .collect()
}

fn category_rows(flows: &[CategoryFlow]) -> Vec<ListRow<CategoryFlow>> {
    flows
        .iter()
        .map(|flow| ListRow::new(flow.clone(), &flow.category.name, flow.net(), &flow.currency_code))
        .collect()
}

pub fn assets() -> ListConfig<Account> {
    ListConfig {
        resource: Resource::Assets,
        view: View::Assets,
        title: "Assets",
        request: |_| FetchRequest::Accounts(AccountType::Asset),
        extract: accounts,
        rows: balance_rows,
        total_row: true,
        period_scoped: false,
        create: CreateKind::Asset,
        on_filter: account_filter,
        on_select: account_select,
    }
}

pub fn liabilities() -> ListConfig<Account> {
    ListConfig {
        resource: Resource::Liabilities,
        view: View::Liabilities,
        title: "Liabilities",
        request: |_| FetchRequest::Accounts(AccountType::Liabilities),
        extract: accounts,
        rows: liability_rows,
        total_row: true,
        period_scoped: false,
        create: CreateKind::Liability,
        on_filter: account_filter,
        on_select: account_select,
    }
}

pub fn expenses() -> ListConfig<AccountFlow> {
    ListConfig {
        resource: Resource::Expenses,
        view: View::Expenses,
        title: "Expenses",
        request: |period| FetchRequest::AccountFlows(AccountType::Expense, *period),
        extract: flows,
        rows: flow_rows,
        total_row: true,
        period_scoped: true,
        create: CreateKind::Expense,
        on_filter: flow_filter,
        on_select: flow_select,
    }
}

pub fn revenues() -> ListConfig<AccountFlow> {
    ListConfig {
        resource: Resource::Revenues,
        view: View::Revenues,
        title: "Revenues",
        request: |period| FetchRequest::AccountFlows(AccountType::Revenue, *period),
        extract: flows,
        rows: flow_rows,
        total_row: true,
        period_scoped: true,
        create: CreateKind::Revenue,
        on_filter: flow_filter,
        on_select: flow_select,
    }
}

pub fn categories() -> ListConfig<CategoryFlow> {
    ListConfig {
        resource: Resource::Categories,
        view: View::Categories,
        title: "Categories",
        request: |period| FetchRequest::Categories(*period),
        extract: category_flows,
        rows: category_rows,
        total_row: false,
        period_scoped: true,
        create: CreateKind::Category,
        on_filter: category_filter,
        on_select: category_select,
    }
}

#[cfg(test)]
mod tests {
    use api_types::category::Category;

    use super::*;

    fn account(id: &str, name: &str, balance: f64) -> Account {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            account_type: AccountType::Liabilities,
            currency_code: "EUR".to_string(),
            balance,
            liability_type: Some(LiabilityType::Loan),
            liability_direction: Some(LiabilityDirection::Debit),
            active: true,
        }
    }

    #[test]
    fn asset_input_uppercases_currency_and_sets_role() {
        let request = parse_create(CreateKind::Asset, " Savings ,  eur ").unwrap();
        let CreateRequest::Account(account) = request else {
            panic!("expected an account");
        };
        assert_eq!(account.name, "Savings");
        assert_eq!(account.currency_code, "EUR");
        assert_eq!(account.account_type, AccountType::Asset);
        assert_eq!(account.account_role.as_deref(), Some(ASSET_ROLE));
    }

    #[test]
    fn expense_input_has_no_role() {
        let CreateRequest::Account(account) =
            parse_create(CreateKind::Expense, "Supermarket, usd").unwrap()
        else {
            panic!("expected an account");
        };
        assert_eq!(account.account_type, AccountType::Expense);
        assert_eq!(account.account_role, None);
    }

    #[test]
    fn liability_requires_all_four_fields() {
        let err = parse_create(CreateKind::Liability, "Car loan, EUR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input, expected: name, currency, type, direction"
        );

        let CreateRequest::Account(account) =
            parse_create(CreateKind::Liability, "Car loan, EUR, loan, credit").unwrap()
        else {
            panic!("expected an account");
        };
        assert_eq!(account.liability_type, Some(LiabilityType::Loan));
        assert_eq!(account.liability_direction, Some(LiabilityDirection::Credit));
    }

    #[test]
    fn liability_rejects_unknown_type() {
        assert!(parse_create(CreateKind::Liability, "Car, EUR, lease, credit").is_err());
        assert!(parse_create(CreateKind::Liability, "Car, EUR, loan, sideways").is_err());
    }

    #[test]
    fn category_notes_are_optional() {
        assert_eq!(
            parse_create(CreateKind::Category, "Groceries").unwrap(),
            CreateRequest::Category(NewCategory {
                name: "Groceries".to_string(),
                notes: None,
            })
        );
        assert_eq!(
            parse_create(CreateKind::Category, "Groceries, weekly shop").unwrap(),
            CreateRequest::Category(NewCategory {
                name: "Groceries".to_string(),
                notes: Some("weekly shop".to_string()),
            })
        );
        assert!(parse_create(CreateKind::Category, "a, b, c").is_err());
    }

    #[test]
    fn empty_required_field_is_rejected() {
        assert!(parse_create(CreateKind::Asset, " , EUR").is_err());
        assert!(parse_create(CreateKind::Revenue, "Salary").is_err());
    }

    #[test]
    fn liability_rows_use_signed_balance() {
        let rows = liability_rows(&[account("1", "Mortgage", 1200.0)]);
        assert_eq!(rows[0].value, -1200.0);
        assert_eq!(rows[0].label, "Mortgage");
    }

    #[test]
    fn category_select_filters_then_focuses_transactions() {
        let flow = CategoryFlow {
            category: Category {
                id: "7".to_string(),
                name: "Rent".to_string(),
                notes: None,
            },
            spent: 900.0,
            earned: 0.0,
            currency_code: "EUR".to_string(),
        };
        assert_eq!(category_rows(std::slice::from_ref(&flow))[0].value, -900.0);
        assert_eq!(
            category_select(&flow),
            Cmd::Sequence(vec![
                Cmd::msg(Msg::FilterTransactions(TransactionFilter::Category {
                    id: "7".to_string(),
                    name: "Rent".to_string(),
                })),
                Cmd::msg(Msg::SetFocusedView(View::Transactions)),
            ])
        );
    }

    #[test]
    fn period_scoped_lists_request_the_period() {
        let period = crate::app::period::Period::month_of(
            chrono::NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        );
        assert_eq!(
            (expenses().request)(&period),
            FetchRequest::AccountFlows(AccountType::Expense, period)
        );
        assert!(!assets().period_scoped);
        assert!(categories().period_scoped);
    }
}
