use std::time::Duration;

use api_types::{
    account::{Account, AccountFlow, AccountType, NewAccount},
    category::{CategoryFlow, NewCategory},
    summary::SummaryItem,
    transaction::{NewTransaction, TransactionGroup},
};
use crossterm::event::KeyEvent;

use crate::app::{
    layout::LayoutConfig, period::Period, prompt::PromptRequest, transactions::TransactionFilter,
    view::View,
};

/// Data sources the dashboard refreshes independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Assets,
    Expenses,
    Revenues,
    Liabilities,
    Categories,
    Transactions,
    Summary,
}

impl Resource {
    /// Resources that must all be loaded before the full dashboard is shown.
    pub const LAZY: [Resource; 5] = [
        Resource::Assets,
        Resource::Expenses,
        Resource::Revenues,
        Resource::Liabilities,
        Resource::Categories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Expenses => "expenses",
            Self::Revenues => "revenues",
            Self::Liabilities => "liabilities",
            Self::Categories => "categories",
            Self::Transactions => "transactions",
            Self::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Accounts(AccountType),
    AccountFlows(AccountType, Period),
    Categories(Period),
    Transactions(Period),
    Summary(Period),
}

/// A refresh call, stamped with the generation of the component that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetch {
    pub resource: Resource,
    pub generation: u64,
    pub request: FetchRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Accounts(Vec<Account>),
    AccountFlows(Vec<AccountFlow>),
    Categories(Vec<CategoryFlow>),
    Transactions(Vec<TransactionGroup>),
    Summary(Vec<SummaryItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateRequest {
    Account(NewAccount),
    Category(NewCategory),
    Transaction(NewTransaction),
}

impl CreateRequest {
    /// The resource to refresh once the creation went through.
    pub fn resource(&self) -> Resource {
        match self {
            Self::Account(account) => match account.account_type {
                AccountType::Expense => Resource::Expenses,
                AccountType::Revenue => Resource::Revenues,
                AccountType::Liabilities => Resource::Liabilities,
                AccountType::Asset | AccountType::Other => Resource::Assets,
            },
            Self::Category(_) => Resource::Categories,
            Self::Transaction(_) => Resource::Transactions,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Account(account) => account.name.clone(),
            Self::Category(category) => category.name.clone(),
            Self::Transaction(transaction) => transaction
                .transactions
                .first()
                .map(|split| split.description.clone())
                .unwrap_or_default(),
        }
    }
}

/// Work the runtime performs off the event loop.
///
/// Running a deferred command yields exactly one [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    Fetch(Fetch),
    Create(CreateRequest),
    Delay { after: Duration, msg: Box<Msg> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    RecomputeLayout,
    Layout(LayoutConfig),
    PeriodChanged(Period),
    SetFocusedView(View),
    ToggleFullView,
    RefreshAll,
    Refresh(Resource),
    Fetched {
        resource: Resource,
        generation: u64,
        result: Result<Payload, String>,
    },
    DataLoadCompleted(Resource),
    LazyLoadPoll {
        run: u64,
        remaining: u32,
    },
    FilterTransactions(TransactionFilter),
    OpenPrompt(PromptRequest),
    Created {
        resource: Resource,
        result: Result<String, String>,
    },
    Notify(Notification),
    DismissNotification(u64),
    /// Result of the head of a sequence; `rest` runs once `msg` is processed.
    Sequenced {
        msg: Box<Msg>,
        rest: Vec<Cmd>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    #[default]
    None,
    Msg(Msg),
    Deferred(Deferred),
    /// Unordered: members are dispatched together and may interleave.
    Batch(Vec<Cmd>),
    /// Ordered: each member starts after the previous one's message was processed.
    Sequence(Vec<Cmd>),
    Quit,
}

impl Cmd {
    pub fn msg(msg: Msg) -> Self {
        Self::Msg(msg)
    }

    pub fn batch(cmds: impl IntoIterator<Item = Cmd>) -> Self {
        let mut cmds = cmds
            .into_iter()
            .filter(|cmd| !cmd.is_none())
            .collect::<Vec<_>>();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    pub fn sequence(cmds: impl IntoIterator<Item = Cmd>) -> Self {
        let mut cmds = cmds
            .into_iter()
            .filter(|cmd| !cmd.is_none())
            .collect::<Vec<_>>();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Sequence(cmds),
        }
    }

    pub fn after(after: Duration, msg: Msg) -> Self {
        Self::Deferred(Deferred::Delay {
            after,
            msg: Box::new(msg),
        })
    }

    pub fn notify(notification: Notification) -> Self {
        Self::Msg(Msg::Notify(notification))
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::notify(Notification::warning(message))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Messages carried by this command, in declaration order.
    pub fn messages(&self) -> Vec<&Msg> {
        match self {
            Self::Msg(msg) => vec![msg],
            Self::Batch(cmds) | Self::Sequence(cmds) => {
                cmds.iter().flat_map(Cmd::messages).collect()
            }
            Self::None | Self::Deferred(_) | Self::Quit => Vec::new(),
        }
    }

    /// Deferred work carried by this command, in declaration order.
    pub fn deferred(&self) -> Vec<&Deferred> {
        match self {
            Self::Deferred(deferred) => vec![deferred],
            Self::Batch(cmds) | Self::Sequence(cmds) => {
                cmds.iter().flat_map(Cmd::deferred).collect()
            }
            Self::None | Self::Msg(_) | Self::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_drops_noops_and_unwraps_singletons() {
        assert_eq!(Cmd::batch([Cmd::None, Cmd::None]), Cmd::None);
        assert_eq!(
            Cmd::batch([Cmd::None, Cmd::msg(Msg::RefreshAll)]),
            Cmd::msg(Msg::RefreshAll)
        );
        assert!(matches!(
            Cmd::sequence([Cmd::msg(Msg::RefreshAll), Cmd::Quit]),
            Cmd::Sequence(cmds) if cmds.len() == 2
        ));
    }

    #[test]
    fn messages_walks_nested_commands() {
        let cmd = Cmd::batch([
            Cmd::sequence([
                Cmd::msg(Msg::Refresh(Resource::Assets)),
                Cmd::after(Duration::from_secs(1), Msg::RefreshAll),
            ]),
            Cmd::msg(Msg::Refresh(Resource::Summary)),
        ]);
        assert_eq!(
            cmd.messages(),
            vec![
                &Msg::Refresh(Resource::Assets),
                &Msg::Refresh(Resource::Summary)
            ]
        );
        assert_eq!(cmd.deferred().len(), 1);
    }

    #[test]
    fn created_account_refreshes_its_list() {
        let request = CreateRequest::Account(NewAccount {
            name: "Mortgage".to_string(),
            account_type: AccountType::Liabilities,
            currency_code: "EUR".to_string(),
            account_role: None,
            liability_type: None,
            liability_direction: None,
        });
        assert_eq!(request.resource(), Resource::Liabilities);
        assert_eq!(request.label(), "Mortgage");
    }
}
