use api_types::transaction::{Split, TransactionGroup};
use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    app::{
        command::{Cmd, Deferred, Fetch, FetchRequest, Msg, Payload, Resource},
        component::Component,
        layout::LayoutConfig,
        period::Period,
        prompt::PromptRequest,
        view::View,
    },
    ui::components::money::format_amount,
};

/// The active narrowing of the loaded transactions. Setting one replaces the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    None,
    Account { id: String, name: String },
    Category { id: String, name: String },
    Query(String),
}

impl TransactionFilter {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Query(query) => query,
            _ => "",
        }
    }

    /// Short description for the panel title.
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Account { name, .. } => Some(format!("account: {name}")),
            Self::Category { name, .. } => Some(format!("category: {name}")),
            Self::Query(query) => Some(format!("search: {query}")),
        }
    }
}

/// One split of a transaction group, as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub group_id: String,
    pub title: Option<String>,
    pub split: Split,
}

/// Matches both the plain and the grouped rendering, e.g. `1200.00` and `1,200.00`.
fn amount_matches(amount: f64, contains: &impl Fn(&str) -> bool) -> bool {
    contains(&format!("{amount:.2}")) || contains(&format_amount(amount))
}

fn split_matches_query(title: Option<&str>, split: &Split, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);
    title.is_some_and(contains)
        || contains(&split.description)
        || contains(&split.source_name)
        || contains(&split.destination_name)
        || split.category_name.as_deref().is_some_and(contains)
        || amount_matches(split.amount, &contains)
        || contains(&split.currency_code)
        || split
            .foreign_amount
            .is_some_and(|amount| amount_matches(amount, &contains))
        || split.foreign_currency_code.as_deref().is_some_and(contains)
}

fn split_matches(title: Option<&str>, split: &Split, filter: &TransactionFilter) -> bool {
    match filter {
        TransactionFilter::None => true,
        TransactionFilter::Account { id, .. } => {
            split.source_id.as_deref() == Some(id.as_str())
                || split.destination_id.as_deref() == Some(id.as_str())
        }
        TransactionFilter::Category { id, .. } => split.category_id.as_deref() == Some(id.as_str()),
        TransactionFilter::Query(query) => {
            split_matches_query(title, split, &query.to_lowercase())
        }
    }
}

/// Rows of `groups` visible under `filter`, one per matching split.
pub fn filter_rows(groups: &[TransactionGroup], filter: &TransactionFilter) -> Vec<TransactionRow> {
    groups
        .iter()
        .flat_map(|group| {
            group
                .splits
                .iter()
                .filter(|split| split_matches(group.title.as_deref(), split, filter))
                .map(|split| TransactionRow {
                    group_id: group.id.clone(),
                    title: group.title.clone(),
                    split: split.clone(),
                })
        })
        .collect()
}

/// The transaction table.
#[derive(Debug)]
pub struct TransactionsView {
    groups: Vec<TransactionGroup>,
    rows: Vec<TransactionRow>,
    filter: TransactionFilter,
    selected: usize,
    focused: bool,
    loaded: bool,
    layout: LayoutConfig,
    period: Period,
    generation: u64,
}

impl TransactionsView {
    pub fn new(period: Period) -> Self {
        Self {
            groups: Vec::new(),
            rows: Vec::new(),
            filter: TransactionFilter::None,
            selected: 0,
            focused: false,
            loaded: false,
            layout: LayoutConfig::default(),
            period,
            generation: 0,
        }
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rows shown with no filter applied.
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|group| group.splits.len()).sum()
    }

    pub fn refresh(&mut self) -> Cmd {
        self.generation += 1;
        Cmd::Deferred(Deferred::Fetch(Fetch {
            resource: Resource::Transactions,
            generation: self.generation,
            request: FetchRequest::Transactions(self.period),
        }))
    }

    pub fn apply_result(&mut self, generation: u64, result: &Result<Payload, String>) -> Cmd {
        if generation < self.generation {
            tracing::debug!(generation, latest = self.generation, "dropping stale transactions");
            return Cmd::None;
        }
        match result {
            Ok(Payload::Transactions(groups)) => {
                self.groups = groups.clone();
                self.loaded = true;
                self.rebuild();
                Cmd::msg(Msg::DataLoadCompleted(Resource::Transactions))
            }
            Ok(_) => {
                tracing::error!("unexpected payload for transactions");
                Cmd::warn("Transactions: unexpected response")
            }
            Err(err) => {
                tracing::warn!("transaction refresh failed: {err}");
                Cmd::warn(format!("Transactions: {err}"))
            }
        }
    }

    pub fn set_filter(&mut self, filter: TransactionFilter) {
        tracing::debug!(?filter, "filtering transactions");
        self.filter = filter;
        self.selected = 0;
        self.rebuild();
    }

    pub fn reset(&mut self) {
        self.set_filter(TransactionFilter::None);
    }

    fn rebuild(&mut self) {
        self.rows = filter_rows(&self.groups, &self.filter);
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, self.rows.len() as isize - 1);
        self.selected = next as usize;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        let page = self.layout.table_rows().max(1) as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-page),
            KeyCode::PageDown => self.move_selection(page),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.move_selection(isize::MAX / 2),
            KeyCode::Char('/') => {
                return Cmd::msg(Msg::OpenPrompt(PromptRequest::search(
                    self.filter.query(),
                    View::Transactions,
                )));
            }
            KeyCode::Esc => self.reset(),
            KeyCode::Char('r') => return self.refresh(),
            KeyCode::Char('w') => return Cmd::msg(Msg::ToggleFullView),
            KeyCode::Char('n') => return Cmd::msg(Msg::SetFocusedView(View::NewTransactionForm)),
            _ => {}
        }
        Cmd::None
    }
}

impl Component for TransactionsView {
    fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) if self.focused => self.handle_key(*key),
            Msg::Layout(layout) => {
                self.layout = *layout;
                Cmd::None
            }
            Msg::PeriodChanged(period) => {
                self.period = *period;
                if matches!(self.filter, TransactionFilter::Query(_)) {
                    self.reset();
                }
                Cmd::None
            }
            Msg::Refresh(Resource::Transactions) => self.refresh(),
            Msg::Fetched {
                resource: Resource::Transactions,
                generation,
                result,
            } => self.apply_result(*generation, result),
            Msg::FilterTransactions(filter) => {
                self.set_filter(filter.clone());
                Cmd::None
            }
            _ => Cmd::None,
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}
