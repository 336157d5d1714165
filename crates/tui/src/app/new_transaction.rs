use api_types::transaction::{NewSplit, NewTransaction, TransactionType};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::app::{
    command::{Cmd, CreateRequest, Deferred, Msg},
    component::Component,
    view::View,
};

const KINDS: [TransactionType; 3] = [
    TransactionType::Withdrawal,
    TransactionType::Deposit,
    TransactionType::Transfer,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    Date,
    Description,
    Amount,
    Source,
    Destination,
    Category,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Kind,
        Field::Date,
        Field::Description,
        Field::Amount,
        Field::Source,
        Field::Destination,
        Field::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Source => "Source",
            Self::Destination => "Destination",
            Self::Category => "Category",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn step(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        Self::ALL[(self.index() as isize + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid date, expected YYYY-MM-DD")]
    Date,
    #[error("Invalid amount, expected a positive number")]
    Amount,
}

/// Multi-field form creating a single-split transaction.
#[derive(Debug)]
pub struct NewTransactionForm {
    kind: usize,
    values: [String; 7],
    field: Field,
    today: NaiveDate,
    focused: bool,
}

impl NewTransactionForm {
    pub fn new(today: NaiveDate) -> Self {
        let mut form = Self {
            kind: 0,
            values: Default::default(),
            field: Field::Kind,
            today,
            focused: false,
        };
        form.clear();
        form
    }

    pub fn kind(&self) -> TransactionType {
        KINDS[self.kind]
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Kind => self.kind().as_str(),
            other => &self.values[other.index()],
        }
    }

    pub fn clear(&mut self) {
        self.kind = 0;
        self.values = Default::default();
        self.values[Field::Date.index()] = self.today.format("%Y-%m-%d").to_string();
        self.field = Field::Kind;
    }

    fn text(&self, field: Field) -> &str {
        self.values[field.index()].trim()
    }

    fn required(&self, field: Field) -> Result<String, FormError> {
        let value = self.text(field);
        if value.is_empty() {
            return Err(FormError::Missing(field.label()));
        }
        Ok(value.to_string())
    }

    /// Validates every field and builds the request.
    pub fn build(&self) -> Result<NewTransaction, FormError> {
        let date = NaiveDate::parse_from_str(self.text(Field::Date), "%Y-%m-%d")
            .map_err(|_| FormError::Date)?;
        let description = self.required(Field::Description)?;
        let amount = self.text(Field::Amount).replace(',', ".");
        match amount.parse::<f64>() {
            Ok(value) if value > 0.0 && value.is_finite() => {}
            _ => return Err(FormError::Amount),
        }
        let source_name = self.required(Field::Source)?;
        let destination_name = self.required(Field::Destination)?;
        let category = self.text(Field::Category);

        Ok(NewTransaction {
            error_if_duplicate_hash: true,
            apply_rules: true,
            transactions: vec![NewSplit {
                kind: self.kind(),
                date,
                amount,
                description,
                source_name,
                destination_name,
                category_name: (!category.is_empty()).then(|| category.to_string()),
            }],
        })
    }

    fn submit(&mut self) -> Cmd {
        match self.build() {
            Ok(transaction) => Cmd::sequence([
                Cmd::msg(Msg::SetFocusedView(View::Transactions)),
                Cmd::Deferred(Deferred::Create(CreateRequest::Transaction(transaction))),
            ]),
            Err(err) => Cmd::warn(err.to_string()),
        }
    }

    fn cycle_kind(&mut self, delta: isize) {
        let len = KINDS.len() as isize;
        self.kind = (self.kind as isize + delta).rem_euclid(len) as usize;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.field = self.field.step(1),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.step(-1),
            KeyCode::Left if self.field == Field::Kind => self.cycle_kind(-1),
            KeyCode::Right if self.field == Field::Kind => self.cycle_kind(1),
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => return Cmd::msg(Msg::SetFocusedView(View::Transactions)),
            KeyCode::Backspace if self.field != Field::Kind => {
                self.values[self.field.index()].pop();
            }
            KeyCode::Char(ch)
                if self.field != Field::Kind && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.values[self.field.index()].push(ch);
            }
            _ => {}
        }
        Cmd::None
    }
}

impl Component for NewTransactionForm {
    fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) if self.focused => self.handle_key(*key),
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
