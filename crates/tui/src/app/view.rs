/// The views of the dashboard. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Transactions,
    Assets,
    Categories,
    Expenses,
    Revenues,
    Liabilities,
    NewTransactionForm,
}

impl View {
    /// Views reachable through the tab bar, in display order.
    pub const TABS: [View; 6] = [
        View::Transactions,
        View::Assets,
        View::Categories,
        View::Expenses,
        View::Revenues,
        View::Liabilities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Assets => "Assets",
            Self::Categories => "Categories",
            Self::Expenses => "Expenses",
            Self::Revenues => "Revenues",
            Self::Liabilities => "Liabilities",
            Self::NewTransactionForm => "New transaction",
        }
    }

    /// Views rendered as an entity list in the left panel.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::Assets | Self::Categories | Self::Expenses | Self::Revenues | Self::Liabilities
        )
    }

    pub fn cycle(self, delta: isize) -> Self {
        let current = Self::TABS
            .iter()
            .position(|view| *view == self)
            .unwrap_or(0) as isize;
        let len = Self::TABS.len() as isize;
        Self::TABS[(current + delta).rem_euclid(len) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::View;

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(View::Liabilities.cycle(1), View::Transactions);
        assert_eq!(View::Transactions.cycle(-1), View::Liabilities);
        assert_eq!(View::NewTransactionForm.cycle(1), View::Assets);
    }
}
