use chrono::{Datelike, Months, NaiveDate};

/// The reporting window: one calendar month, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(start);
        Self { start, end }
    }

    pub fn previous(&self) -> Self {
        self.start
            .checked_sub_months(Months::new(1))
            .map(Self::month_of)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.start
            .checked_add_months(Months::new(1))
            .map(Self::month_of)
            .unwrap_or(*self)
    }

    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds() {
        let period = Period::month_of(day(2024, 2, 17));
        assert_eq!(period.start, day(2024, 2, 1));
        assert_eq!(period.end, day(2024, 2, 29));
        assert!(period.contains(day(2024, 2, 29)));
        assert!(!period.contains(day(2024, 3, 1)));
    }

    #[test]
    fn shifting_crosses_year_boundaries() {
        let january = Period::month_of(day(2025, 1, 10));
        let december = january.previous();
        assert_eq!(december.start, day(2024, 12, 1));
        assert_eq!(december.end, day(2024, 12, 31));
        assert_eq!(december.next(), january);
        assert_eq!(january.label(), "January 2025");
    }
}
