use api_types::summary::SummaryItem;

use crate::app::{
    command::{Cmd, Deferred, Fetch, FetchRequest, Msg, Payload, Resource},
    period::Period,
};

/// Headline figures for the active period. Never focused.
#[derive(Debug)]
pub struct SummaryPanel {
    items: Vec<SummaryItem>,
    period: Period,
    generation: u64,
}

impl SummaryPanel {
    pub fn new(period: Period) -> Self {
        Self {
            items: Vec::new(),
            period,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[SummaryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn refresh(&mut self) -> Cmd {
        self.generation += 1;
        Cmd::Deferred(Deferred::Fetch(Fetch {
            resource: Resource::Summary,
            generation: self.generation,
            request: FetchRequest::Summary(self.period),
        }))
    }

    pub fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::PeriodChanged(period) => {
                self.period = *period;
                Cmd::None
            }
            Msg::Refresh(Resource::Summary) => self.refresh(),
            Msg::Fetched {
                resource: Resource::Summary,
                generation,
                result,
            } => {
                if *generation < self.generation {
                    return Cmd::None;
                }
                match result {
                    Ok(Payload::Summary(items)) => {
                        self.items = items.clone();
                        Cmd::msg(Msg::DataLoadCompleted(Resource::Summary))
                    }
                    Ok(_) => Cmd::warn("Summary: unexpected response"),
                    Err(err) => {
                        tracing::warn!("summary refresh failed: {err}");
                        Cmd::warn(format!("Summary: {err}"))
                    }
                }
            }
            _ => Cmd::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn item(key: &str) -> SummaryItem {
        SummaryItem {
            key: key.to_string(),
            title: key.to_string(),
            value: 1.0,
            currency_code: "EUR".to_string(),
            formatted: "€1.00".to_string(),
        }
    }

    #[test]
    fn refresh_uses_current_period() {
        let march = Period::month_of(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let april = march.next();
        let mut panel = SummaryPanel::new(march);
        panel.update(&Msg::PeriodChanged(april));

        let cmd = panel.update(&Msg::Refresh(Resource::Summary));
        assert_eq!(
            cmd,
            Cmd::Deferred(Deferred::Fetch(Fetch {
                resource: Resource::Summary,
                generation: 1,
                request: FetchRequest::Summary(april),
            }))
        );
    }

    #[test]
    fn fetched_items_replace_and_report_completion() {
        let mut panel = SummaryPanel::new(Period::month_of(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        ));
        panel.refresh();
        let cmd = panel.update(&Msg::Fetched {
            resource: Resource::Summary,
            generation: 1,
            result: Ok(Payload::Summary(vec![item("balance-in-EUR"), item("spent-in-EUR")])),
        });
        assert_eq!(cmd, Cmd::msg(Msg::DataLoadCompleted(Resource::Summary)));
        assert_eq!(panel.len(), 2);
    }
}
