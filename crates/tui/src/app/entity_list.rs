use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    command::{Cmd, Deferred, Fetch, FetchRequest, Msg, Payload, Resource},
    component::Component,
    entities::CreateKind,
    layout::LayoutConfig,
    period::Period,
    prompt::PromptRequest,
    view::View,
};

pub const TOTAL_LABEL: &str = "Total";

/// One display row. The synthetic total row carries no entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow<E> {
    pub entity: Option<E>,
    pub label: String,
    pub value: f64,
    pub currency: String,
}

impl<E> ListRow<E> {
    pub fn new(entity: E, label: impl Into<String>, value: f64, currency: impl Into<String>) -> Self {
        Self {
            entity: Some(entity),
            label: label.into(),
            value,
            currency: currency.into(),
        }
    }

    pub fn is_total(&self) -> bool {
        self.entity.is_none()
    }

    fn total(rows: &[ListRow<E>]) -> Self {
        let value = rows.iter().map(|row| row.value).sum();
        let currency = match rows.split_first() {
            Some((first, rest)) if rest.iter().all(|row| row.currency == first.currency) => {
                first.currency.clone()
            }
            _ => String::new(),
        };
        Self {
            entity: None,
            label: TOTAL_LABEL.to_string(),
            value,
            currency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Unsorted,
    /// Descending by value; zero-value rows are hidden.
    ByValue,
}

/// Immutable wiring of an [`EntityList`], built once at startup.
#[derive(Debug)]
pub struct ListConfig<E> {
    pub resource: Resource,
    pub view: View,
    pub title: &'static str,
    pub request: fn(&Period) -> FetchRequest,
    pub extract: fn(Payload) -> Option<Vec<E>>,
    pub rows: fn(&[E]) -> Vec<ListRow<E>>,
    pub total_row: bool,
    pub period_scoped: bool,
    pub create: CreateKind,
    pub on_filter: fn(&E) -> Cmd,
    pub on_select: fn(&E) -> Cmd,
}

/// Selectable list of entities shared by every account-type view.
#[derive(Debug)]
pub struct EntityList<E> {
    config: ListConfig<E>,
    entities: Vec<E>,
    rows: Vec<ListRow<E>>,
    selected: usize,
    sort: SortMode,
    focused: bool,
    loaded: bool,
    layout: LayoutConfig,
    period: Period,
    generation: u64,
}

impl<E: Clone> EntityList<E> {
    pub fn new(config: ListConfig<E>, period: Period) -> Self {
        Self {
            config,
            entities: Vec::new(),
            rows: Vec::new(),
            selected: 0,
            sort: SortMode::default(),
            focused: false,
            loaded: false,
            layout: LayoutConfig::default(),
            period,
            generation: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        self.config.title
    }

    pub fn resource(&self) -> Resource {
        self.config.resource
    }

    pub fn rows(&self) -> &[ListRow<E>] {
        &self.rows
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&ListRow<E>> {
        self.rows.get(self.selected)
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn select_index(&mut self, index: usize) {
        self.selected = index.min(self.rows.len().saturating_sub(1));
    }

    /// Issues a fetch stamped with a fresh generation.
    pub fn refresh(&mut self) -> Cmd {
        self.generation += 1;
        Cmd::Deferred(Deferred::Fetch(Fetch {
            resource: self.config.resource,
            generation: self.generation,
            request: (self.config.request)(&self.period),
        }))
    }

    /// Applies a fetch result. Results of superseded refreshes are dropped.
    pub fn apply_result(&mut self, generation: u64, result: &Result<Payload, String>) -> Cmd {
        if generation < self.generation {
            tracing::debug!(
                resource = self.config.resource.name(),
                generation,
                latest = self.generation,
                "dropping stale refresh"
            );
            return Cmd::None;
        }

        match result {
            Ok(payload) => match (self.config.extract)(payload.clone()) {
                Some(entities) => self.apply_update(entities),
                None => {
                    tracing::error!(resource = self.config.resource.name(), "unexpected payload");
                    Cmd::warn(format!("{}: unexpected response", self.config.title))
                }
            },
            Err(err) => {
                tracing::warn!(resource = self.config.resource.name(), "refresh failed: {err}");
                Cmd::warn(format!("{}: {err}", self.config.title))
            }
        }
    }

    pub fn apply_update(&mut self, entities: Vec<E>) -> Cmd {
        self.entities = entities;
        self.loaded = true;
        self.rebuild();
        Cmd::msg(Msg::DataLoadCompleted(self.config.resource))
    }

    pub fn toggle_sort(&mut self) -> Cmd {
        self.sort = match self.sort {
            SortMode::Unsorted => SortMode::ByValue,
            SortMode::ByValue => SortMode::Unsorted,
        };
        self.rebuild();
        Cmd::None
    }

    pub fn filter(&self) -> Cmd {
        match self.selected_row().and_then(|row| row.entity.as_ref()) {
            Some(entity) => (self.config.on_filter)(entity),
            None => Cmd::None,
        }
    }

    pub fn select(&self) -> Cmd {
        match self.selected_row().and_then(|row| row.entity.as_ref()) {
            Some(entity) => (self.config.on_select)(entity),
            None => Cmd::None,
        }
    }

    pub fn prompt_create(&self) -> Cmd {
        Cmd::msg(Msg::OpenPrompt(PromptRequest::create(
            self.config.create,
            self.config.view,
        )))
    }

    fn rebuild(&mut self) {
        let mut rows = (self.config.rows)(&self.entities);
        if self.sort == SortMode::ByValue {
            rows.retain(|row| row.value != 0.0);
            rows.sort_by(|a, b| b.value.total_cmp(&a.value));
        }
        if self.config.total_row {
            let total = ListRow::total(&rows);
            rows.insert(0, total);
        }
        self.rows = rows;
        self.select_index(self.selected);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, self.rows.len() as isize - 1);
        self.selected = next as usize;
    }

    fn page(&self) -> isize {
        self.layout.list_rows().max(1) as isize
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-self.page()),
            KeyCode::PageDown => self.move_selection(self.page()),
            KeyCode::Home | KeyCode::Char('g') => self.select_index(0),
            KeyCode::End | KeyCode::Char('G') => self.select_index(usize::MAX),
            KeyCode::Char('s') => return self.toggle_sort(),
            KeyCode::Char('r') => return self.refresh(),
            KeyCode::Char('f') => return self.filter(),
            KeyCode::Enter => return self.select(),
            KeyCode::Char('n') => return self.prompt_create(),
            KeyCode::Esc => return Cmd::msg(Msg::SetFocusedView(View::Transactions)),
            _ => {}
        }
        Cmd::None
    }
}

impl<E: Clone> Component for EntityList<E> {
    fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) if self.focused => self.handle_key(*key),
            Msg::Layout(layout) => {
                self.layout = *layout;
                Cmd::None
            }
            Msg::PeriodChanged(period) => {
                self.period = *period;
                if self.config.period_scoped {
                    self.refresh()
                } else {
                    Cmd::None
                }
            }
            Msg::Refresh(resource) if *resource == self.config.resource => self.refresh(),
            Msg::Fetched {
                resource,
                generation,
                result,
            } if *resource == self.config.resource => self.apply_result(*generation, result),
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
