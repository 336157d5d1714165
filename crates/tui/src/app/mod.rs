pub mod command;
pub mod component;
pub mod entities;
pub mod entity_list;
pub mod layout;
pub mod lazy_load;
pub mod new_transaction;
pub mod period;
pub mod prompt;
pub mod runtime;
pub mod summary;
pub mod transactions;
pub mod view;

use std::time::Duration;

use api_types::{
    account::{Account, AccountFlow},
    category::CategoryFlow,
};
use chrono::NaiveDate;
use crossterm::event::KeyEvent;

use crate::{
    app::{
        command::{Cmd, Level, Msg, Notification, Resource},
        component::Component,
        entity_list::EntityList,
        layout::{LayoutConfig, LayoutInputs},
        lazy_load::LazyLoader,
        new_transaction::NewTransactionForm,
        period::Period,
        prompt::Prompt,
        summary::SummaryPanel,
        transactions::TransactionsView,
        view::View,
    },
    config::AppConfig,
    ui::keymap::{self, GlobalAction},
};

/// Runtime knobs of the orchestrator, resolved from configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub lazy_load_ceiling: u32,
    pub lazy_load_delay: Duration,
    pub notification_ttl: Duration,
    pub today: NaiveDate,
}

impl Settings {
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            lazy_load_ceiling: config.lazy_load_ceiling,
            lazy_load_delay: config.lazy_load_delay(),
            notification_ttl: config.notification_ttl(),
            today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub id: u64,
    pub notification: Notification,
}

/// Owns every view and routes messages between them.
#[derive(Debug)]
pub struct Dashboard {
    view: View,
    period: Period,
    width: u16,
    height: u16,
    layout: LayoutConfig,
    full_view: bool,
    show_full_help: bool,
    transactions: TransactionsView,
    assets: EntityList<Account>,
    liabilities: EntityList<Account>,
    expenses: EntityList<AccountFlow>,
    revenues: EntityList<AccountFlow>,
    categories: EntityList<CategoryFlow>,
    summary: SummaryPanel,
    form: NewTransactionForm,
    prompt: Prompt,
    loader: LazyLoader,
    status: Option<StatusLine>,
    next_notification: u64,
    notification_ttl: Duration,
}

impl Dashboard {
    pub fn new(settings: Settings) -> Self {
        let period = Period::month_of(settings.today);
        let mut transactions = TransactionsView::new(period);
        transactions.focus();

        Self {
            view: View::Transactions,
            period,
            width: 0,
            height: 0,
            layout: LayoutConfig::default(),
            full_view: false,
            show_full_help: false,
            transactions,
            assets: EntityList::new(entities::assets(), period),
            liabilities: EntityList::new(entities::liabilities(), period),
            expenses: EntityList::new(entities::expenses(), period),
            revenues: EntityList::new(entities::revenues(), period),
            categories: EntityList::new(entities::categories(), period),
            summary: SummaryPanel::new(period),
            form: NewTransactionForm::new(settings.today),
            prompt: Prompt::default(),
            loader: LazyLoader::new(settings.lazy_load_ceiling, settings.lazy_load_delay),
            status: None,
            next_notification: 0,
            notification_ttl: settings.notification_ttl,
        }
    }

    /// First command of a session: size the panels and load everything.
    pub fn init(&mut self, width: u16, height: u16) -> Cmd {
        Cmd::batch([
            Cmd::msg(Msg::Resize { width, height }),
            Cmd::msg(Msg::RefreshAll),
        ])
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    pub fn full_view(&self) -> bool {
        self.full_view
    }

    pub fn show_full_help(&self) -> bool {
        self.show_full_help
    }

    pub fn transactions(&self) -> &TransactionsView {
        &self.transactions
    }

    pub fn assets(&self) -> &EntityList<Account> {
        &self.assets
    }

    pub fn liabilities(&self) -> &EntityList<Account> {
        &self.liabilities
    }

    pub fn expenses(&self) -> &EntityList<AccountFlow> {
        &self.expenses
    }

    pub fn revenues(&self) -> &EntityList<AccountFlow> {
        &self.revenues
    }

    pub fn categories(&self) -> &EntityList<CategoryFlow> {
        &self.categories
    }

    pub fn summary(&self) -> &SummaryPanel {
        &self.summary
    }

    pub fn form(&self) -> &NewTransactionForm {
        &self.form
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn loader(&self) -> &LazyLoader {
        &self.loader
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.recompute_layout()
            }
            Msg::RecomputeLayout => self.recompute_layout(),
            Msg::Layout(_) => self.broadcast(&msg),
            Msg::PeriodChanged(period) => {
                self.period = period;
                tracing::info!(period = %period.label(), "period changed");
                Cmd::batch([
                    self.broadcast(&msg),
                    Cmd::msg(Msg::Refresh(Resource::Transactions)),
                    Cmd::msg(Msg::Refresh(Resource::Summary)),
                ])
            }
            Msg::SetFocusedView(view) => self.set_view(view),
            Msg::ToggleFullView => {
                if self.view != View::Transactions {
                    return Cmd::None;
                }
                self.full_view = !self.full_view;
                self.recompute_layout()
            }
            Msg::RefreshAll => self.loader.refresh_all(),
            Msg::Refresh(resource) => self.route(resource, &msg),
            Msg::Fetched { resource, .. } => self.route(resource, &msg),
            Msg::DataLoadCompleted(resource) => {
                self.loader.mark_ready(resource);
                let cmd = self.broadcast(&msg);
                if resource == Resource::Summary {
                    Cmd::batch([cmd, self.recompute_layout()])
                } else {
                    cmd
                }
            }
            Msg::LazyLoadPoll { run, remaining } => self.loader.poll(run, remaining),
            Msg::FilterTransactions(_) => self.transactions.update(&msg),
            Msg::OpenPrompt(request) => {
                self.blur_all();
                self.prompt.open(request);
                Cmd::None
            }
            Msg::Created { resource, result } => self.created(resource, result),
            Msg::Notify(notification) => self.notify(notification),
            Msg::DismissNotification(id) => {
                if self.status.as_ref().is_some_and(|status| status.id == id) {
                    self.status = None;
                }
                Cmd::None
            }
            Msg::Sequenced { msg, rest } => {
                let cmd = self.update(*msg);
                Cmd::batch([cmd, Cmd::sequence(rest)])
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        if self.prompt.is_active() {
            return self.prompt.handle_key(key);
        }

        let form_open = self.view == View::NewTransactionForm;
        if let Some(action) = keymap::map_global(key, form_open) {
            return self.global(action);
        }

        let msg = Msg::Key(key);
        match self.view {
            View::Transactions => self.transactions.update(&msg),
            View::Assets => self.assets.update(&msg),
            View::Categories => self.categories.update(&msg),
            View::Expenses => self.expenses.update(&msg),
            View::Revenues => self.revenues.update(&msg),
            View::Liabilities => self.liabilities.update(&msg),
            View::NewTransactionForm => self.form.update(&msg),
        }
    }

    fn global(&mut self, action: GlobalAction) -> Cmd {
        match action {
            GlobalAction::Quit => Cmd::Quit,
            GlobalAction::ToggleHelp => {
                self.show_full_help = !self.show_full_help;
                self.recompute_layout()
            }
            GlobalAction::PreviousPeriod => Cmd::msg(Msg::PeriodChanged(self.period.previous())),
            GlobalAction::NextPeriod => Cmd::msg(Msg::PeriodChanged(self.period.next())),
            GlobalAction::RefreshAll => Cmd::msg(Msg::RefreshAll),
            GlobalAction::NextTab => Cmd::msg(Msg::SetFocusedView(self.view.cycle(1))),
            GlobalAction::PreviousTab => Cmd::msg(Msg::SetFocusedView(self.view.cycle(-1))),
            GlobalAction::Focus(view) => Cmd::msg(Msg::SetFocusedView(view)),
        }
    }

    fn set_view(&mut self, view: View) -> Cmd {
        tracing::debug!(from = ?self.view, to = ?view, "switching view");
        self.blur_all();
        self.view = view;
        match view {
            View::Transactions => self.transactions.focus(),
            View::Assets => self.assets.focus(),
            View::Categories => self.categories.focus(),
            View::Expenses => self.expenses.focus(),
            View::Revenues => self.revenues.focus(),
            View::Liabilities => self.liabilities.focus(),
            View::NewTransactionForm => self.form.focus(),
        }
        Cmd::msg(Msg::RecomputeLayout)
    }

    fn blur_all(&mut self) {
        self.transactions.blur();
        self.assets.blur();
        self.categories.blur();
        self.expenses.blur();
        self.revenues.blur();
        self.liabilities.blur();
        self.form.blur();
    }

    fn recompute_layout(&mut self) -> Cmd {
        self.layout = LayoutConfig::compute(LayoutInputs {
            width: self.width,
            height: self.height,
            view: self.view,
            full_view: self.full_view,
            show_full_help: self.show_full_help,
            summary_items: self.summary.len(),
        });
        Cmd::msg(Msg::Layout(self.layout))
    }

    fn broadcast(&mut self, msg: &Msg) -> Cmd {
        Cmd::batch([
            self.transactions.update(msg),
            self.assets.update(msg),
            self.categories.update(msg),
            self.expenses.update(msg),
            self.revenues.update(msg),
            self.liabilities.update(msg),
            self.form.update(msg),
            self.summary.update(msg),
        ])
    }

    fn route(&mut self, resource: Resource, msg: &Msg) -> Cmd {
        match resource {
            Resource::Assets => self.assets.update(msg),
            Resource::Expenses => self.expenses.update(msg),
            Resource::Revenues => self.revenues.update(msg),
            Resource::Liabilities => self.liabilities.update(msg),
            Resource::Categories => self.categories.update(msg),
            Resource::Transactions => self.transactions.update(msg),
            Resource::Summary => self.summary.update(msg),
        }
    }

    fn created(&mut self, resource: Resource, result: Result<String, String>) -> Cmd {
        match result {
            Ok(label) => {
                if resource == Resource::Transactions {
                    self.form.clear();
                }
                let refreshes = match resource {
                    Resource::Transactions => vec![
                        Resource::Transactions,
                        Resource::Summary,
                        Resource::Assets,
                    ],
                    other => vec![other],
                };
                Cmd::batch(
                    std::iter::once(Cmd::notify(Notification::info(format!("Created {label}"))))
                        .chain(
                            refreshes
                                .into_iter()
                                .map(|resource| Cmd::msg(Msg::Refresh(resource))),
                        ),
                )
            }
            Err(err) => Cmd::warn(format!("Could not create {}: {err}", resource.name())),
        }
    }

    fn notify(&mut self, notification: Notification) -> Cmd {
        match notification.level {
            Level::Info => tracing::info!("{}", notification.message),
            Level::Warning => tracing::warn!("{}", notification.message),
        }
        self.next_notification += 1;
        let id = self.next_notification;
        self.status = Some(StatusLine { id, notification });
        Cmd::after(self.notification_ttl, Msg::DismissNotification(id))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::app::{
        command::{Deferred, FetchRequest, Payload},
        transactions::TransactionFilter,
    };

    fn dashboard() -> Dashboard {
        let mut dashboard = Dashboard::new(Settings {
            lazy_load_ceiling: 3,
            lazy_load_delay: Duration::from_millis(10),
            notification_ttl: Duration::from_secs(2),
            today: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
        });
        dashboard.update(Msg::Resize {
            width: 120,
            height: 40,
        });
        dashboard
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn starts_on_transactions() {
        let dashboard = dashboard();
        assert_eq!(dashboard.view(), View::Transactions);
        assert!(dashboard.transactions().is_focused());
        assert_eq!(dashboard.period().start, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn focus_change_blurs_others_and_recomputes_layout() {
        let mut dashboard = dashboard();
        let cmd = dashboard.update(Msg::SetFocusedView(View::Assets));
        assert_eq!(cmd, Cmd::msg(Msg::RecomputeLayout));
        assert!(dashboard.assets().is_focused());
        assert!(!dashboard.transactions().is_focused());

        let cmd = dashboard.update(Msg::RecomputeLayout);
        assert_eq!(dashboard.layout().left_panel_width, 60);
        assert_eq!(cmd, Cmd::msg(Msg::Layout(dashboard.layout())));
    }

    #[test]
    fn refresh_all_targets_every_lazy_resource() {
        let mut dashboard = dashboard();
        let cmd = dashboard.update(Msg::RefreshAll);
        let messages = cmd.messages();
        for resource in Resource::LAZY {
            assert!(messages.contains(&&Msg::Refresh(resource)));
        }
        assert!(messages.contains(&&Msg::LazyLoadPoll {
            run: dashboard.loader().run(),
            remaining: 3
        }));
    }

    #[test]
    fn refresh_is_routed_to_the_owner_only() {
        let mut dashboard = dashboard();
        let cmd = dashboard.update(Msg::Refresh(Resource::Expenses));
        let Cmd::Deferred(Deferred::Fetch(fetch)) = cmd else {
            panic!("expected a fetch");
        };
        assert_eq!(fetch.resource, Resource::Expenses);
        assert!(matches!(fetch.request, FetchRequest::AccountFlows(..)));
        assert_eq!(dashboard.expenses().generation(), 1);
        assert_eq!(dashboard.revenues().generation(), 0);
    }

    #[test]
    fn period_keys_shift_month_and_refresh_dependants() {
        let mut dashboard = dashboard();
        dashboard.update(Msg::FilterTransactions(TransactionFilter::Query("rent".to_string())));

        let cmd = dashboard.update(key(KeyCode::Char(']')));
        let next = dashboard.period().next();
        assert_eq!(cmd, Cmd::msg(Msg::PeriodChanged(next)));

        let cmd = dashboard.update(Msg::PeriodChanged(next));
        assert_eq!(dashboard.period(), next);
        assert!(dashboard.transactions().filter().is_none());
        let messages = cmd.messages();
        assert!(messages.contains(&&Msg::Refresh(Resource::Transactions)));
        assert!(messages.contains(&&Msg::Refresh(Resource::Summary)));
        // period scoped lists refresh themselves
        assert_eq!(cmd.deferred().len(), 3);
    }

    #[test]
    fn help_toggle_doubles_legend() {
        let mut dashboard = dashboard();
        dashboard.update(key(KeyCode::Char('?')));
        assert!(dashboard.show_full_help());
        assert_eq!(dashboard.layout().legend_height, 2);
    }

    #[test]
    fn quit_is_global_but_not_inside_prompt() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.update(key(KeyCode::Char('q'))), Cmd::Quit);

        dashboard.update(Msg::OpenPrompt(crate::app::prompt::PromptRequest::search(
            "",
            View::Transactions,
        )));
        assert_eq!(dashboard.update(key(KeyCode::Char('q'))), Cmd::None);
        assert_eq!(dashboard.prompt().input(), Some("q"));
        assert!(!dashboard.transactions().is_focused());
    }

    #[test]
    fn form_only_reacts_to_ctrl_c_globally() {
        let mut dashboard = dashboard();
        dashboard.update(Msg::SetFocusedView(View::NewTransactionForm));
        dashboard.update(key(KeyCode::Tab));
        dashboard.update(key(KeyCode::Tab));
        assert_eq!(dashboard.update(key(KeyCode::Char('q'))), Cmd::None);
        assert_eq!(
            dashboard.form().value(new_transaction::Field::Description),
            "q"
        );
        let ctrl_c = Msg::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(dashboard.update(ctrl_c), Cmd::Quit);
    }

    #[test]
    fn full_view_only_applies_to_transactions() {
        let mut dashboard = dashboard();
        assert_eq!(
            dashboard.update(key(KeyCode::Char('w'))),
            Cmd::msg(Msg::ToggleFullView)
        );
        dashboard.update(Msg::ToggleFullView);
        assert!(dashboard.full_view());
        assert_eq!(dashboard.layout().left_panel_width, 0);

        dashboard.update(Msg::SetFocusedView(View::Assets));
        assert_eq!(dashboard.update(Msg::ToggleFullView), Cmd::None);
    }

    #[test]
    fn notifications_auto_dismiss_by_id() {
        let mut dashboard = dashboard();
        let first = dashboard.update(Msg::Notify(Notification::warning("one")));
        assert_eq!(
            first,
            Cmd::after(Duration::from_secs(2), Msg::DismissNotification(1))
        );
        dashboard.update(Msg::Notify(Notification::info("two")));

        dashboard.update(Msg::DismissNotification(1));
        assert_eq!(
            dashboard.status().map(|s| s.notification.message.as_str()),
            Some("two")
        );
        dashboard.update(Msg::DismissNotification(2));
        assert!(dashboard.status().is_none());
    }

    #[test]
    fn created_transaction_refreshes_balances() {
        let mut dashboard = dashboard();
        let cmd = dashboard.update(Msg::Created {
            resource: Resource::Transactions,
            result: Ok("Lunch".to_string()),
        });
        let messages = cmd.messages();
        assert!(messages.contains(&&Msg::Notify(Notification::info("Created Lunch"))));
        assert!(messages.contains(&&Msg::Refresh(Resource::Assets)));
        assert!(messages.contains(&&Msg::Refresh(Resource::Summary)));

        let cmd = dashboard.update(Msg::Created {
            resource: Resource::Categories,
            result: Err("rejected: name taken".to_string()),
        });
        assert_eq!(
            cmd,
            Cmd::warn("Could not create categories: rejected: name taken")
        );
    }

    fn pump(dashboard: &mut Dashboard, cmd: Cmd) {
        for msg in cmd.messages() {
            let next = dashboard.update(msg.clone());
            pump(dashboard, next);
        }
    }

    fn account(id: usize) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {id:02}"),
            account_type: api_types::account::AccountType::Asset,
            currency_code: "EUR".to_string(),
            balance: 10.0,
            liability_type: None,
            liability_direction: None,
            active: true,
        }
    }

    #[test]
    fn layout_reaches_unfocused_lists() {
        let mut dashboard = dashboard();
        let cmd = dashboard.update(Msg::Resize {
            width: 120,
            height: 40,
        });
        assert!(dashboard.transactions().is_focused());
        pump(&mut dashboard, cmd);
        let rows = dashboard.layout().list_rows() as usize;
        assert!(rows > 1);

        let Cmd::Deferred(Deferred::Fetch(fetch)) = dashboard.update(Msg::Refresh(Resource::Assets))
        else {
            panic!("expected a fetch");
        };
        dashboard.update(Msg::Fetched {
            resource: Resource::Assets,
            generation: fetch.generation,
            result: Ok(Payload::Accounts((0..rows * 2).map(account).collect())),
        });

        // the layout pass from the focus change is not delivered
        dashboard.update(Msg::SetFocusedView(View::Assets));
        dashboard.update(Msg::Key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE)));
        assert_eq!(dashboard.assets().selected(), rows);
    }

    #[test]
    fn transaction_form_is_kept_until_created() {
        let mut dashboard = dashboard();
        dashboard.update(Msg::SetFocusedView(View::NewTransactionForm));
        dashboard.update(key(KeyCode::Tab));
        dashboard.update(key(KeyCode::Tab));
        dashboard.update(key(KeyCode::Char('x')));

        dashboard.update(Msg::Created {
            resource: Resource::Transactions,
            result: Err("server error: boom".to_string()),
        });
        assert_eq!(
            dashboard.form().value(new_transaction::Field::Description),
            "x"
        );

        dashboard.update(Msg::Created {
            resource: Resource::Transactions,
            result: Ok("x".to_string()),
        });
        assert_eq!(
            dashboard.form().value(new_transaction::Field::Description),
            ""
        );
    }

    #[test]
    fn summary_arrival_resizes_panel() {
        let mut dashboard = dashboard();
        dashboard.update(Msg::Refresh(Resource::Summary));
        let cmd = dashboard.update(Msg::Fetched {
            resource: Resource::Summary,
            generation: 1,
            result: Ok(Payload::Summary(Vec::new())),
        });
        assert_eq!(cmd, Cmd::msg(Msg::DataLoadCompleted(Resource::Summary)));
        let cmd = dashboard.update(Msg::DataLoadCompleted(Resource::Summary));
        assert!(cmd.messages().contains(&&Msg::Layout(dashboard.layout())));
    }
}
