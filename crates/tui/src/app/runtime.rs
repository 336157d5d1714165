use std::{collections::VecDeque, time::Duration};

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    app::{
        Dashboard, Settings,
        command::{Cmd, CreateRequest, Deferred, Fetch, FetchRequest, Msg, Payload},
    },
    client::DataApi,
    error::{AppError, Result},
    ui,
};

const TICK_RATE: Duration = Duration::from_millis(50);

/// Runs a deferred command to completion, yielding its single message.
pub async fn execute<A: DataApi>(api: &A, deferred: Deferred) -> Msg {
    match deferred {
        Deferred::Fetch(fetch) => fetched(api, fetch).await,
        Deferred::Create(request) => created(api, request).await,
        Deferred::Delay { after, msg } => {
            tokio::time::sleep(after).await;
            *msg
        }
    }
}

async fn fetched<A: DataApi>(api: &A, fetch: Fetch) -> Msg {
    let result = match fetch.request {
        FetchRequest::Accounts(account_type) => {
            api.accounts(account_type).await.map(Payload::Accounts)
        }
        FetchRequest::AccountFlows(account_type, period) => api
            .account_flows(account_type, period)
            .await
            .map(Payload::AccountFlows),
        FetchRequest::Categories(period) => api.categories(period).await.map(Payload::Categories),
        FetchRequest::Transactions(period) => {
            api.transactions(period).await.map(Payload::Transactions)
        }
        FetchRequest::Summary(period) => api.summary(period).await.map(Payload::Summary),
    };
    if let Err(err) = &result {
        tracing::warn!(resource = fetch.resource.name(), "fetch failed: {err}");
    }
    Msg::Fetched {
        resource: fetch.resource,
        generation: fetch.generation,
        result: result.map_err(|err| err.to_string()),
    }
}

async fn created<A: DataApi>(api: &A, request: CreateRequest) -> Msg {
    let resource = request.resource();
    let label = request.label();
    let result = match request {
        CreateRequest::Account(account) => api.create_account(account).await,
        CreateRequest::Category(category) => api.create_category(category).await,
        CreateRequest::Transaction(transaction) => api.create_transaction(transaction).await,
    };
    Msg::Created {
        resource,
        result: result.map(|_| label).map_err(|err| err.to_string()),
    }
}

/// Executes commands on behalf of the dashboard.
///
/// Immediate messages are queued locally; deferred work runs on tokio
/// tasks and reports back over an unbounded channel.
pub struct Runtime<A: DataApi> {
    api: A,
    sender: UnboundedSender<Msg>,
    receiver: UnboundedReceiver<Msg>,
    queue: VecDeque<Msg>,
    quit: bool,
}

impl<A: DataApi> Runtime<A> {
    pub fn new(api: A) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            api,
            sender,
            receiver,
            queue: VecDeque::new(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn push(&mut self, msg: Msg) {
        self.queue.push_back(msg);
    }

    pub fn dispatch(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(msg) => self.queue.push_back(msg),
            Cmd::Deferred(deferred) => self.spawn(deferred, Vec::new()),
            Cmd::Batch(cmds) => cmds.into_iter().for_each(|cmd| self.dispatch(cmd)),
            Cmd::Sequence(cmds) => self.dispatch_sequence(cmds),
            Cmd::Quit => self.quit = true,
        }
    }

    /// Starts the head of a sequence; the rest rides along with its message.
    fn dispatch_sequence(&mut self, mut cmds: Vec<Cmd>) {
        if cmds.is_empty() {
            return;
        }
        let head = cmds.remove(0);
        let rest = cmds;
        match head {
            Cmd::None => self.dispatch_sequence(rest),
            Cmd::Msg(msg) if rest.is_empty() => self.queue.push_back(msg),
            Cmd::Msg(msg) => self.queue.push_back(Msg::Sequenced {
                msg: Box::new(msg),
                rest,
            }),
            Cmd::Deferred(deferred) => self.spawn(deferred, rest),
            Cmd::Sequence(mut inner) => {
                inner.extend(rest);
                self.dispatch_sequence(inner);
            }
            Cmd::Batch(cmds) => {
                cmds.into_iter().for_each(|cmd| self.dispatch(cmd));
                self.dispatch_sequence(rest);
            }
            Cmd::Quit => self.quit = true,
        }
    }

    fn spawn(&self, deferred: Deferred, rest: Vec<Cmd>) {
        let api = self.api.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let msg = execute(&api, deferred).await;
            let msg = if rest.is_empty() {
                msg
            } else {
                Msg::Sequenced {
                    msg: Box::new(msg),
                    rest,
                }
            };
            if sender.send(msg).is_err() {
                tracing::debug!("runtime stopped before a deferred command finished");
            }
        });
    }

    /// Feeds one message to the dashboard and dispatches what it returns.
    pub fn handle(&mut self, dashboard: &mut Dashboard, msg: Msg) {
        let cmd = dashboard.update(msg);
        self.dispatch(cmd);
    }

    /// Processes queued and already delivered messages until none are ready.
    pub fn drain(&mut self, dashboard: &mut Dashboard) {
        while !self.quit {
            if let Some(msg) = self.queue.pop_front() {
                self.handle(dashboard, msg);
                continue;
            }
            match self.receiver.try_recv() {
                Ok(msg) => self.handle(dashboard, msg),
                Err(_) => break,
            }
        }
    }

    /// Waits for the next deferred message, then drains.
    pub async fn step(&mut self, dashboard: &mut Dashboard) {
        self.drain(dashboard);
        if self.quit {
            return;
        }
        if let Some(msg) = self.receiver.recv().await {
            self.handle(dashboard, msg);
            self.drain(dashboard);
        }
    }
}

/// Terminal front end: owns the dashboard and the runtime.
pub struct App<A: DataApi> {
    runtime: Runtime<A>,
    dashboard: Dashboard,
}

impl<A: DataApi> App<A> {
    pub fn new(api: A, settings: Settings) -> Self {
        Self {
            runtime: Runtime::new(api),
            dashboard: Dashboard::new(settings),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::AppTerminal) -> Result<()> {
        let size = terminal
            .size()
            .map_err(|err| AppError::Terminal(err.to_string()))?;
        let init = self.dashboard.init(size.width, size.height);
        self.runtime.dispatch(init);
        tracing::info!(width = size.width, height = size.height, "dashboard started");

        loop {
            self.runtime.drain(&mut self.dashboard);
            if self.runtime.should_quit() {
                break;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.dashboard))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.runtime.push(Msg::Key(key));
                    }
                    Event::Resize(width, height) => {
                        self.runtime.push(Msg::Resize { width, height });
                    }
                    _ => {}
                }
            } else {
                tokio::task::yield_now().await;
            }
        }

        tracing::info!("dashboard stopped");
        Ok(())
    }
}
