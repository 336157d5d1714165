use chrono::Utc;
use ledgerdash_tui::{
    app::{Settings, runtime::App},
    client::Client,
    config, logging,
    error::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;

    let today = Utc::now().with_timezone(&config.tz()?).date_naive();
    let client = Client::new(&config)?;
    let mut app = App::new(client, Settings::from_config(&config, today));
    app.run().await?;
    Ok(())
}
