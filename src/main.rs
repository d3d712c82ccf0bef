use listing_notifier::{Dispatcher, ListingRecord, NotifierConfig, NotifierError, ProcessorChain};
use std::io::Read;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn read_listings() -> Result<Vec<ListingRecord>, NotifierError> {
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn run() -> Result<(), NotifierError> {
    let config_path =
        std::env::var("NOTIFIER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = NotifierConfig::load(&config_path)?;
    let dispatcher = Dispatcher::new(&config)?;

    let listings = read_listings()?;
    info!(count = listings.len(), "Announcing listings");

    let chain = ProcessorChain::new().then(dispatcher);
    chain.process(listings);

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("❌ {e}");
        std::process::exit(1);
    }
}
