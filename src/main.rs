use qtrade_connector::core::config::{ExchangeConfig, DEFAULT_ENV_PREFIX};
use qtrade_connector::core::traits::{AccountInfo, MarketDataSource};
use qtrade_connector::exchanges::qtrade::create_qtrade_connector;
use qtrade_connector::Symbol;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Credentials are optional; without them only public data is fetched
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file(DEFAULT_ENV_PREFIX);
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env(DEFAULT_ENV_PREFIX);
    let config = config.unwrap_or_else(|_| ExchangeConfig::read_only());
    let authenticated = config.has_credentials();

    let qtrade = create_qtrade_connector(config)?;

    println!("Fetching markets...");
    let index = qtrade.load_markets(false).await?;
    println!("Found {} markets", index.len());
    for market in index.markets().iter().take(5) {
        println!(
            "Market: {} (id {}, active: {})",
            market.symbol, market.id, market.active
        );
    }

    let symbol: Symbol = "BTC/USDT".parse()?;
    match qtrade.get_ticker(&symbol).await {
        Ok(ticker) => println!(
            "{} last {:?} bid {:?} ask {:?}",
            ticker.symbol, ticker.last, ticker.bid, ticker.ask
        ),
        Err(e) => println!("Error fetching ticker: {}", e),
    }

    if authenticated {
        let balances = qtrade.get_account_balance().await?;
        for (code, balance) in balances.iter().filter(|(_, b)| !b.total.is_zero()) {
            println!("{}: free {} used {}", code, balance.free, balance.used);
        }
    }

    Ok(())
}
