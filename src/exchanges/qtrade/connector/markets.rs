use crate::core::currency::CurrencyCodes;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::markets::MarketIndex;
use crate::core::types::{Market, Symbol};
use crate::exchanges::qtrade::converters::convert_market;
use crate::exchanges::qtrade::errors::EXCHANGE_ID;
use crate::exchanges::qtrade::rest::QtradeRest;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Shared market cache.
///
/// Holds the latest `MarketIndex` snapshot. Loading swaps in a fresh
/// snapshot; readers keep whichever `Arc` they already hold.
pub struct MarketCache<R: RestClient> {
    rest: Arc<QtradeRest<R>>,
    codes: CurrencyCodes,
    index: RwLock<Option<Arc<MarketIndex>>>,
}

impl<R: RestClient> std::fmt::Debug for MarketCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketCache")
            .field("codes", &self.codes)
            .finish_non_exhaustive()
    }
}

impl<R: RestClient> MarketCache<R> {
    pub fn new(rest: Arc<QtradeRest<R>>, codes: CurrencyCodes) -> Self {
        Self {
            rest,
            codes,
            index: RwLock::new(None),
        }
    }

    pub fn currency_codes(&self) -> &CurrencyCodes {
        &self.codes
    }

    /// Cached snapshot, fetching the market list when empty or on `reload`
    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    pub async fn load(&self, reload: bool) -> Result<Arc<MarketIndex>, ExchangeError> {
        if !reload {
            if let Some(index) = self.index.read().await.as_ref() {
                return Ok(Arc::clone(index));
            }
        }

        let raw = self.rest.get_markets().await?;
        let markets = raw.parse(|markets| {
            markets
                .iter()
                .map(|market| convert_market(market, &self.codes))
                .collect::<Result<Vec<_>, _>>()
        })?;
        debug!(count = markets.len(), "loaded qtrade markets");

        let index = Arc::new(MarketIndex::new(markets, self.codes.clone()));
        *self.index.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Current snapshot without touching the network; empty before first load
    pub async fn snapshot(&self) -> Arc<MarketIndex> {
        match self.index.read().await.as_ref() {
            Some(index) => Arc::clone(index),
            None => Arc::new(MarketIndex::new(Vec::new(), self.codes.clone())),
        }
    }

    /// Resolve a unified symbol, loading markets on first use
    pub async fn market(&self, symbol: &Symbol) -> Result<(Arc<MarketIndex>, Market), ExchangeError> {
        let index = self.load(false).await?;
        let market = index.by_symbol(symbol).cloned().ok_or_else(|| {
            ExchangeError::InvalidParameters(format!(
                "{} does not have market symbol {}",
                EXCHANGE_ID, symbol
            ))
        })?;
        Ok((index, market))
    }
}
