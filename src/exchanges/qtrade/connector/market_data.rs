use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::markets::MarketIndex;
use crate::core::traits::MarketDataSource;
use crate::core::types::{
    Currency, Kline, KlineInterval, Market, OrderBook, Symbol, Ticker, Trade,
};
use crate::exchanges::qtrade::connector::markets::MarketCache;
use crate::exchanges::qtrade::converters;
use crate::exchanges::qtrade::endpoints::QtradeInterval;
use crate::exchanges::qtrade::errors::EXCHANGE_ID;
use crate::exchanges::qtrade::rest::QtradeRest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// qTrade public market data
#[derive(Debug)]
pub struct MarketData<R: RestClient> {
    rest: Arc<QtradeRest<R>>,
    markets: Arc<MarketCache<R>>,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(rest: Arc<QtradeRest<R>>, markets: Arc<MarketCache<R>>) -> Self {
        Self { rest, markets }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    async fn load_markets(&self, reload: bool) -> Result<Arc<MarketIndex>, ExchangeError> {
        self.markets.load(reload).await
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let index = self.markets.load(true).await?;
        Ok(index.markets().to_vec())
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_currencies(&self) -> Result<HashMap<String, Currency>, ExchangeError> {
        let raw = self.rest.get_currencies().await?;
        raw.parse(|currencies| {
            converters::convert_currencies(currencies, self.markets.currency_codes())
        })
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID, symbol = %symbol))]
    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError> {
        let (index, market) = self.markets.market(symbol).await?;
        let raw = self.rest.get_ticker(&market.id).await?;
        raw.parse(|ticker| converters::convert_ticker(ticker, Some(&market), &index))
    }

    #[instrument(skip(self, symbols), fields(exchange = EXCHANGE_ID))]
    async fn get_tickers(
        &self,
        symbols: Option<&[Symbol]>,
    ) -> Result<HashMap<Symbol, Ticker>, ExchangeError> {
        let index = self.markets.load(false).await?;
        let raw = self.rest.get_tickers().await?;

        raw.parse(|entries| {
            let mut tickers = HashMap::with_capacity(entries.len());
            for entry in entries {
                let ticker = converters::convert_ticker(entry, None, &index)?;
                if symbols.map_or(true, |wanted| wanted.contains(&ticker.symbol)) {
                    tickers.insert(ticker.symbol.clone(), ticker);
                }
            }
            Ok(tickers)
        })
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID, symbol = %symbol))]
    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook, ExchangeError> {
        let (_, market) = self.markets.market(symbol).await?;
        let raw = self.rest.get_order_book(&market.id).await?;
        raw.parse(|book| converters::convert_order_book(book, market.symbol.clone()))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID, symbol = %symbol))]
    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let (index, market) = self.markets.market(symbol).await?;
        let raw = self.rest.get_market_trades(&market.id).await?;
        raw.parse(|trades| converters::convert_trades(trades, Some(&market), &index, since, limit))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID, symbol = %symbol))]
    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Kline>, ExchangeError> {
        let native_interval = interval.to_qtrade_interval()?;
        let (_, market) = self.markets.market(symbol).await?;
        let raw = self.rest.get_ohlcv(&market.id, native_interval).await?;
        Ok(converters::convert_klines(
            &raw.data,
            &market.symbol,
            interval,
            since,
            limit,
        ))
    }
}
