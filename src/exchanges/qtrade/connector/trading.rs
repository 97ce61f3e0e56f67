use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::precision::{amount_to_precision, price_to_precision};
use crate::core::traits::OrderPlacer;
use crate::core::types::{Order, OrderRequest, OrderType, Symbol, Trade};
use crate::exchanges::qtrade::connector::markets::MarketCache;
use crate::exchanges::qtrade::converters;
use crate::exchanges::qtrade::errors::EXCHANGE_ID;
use crate::exchanges::qtrade::rest::QtradeRest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// qTrade order entry and order history
#[derive(Debug)]
pub struct Trading<R: RestClient> {
    rest: Arc<QtradeRest<R>>,
    markets: Arc<MarketCache<R>>,
}

impl<R: RestClient> Trading<R> {
    pub fn new(rest: Arc<QtradeRest<R>>, markets: Arc<MarketCache<R>>) -> Self {
        Self { rest, markets }
    }

    /// Order history with an optional open/closed filter
    async fn orders(
        &self,
        open: Option<bool>,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let raw = self.rest.get_orders(open).await?;
        let index = self.markets.snapshot().await;
        raw.parse(|orders| converters::convert_orders(orders, &index, symbol, since, limit))
    }
}

/// qTrade order ids are integers on the wire
fn parse_order_id(order_id: &str) -> Result<i64, ExchangeError> {
    order_id.trim().parse::<i64>().map_err(|_| {
        ExchangeError::InvalidParameters(format!("Invalid {} order id '{}'", EXCHANGE_ID, order_id))
    })
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self, order), fields(exchange = EXCHANGE_ID, symbol = %order.symbol, side = ?order.side))]
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        if order.order_type != OrderType::Limit {
            return Err(ExchangeError::InvalidOrder(format!(
                "{} createOrder() allows limit orders only",
                EXCHANGE_ID
            )));
        }
        let price = order.price.ok_or_else(|| {
            ExchangeError::InvalidOrder(format!("{} limit orders require a price", EXCHANGE_ID))
        })?;

        let (index, market) = self.markets.market(&order.symbol).await?;
        let market_id = market.numeric_id.ok_or_else(|| {
            ExchangeError::InvalidParameters(format!("Market {} has no numeric id", market.id))
        })?;

        let raw = self
            .rest
            .place_limit_order(
                order.side,
                market_id,
                amount_to_precision(&market, order.amount),
                price_to_precision(&market, price),
            )
            .await?;
        raw.parse(|placed| converters::convert_order(placed, &index))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn cancel_order(&self, order_id: &str) -> Result<(), ExchangeError> {
        let id = parse_order_id(order_id)?;
        self.rest.cancel_order(id).await
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        let id = parse_order_id(order_id)?;
        let raw = self.rest.get_order(id).await?;
        let index = self.markets.snapshot().await;
        raw.parse(|order| converters::convert_order(order, &index))
    }

    async fn get_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.orders(None, symbol, since, limit).await
    }

    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.orders(Some(true), symbol, since, limit).await
    }

    async fn get_closed_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.orders(Some(false), symbol, since, limit).await
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let (index, market) = match symbol {
            Some(symbol) => {
                let (index, market) = self.markets.market(symbol).await?;
                (index, Some(market))
            }
            None => (self.markets.load(false).await?, None),
        };

        let raw = self.rest.get_my_trades().await?;
        let mut trades = raw
            .parse(|trades| converters::convert_trades(trades, market.as_ref(), &index, since, None))?;
        if let Some(symbol) = symbol {
            trades.retain(|trade| trade.symbol.as_ref() == Some(symbol));
        }
        trades.truncate(limit.unwrap_or(usize::MAX));
        Ok(trades)
    }
}
