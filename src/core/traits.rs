use crate::core::{
    errors::ExchangeError,
    markets::MarketIndex,
    types::{
        Balances, Currency, DepositAddress, Kline, KlineInterval, Market, Order, OrderBook,
        OrderRequest, Symbol, Ticker, Trade, Transaction, WithdrawRequest,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait MarketDataSource {
    /// Return the cached market index, fetching it first when empty or when
    /// `reload` is set
    async fn load_markets(&self, reload: bool) -> Result<Arc<MarketIndex>, ExchangeError>;

    /// Fetch all markets/trading pairs, refreshing the cache
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    /// Currencies keyed by unified code
    async fn get_currencies(&self) -> Result<HashMap<String, Currency>, ExchangeError>;

    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError>;

    /// All tickers keyed by unified symbol, optionally restricted to `symbols`
    async fn get_tickers(
        &self,
        symbols: Option<&[Symbol]>,
    ) -> Result<HashMap<Symbol, Ticker>, ExchangeError>;

    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook, ExchangeError>;

    /// Recent public trades, oldest first
    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError>;

    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Kline>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError>;

    async fn cancel_order(&self, order_id: &str) -> Result<(), ExchangeError>;

    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError>;

    async fn get_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError>;

    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError>;

    async fn get_closed_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// The account's own fills
    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError>;
}

#[async_trait]
pub trait FundingSource {
    async fn get_deposits(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError>;

    async fn get_deposit(&self, deposit_id: &str) -> Result<Transaction, ExchangeError>;

    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError>;

    async fn get_withdrawal(&self, withdrawal_id: &str) -> Result<Transaction, ExchangeError>;

    /// Deposits followed by withdrawals
    async fn get_transactions(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError>;

    async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, ExchangeError>;

    async fn withdraw(&self, request: WithdrawRequest) -> Result<Transaction, ExchangeError>;
}

#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo + FundingSource {}
