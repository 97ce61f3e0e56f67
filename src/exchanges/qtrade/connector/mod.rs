use crate::core::currency::CurrencyCodes;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::markets::MarketIndex;
use crate::core::traits::{
    AccountInfo, ExchangeConnector, FundingSource, MarketDataSource, OrderPlacer,
};
use crate::core::types::{
    Balances, Currency, DepositAddress, Kline, KlineInterval, Market, Order, OrderBook,
    OrderRequest, Symbol, Ticker, Trade, Transaction, WithdrawRequest,
};
use crate::exchanges::qtrade::rest::QtradeRest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub mod account;
pub mod market_data;
pub mod markets;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use markets::MarketCache;
pub use trading::Trading;

/// qTrade connector that composes all sub-trait implementations
///
/// The parts share one REST client and one market cache.
#[derive(Debug)]
pub struct QtradeConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient> QtradeConnector<R> {
    pub fn new(rest: QtradeRest<R>, codes: CurrencyCodes) -> Self {
        let rest = Arc::new(rest);
        let markets = Arc::new(MarketCache::new(Arc::clone(&rest), codes));
        Self {
            market: MarketData::new(Arc::clone(&rest), Arc::clone(&markets)),
            trading: Trading::new(Arc::clone(&rest), Arc::clone(&markets)),
            account: Account::new(rest, markets),
        }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for QtradeConnector<R> {
    async fn load_markets(&self, reload: bool) -> Result<Arc<MarketIndex>, ExchangeError> {
        self.market.load_markets(reload).await
    }

    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.market.get_markets().await
    }

    async fn get_currencies(&self) -> Result<HashMap<String, Currency>, ExchangeError> {
        self.market.get_currencies().await
    }

    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError> {
        self.market.get_ticker(symbol).await
    }

    async fn get_tickers(
        &self,
        symbols: Option<&[Symbol]>,
    ) -> Result<HashMap<Symbol, Ticker>, ExchangeError> {
        self.market.get_tickers(symbols).await
    }

    async fn get_order_book(&self, symbol: &Symbol) -> Result<OrderBook, ExchangeError> {
        self.market.get_order_book(symbol).await
    }

    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_trades(symbol, since, limit).await
    }

    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Kline>, ExchangeError> {
        self.market.get_klines(symbol, interval, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for QtradeConnector<R> {
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        self.trading.place_order(order).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), ExchangeError> {
        self.trading.cancel_order(order_id).await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.trading.get_order(order_id).await
    }

    async fn get_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_orders(symbol, since, limit).await
    }

    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_open_orders(symbol, since, limit).await
    }

    async fn get_closed_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_closed_orders(symbol, since, limit).await
    }

    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.trading.get_my_trades(symbol, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for QtradeConnector<R> {
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError> {
        self.account.get_account_balance().await
    }
}

#[async_trait]
impl<R: RestClient> FundingSource for QtradeConnector<R> {
    async fn get_deposits(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.account.get_deposits(currency, since, limit).await
    }

    async fn get_deposit(&self, deposit_id: &str) -> Result<Transaction, ExchangeError> {
        self.account.get_deposit(deposit_id).await
    }

    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.account.get_withdrawals(currency, since, limit).await
    }

    async fn get_withdrawal(&self, withdrawal_id: &str) -> Result<Transaction, ExchangeError> {
        self.account.get_withdrawal(withdrawal_id).await
    }

    async fn get_transactions(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.account.get_transactions(currency, since, limit).await
    }

    async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, ExchangeError> {
        self.account.get_deposit_address(currency).await
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<Transaction, ExchangeError> {
        self.account.withdraw(request).await
    }
}

impl<R: RestClient> ExchangeConnector for QtradeConnector<R> {}
