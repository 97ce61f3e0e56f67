use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::OrderSide;
use crate::exchanges::qtrade::endpoints::Endpoint;
use crate::exchanges::qtrade::errors::{interpret_response, EXCHANGE_ID};
use crate::exchanges::qtrade::request::{Params, RequestBuilder};
use crate::exchanges::qtrade::types::{
    CurrenciesData, DepositData, DepositsData, MarketsData, OrderData, OrdersData, QtradeBalances,
    QtradeCurrency, QtradeDepositAddress, QtradeMarket, QtradeOhlcv, QtradeOrder,
    QtradeOrderBook, QtradeTicker, QtradeTrade, QtradeTransfer, QtradeWithdrawResult,
    SlicesData, TickersData, TradesData, WithdrawData, WithdrawsData,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Attach the raw response body to a parse failure.
///
/// Other error kinds already carry their context and pass through unchanged.
pub fn with_body(error: ExchangeError, body: &str) -> ExchangeError {
    match error {
        ExchangeError::ParseError(what) => {
            ExchangeError::ParseError(format!("{} {}: {}", EXCHANGE_ID, what, body))
        }
        other => other,
    }
}

/// Decoded response data together with the body text it came from
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub data: T,
    pub body: String,
}

impl<T> Payload<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Payload<U> {
        Payload {
            data: f(self.data),
            body: self.body,
        }
    }

    /// Run a converter over the data; parse failures carry the body
    pub fn parse<U>(
        &self,
        convert: impl FnOnce(&T) -> Result<U, ExchangeError>,
    ) -> Result<U, ExchangeError> {
        convert(&self.data).map_err(|e| with_body(e, &self.body))
    }
}

/// qTrade REST API client
///
/// One typed method per endpoint. Each call builds and signs the request,
/// hands it to the transport, classifies the response, and decodes `data`.
#[derive(Debug)]
pub struct QtradeRest<R: RestClient> {
    client: R,
    requests: RequestBuilder,
}

impl<R: RestClient> QtradeRest<R> {
    pub fn new(client: R, requests: RequestBuilder) -> Self {
        Self { client, requests }
    }

    pub fn has_credentials(&self) -> bool {
        self.requests.has_signer()
    }

    /// Send one endpoint call and return the classified JSON payload
    #[instrument(skip(self, params), fields(exchange = EXCHANGE_ID, endpoint = endpoint.path()))]
    pub async fn call(
        &self,
        endpoint: Endpoint,
        params: Params,
    ) -> Result<Payload<Value>, ExchangeError> {
        let request = self.requests.build(endpoint, params)?;
        debug!(method = %request.method, url = %request.url, "qtrade request");

        let response = self.client.send(request).await?;
        let data = interpret_response(&response)?;
        Ok(Payload {
            data,
            body: response.body,
        })
    }

    /// Call an endpoint and decode its `data` member
    async fn data<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: Params,
    ) -> Result<Payload<T>, ExchangeError> {
        let Payload { data: payload, body } = self.call(endpoint, params).await?;
        let data = match payload {
            Value::Object(mut envelope) => envelope.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        let data = if data.is_null() {
            Value::Object(Map::new())
        } else {
            data
        };

        match serde_json::from_value(data) {
            Ok(data) => Ok(Payload { data, body }),
            Err(e) => Err(with_body(
                ExchangeError::ParseError(format!(
                    "unexpected payload for '{}' ({})",
                    endpoint.path(),
                    e
                )),
                &body,
            )),
        }
    }

    pub async fn get_markets(&self) -> Result<Payload<Vec<QtradeMarket>>, ExchangeError> {
        let payload = self.data::<MarketsData>(Endpoint::Markets, Params::new()).await?;
        Ok(payload.map(|data| data.markets))
    }

    pub async fn get_currencies(&self) -> Result<Payload<Vec<QtradeCurrency>>, ExchangeError> {
        let payload = self
            .data::<CurrenciesData>(Endpoint::Currencies, Params::new())
            .await?;
        Ok(payload.map(|data| data.currencies))
    }

    pub async fn get_ticker(&self, market_id: &str) -> Result<Payload<QtradeTicker>, ExchangeError> {
        self.data(Endpoint::Ticker, params([("market_string", market_id.into())]))
            .await
    }

    pub async fn get_tickers(&self) -> Result<Payload<Vec<QtradeTicker>>, ExchangeError> {
        let payload = self.data::<TickersData>(Endpoint::Tickers, Params::new()).await?;
        Ok(payload.map(|data| data.markets))
    }

    pub async fn get_order_book(
        &self,
        market_id: &str,
    ) -> Result<Payload<QtradeOrderBook>, ExchangeError> {
        self.data(Endpoint::OrderBook, params([("market_string", market_id.into())]))
            .await
    }

    pub async fn get_market_trades(
        &self,
        market_id: &str,
    ) -> Result<Payload<Vec<QtradeTrade>>, ExchangeError> {
        let payload = self
            .data::<TradesData>(Endpoint::MarketTrades, params([("market_string", market_id.into())]))
            .await?;
        Ok(payload.map(|data| data.trades))
    }

    pub async fn get_ohlcv(
        &self,
        market_id: &str,
        interval: &str,
    ) -> Result<Payload<Vec<QtradeOhlcv>>, ExchangeError> {
        let payload = self
            .data::<SlicesData>(
                Endpoint::Ohlcv,
                params([
                    ("market_string", market_id.into()),
                    ("interval", interval.into()),
                ]),
            )
            .await?;
        Ok(payload.map(|data| data.slices))
    }

    pub async fn get_balances(&self) -> Result<Payload<QtradeBalances>, ExchangeError> {
        self.data(Endpoint::BalancesAll, Params::new()).await
    }

    /// `amount` and `price` must already be quantized to market precision
    pub async fn place_limit_order(
        &self,
        side: OrderSide,
        market_id: i64,
        amount: String,
        price: String,
    ) -> Result<Payload<QtradeOrder>, ExchangeError> {
        let endpoint = match side {
            OrderSide::Buy => Endpoint::BuyLimit,
            OrderSide::Sell => Endpoint::SellLimit,
        };
        let payload = self
            .data::<OrderData>(
                endpoint,
                params([
                    ("amount", amount.into()),
                    ("market_id", market_id.into()),
                    ("price", price.into()),
                ]),
            )
            .await?;
        Ok(payload.map(|data| data.order))
    }

    /// A successful cancel returns an empty body
    pub async fn cancel_order(&self, order_id: i64) -> Result<(), ExchangeError> {
        self.call(Endpoint::CancelOrder, params([("id", order_id.into())]))
            .await
            .map(|_| ())
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Payload<QtradeOrder>, ExchangeError> {
        let payload = self
            .data::<OrderData>(Endpoint::Order, params([("order_id", order_id.into())]))
            .await?;
        Ok(payload.map(|data| data.order))
    }

    /// All orders, or only open / closed ones
    pub async fn get_orders(
        &self,
        open: Option<bool>,
    ) -> Result<Payload<Vec<QtradeOrder>>, ExchangeError> {
        let query = match open {
            Some(open) => params([("open", open.into())]),
            None => Params::new(),
        };
        let payload = self.data::<OrdersData>(Endpoint::Orders, query).await?;
        Ok(payload.map(|data| data.orders))
    }

    pub async fn get_my_trades(&self) -> Result<Payload<Vec<QtradeTrade>>, ExchangeError> {
        let payload = self.data::<TradesData>(Endpoint::Trades, Params::new()).await?;
        Ok(payload.map(|data| data.trades))
    }

    pub async fn get_deposits(&self) -> Result<Payload<Vec<QtradeTransfer>>, ExchangeError> {
        let payload = self.data::<DepositsData>(Endpoint::Deposits, Params::new()).await?;
        Ok(payload.map(|data| data.deposits))
    }

    pub async fn get_deposit(
        &self,
        deposit_id: &str,
    ) -> Result<Payload<QtradeTransfer>, ExchangeError> {
        let payload = self
            .data::<DepositData>(Endpoint::Deposit, params([("deposit_id", deposit_id.into())]))
            .await?;
        Ok(payload.map(|data| data.deposit))
    }

    pub async fn get_withdraws(&self) -> Result<Payload<Vec<QtradeTransfer>>, ExchangeError> {
        let payload = self.data::<WithdrawsData>(Endpoint::Withdraws, Params::new()).await?;
        Ok(payload.map(|data| data.withdraws))
    }

    pub async fn get_withdraw(
        &self,
        withdraw_id: &str,
    ) -> Result<Payload<QtradeTransfer>, ExchangeError> {
        let payload = self
            .data::<WithdrawData>(Endpoint::Withdraw, params([("withdraw_id", withdraw_id.into())]))
            .await?;
        Ok(payload.map(|data| data.withdraw))
    }

    /// `address` already carries any `:tag` suffix
    pub async fn withdraw(
        &self,
        currency: &str,
        amount: String,
        address: String,
    ) -> Result<Payload<QtradeWithdrawResult>, ExchangeError> {
        self.data(
            Endpoint::CreateWithdraw,
            params([
                ("address", address.into()),
                ("amount", amount.into()),
                ("currency", currency.into()),
            ]),
        )
        .await
    }

    pub async fn create_deposit_address(
        &self,
        currency: &str,
    ) -> Result<Payload<QtradeDepositAddress>, ExchangeError> {
        self.data(Endpoint::DepositAddress, params([("currency", currency.into())]))
            .await
    }
}
