use crate::core::errors::ExchangeError;
use crate::core::types::KlineInterval;
use reqwest::Method;

/// Whether an endpoint needs a signed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

/// Every qTrade REST endpoint this connector calls.
///
/// Paths are relative to `/v1/` (public) or `/v1/user/` (private). `{name}`
/// segments are filled from request parameters of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Ticker,
    Tickers,
    Currencies,
    Markets,
    MarketTrades,
    OrderBook,
    Ohlcv,
    BalancesAll,
    Orders,
    Order,
    Trades,
    Deposits,
    Deposit,
    Withdraws,
    Withdraw,
    CancelOrder,
    CreateWithdraw,
    DepositAddress,
    SellLimit,
    BuyLimit,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Ticker => "ticker/{market_string}",
            Self::Tickers => "tickers",
            Self::Currencies => "currencies",
            Self::Markets => "markets",
            Self::MarketTrades => "market/{market_string}/trades",
            Self::OrderBook => "orderbook/{market_string}",
            Self::Ohlcv => "market/{market_string}/ohlcv/{interval}",
            Self::BalancesAll => "balances_all",
            Self::Orders => "orders",
            Self::Order => "order/{order_id}",
            Self::Trades => "trades",
            Self::Deposits => "deposits",
            Self::Deposit => "deposit/{deposit_id}",
            Self::Withdraws => "withdraws",
            Self::Withdraw => "withdraw/{withdraw_id}",
            Self::CancelOrder => "cancel_order",
            Self::CreateWithdraw => "withdraw",
            Self::DepositAddress => "deposit_address/{currency}",
            Self::SellLimit => "sell_limit",
            Self::BuyLimit => "buy_limit",
        }
    }

    pub const fn access(self) -> Access {
        match self {
            Self::Ticker
            | Self::Tickers
            | Self::Currencies
            | Self::Markets
            | Self::MarketTrades
            | Self::OrderBook
            | Self::Ohlcv => Access::Public,
            _ => Access::Private,
        }
    }

    pub const fn is_post(self) -> bool {
        matches!(
            self,
            Self::CancelOrder
                | Self::CreateWithdraw
                | Self::DepositAddress
                | Self::SellLimit
                | Self::BuyLimit
        )
    }

    pub fn method(self) -> Method {
        if self.is_post() {
            Method::POST
        } else {
            Method::GET
        }
    }
}

/// qTrade candle interval names
pub trait QtradeInterval {
    fn to_qtrade_interval(self) -> Result<&'static str, ExchangeError>;
}

impl QtradeInterval for KlineInterval {
    fn to_qtrade_interval(self) -> Result<&'static str, ExchangeError> {
        match self {
            Self::Minutes5 => Ok("fivemin"),
            Self::Minutes15 => Ok("fifteenmin"),
            Self::Minutes30 => Ok("thirtymin"),
            Self::Hours1 => Ok("onehour"),
            Self::Hours2 => Ok("twohour"),
            Self::Hours4 => Ok("fourhour"),
            Self::Days1 => Ok("oneday"),
            other => Err(ExchangeError::InvalidParameters(format!(
                "qtrade does not support the {} timeframe",
                other
            ))),
        }
    }
}
