//! Raw qTrade payloads to the canonical model.
//!
//! Conversions never mutate their input. A missing identity field (a market,
//! order or trade id, or a symbol that cannot be resolved) is a `ParseError`;
//! any other missing field becomes `None`. Callers holding the response body
//! attach it with [`Payload::parse`](crate::exchanges::qtrade::rest::Payload::parse).

use crate::core::currency::CurrencyCodes;
use crate::core::errors::ExchangeError;
use crate::core::markets::MarketIndex;
use crate::core::time::{iso8601, micros_to_millis, parse8601};
use crate::core::types::{
    Balance, Balances, Currency, CurrencyLimits, DepositAddress, Fee, Kline, KlineInterval,
    Market, MarketLimits, MarketPrecision, MinMax, Order, OrderBook, OrderBookEntry, OrderSide,
    OrderStatus, OrderType, Symbol, TakerOrMaker, Ticker, Trade, Transaction, TransactionType,
    WithdrawRequest,
};
use crate::exchanges::qtrade::types::{
    de, QtradeBalances, QtradeCurrency, QtradeDepositAddress, QtradeMarket, QtradeOhlcv,
    QtradeOrder, QtradeOrderBook, QtradeTicker, QtradeTrade, QtradeTransfer,
    QtradeWithdrawResult,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Applied when a market omits its fees
pub fn default_maker_fee() -> Decimal {
    Decimal::ZERO
}

pub fn default_taker_fee() -> Decimal {
    Decimal::new(25, 4)
}

fn missing(what: &str) -> ExchangeError {
    ExchangeError::ParseError(format!("missing {}", what))
}

fn unified_symbol(base: &str, quote: &str) -> Result<Symbol, ExchangeError> {
    Symbol::new(base, quote).map_err(|e| ExchangeError::ParseError(e.to_string()))
}

fn mul(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_mul(b?)
}

fn midpoint(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_add(b?)?.checked_div(Decimal::TWO)
}

/// Keep items at or after `since`, then the first `limit` of them.
pub fn filter_by_since_limit<T>(
    items: Vec<T>,
    since: Option<i64>,
    limit: Option<usize>,
    timestamp: impl Fn(&T) -> Option<i64>,
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| since.map_or(true, |since| timestamp(item).is_some_and(|ts| ts >= since)))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

pub fn convert_market(raw: &QtradeMarket, codes: &CurrencyCodes) -> Result<Market, ExchangeError> {
    let id = raw.market_string.clone().ok_or_else(|| missing("market_string"))?;
    let base_id = raw.market_currency.clone().ok_or_else(|| missing("market_currency"))?;
    let quote_id = raw.base_currency.clone().ok_or_else(|| missing("base_currency"))?;
    let symbol = unified_symbol(&codes.canonical(&base_id), &codes.canonical(&quote_id))?;

    Ok(Market {
        id,
        numeric_id: raw.id,
        symbol,
        base_id,
        quote_id,
        active: raw.can_trade.unwrap_or(false) && raw.can_view.unwrap_or(false),
        precision: MarketPrecision {
            amount: raw.market_precision,
            price: raw.base_precision,
        },
        limits: MarketLimits {
            amount: MinMax {
                min: raw.minimum_buy_value,
                max: None,
            },
            ..MarketLimits::default()
        },
        maker: raw.maker_fee.unwrap_or_else(default_maker_fee),
        taker: raw.taker_fee.unwrap_or_else(default_taker_fee),
    })
}

pub fn convert_currency(
    raw: &QtradeCurrency,
    codes: &CurrencyCodes,
) -> Result<Currency, ExchangeError> {
    let id = raw.code.clone().ok_or_else(|| missing("currency code"))?;
    let can_withdraw = raw.can_withdraw.unwrap_or(false);

    Ok(Currency {
        code: codes.canonical(&id),
        id,
        name: raw.long_name.clone(),
        kind: raw.kind.clone(),
        active: can_withdraw && raw.status.as_deref() == Some("ok"),
        deposit: !raw.deposit_disabled.unwrap_or(false),
        withdraw: can_withdraw && !raw.withdraw_disabled.unwrap_or(false),
        delisted: raw.delisted.unwrap_or(false),
        fee: raw.config.as_ref().and_then(|config| config.withdraw_fee),
        precision: raw.precision,
        limits: CurrencyLimits {
            amount: MinMax {
                min: raw.minimum_order,
                max: None,
            },
            withdraw: MinMax::default(),
        },
    })
}

pub fn convert_currencies(
    raws: &[QtradeCurrency],
    codes: &CurrencyCodes,
) -> Result<HashMap<String, Currency>, ExchangeError> {
    raws.iter()
        .map(|raw| convert_currency(raw, codes).map(|c| (c.code.clone(), c)))
        .collect()
}

/// Symbol for a compound id with no cached market.
///
/// Reads the id as `BASE_QUOTE` but emits `QUOTE/BASE`. This reversed order
/// matches what existing consumers of ticker and trade data expect, even
/// though market and order parsing produce `BASE/QUOTE` for the same id.
fn uncached_symbol(market_id: &str, codes: &CurrencyCodes) -> Option<Symbol> {
    let (base_id, quote_id) = market_id.split_once('_')?;
    Symbol::new(codes.canonical(quote_id), codes.canonical(base_id)).ok()
}

/// Resolve the symbol of a ticker or trade.
///
/// A cached id wins, then the uncached fallback, then the caller's market.
fn resolve_symbol<'a>(
    market_id: Option<&str>,
    market: Option<&'a Market>,
    index: &'a MarketIndex,
) -> (Option<Symbol>, Option<&'a Market>) {
    if let Some(id) = market_id {
        if let Some(cached) = index.by_id(id) {
            return (Some(cached.symbol.clone()), Some(cached));
        }
        if let Some(symbol) = uncached_symbol(id, index.currency_codes()) {
            return (Some(symbol), market);
        }
    }
    (market.map(|m| m.symbol.clone()), market)
}

pub fn convert_ticker(
    raw: &QtradeTicker,
    market: Option<&Market>,
    index: &MarketIndex,
) -> Result<Ticker, ExchangeError> {
    let (symbol, _) = resolve_symbol(raw.id_hr.as_deref(), market, index);
    let symbol = symbol.ok_or_else(|| missing("ticker market id"))?;

    let timestamp = raw.last_change.map(micros_to_millis);
    let open = raw.day_open;
    let last = raw.last;

    let hundred = Decimal::ONE_HUNDRED;
    let percentage = raw.day_change.and_then(|c| c.checked_mul(hundred));
    let change = mul(raw.day_change, open);
    let average = raw.day_avg_price.or_else(|| midpoint(last, open));

    let base_volume = raw.day_volume_market;
    let quote_volume = raw.day_volume_base;
    let vwap = match (base_volume, quote_volume) {
        (Some(base), Some(quote)) if base > Decimal::ZERO => quote.checked_div(base),
        _ => None,
    }
    .or(raw.day_avg_price)
    .or_else(|| midpoint(last, open));

    Ok(Ticker {
        symbol,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        high: raw.day_high,
        low: raw.day_low,
        bid: raw.bid,
        ask: raw.ask,
        vwap,
        open,
        close: last,
        last,
        change,
        percentage,
        average,
        base_volume,
        quote_volume,
    })
}

fn convert_book_side(side: &BTreeMap<String, Value>) -> Result<Vec<OrderBookEntry>, ExchangeError> {
    side.iter()
        .map(|(price, amount)| {
            let price = de::decimal_from_value(&Value::String(price.clone()))
                .map_err(ExchangeError::ParseError)?
                .ok_or_else(|| missing("order book price"))?;
            let amount = de::decimal_from_value(amount)
                .map_err(ExchangeError::ParseError)?
                .ok_or_else(|| missing("order book amount"))?;
            Ok(OrderBookEntry { price, amount })
        })
        .collect()
}

/// Sides come back ordered by price string (lexicographic), not by numeric
/// price; sorting is left to the caller.
pub fn convert_order_book(raw: &QtradeOrderBook, symbol: Symbol) -> Result<OrderBook, ExchangeError> {
    let timestamp = raw.last_change.map(micros_to_millis);
    Ok(OrderBook {
        symbol,
        bids: convert_book_side(&raw.buy)?,
        asks: convert_book_side(&raw.sell)?,
        timestamp,
        datetime: timestamp.and_then(iso8601),
    })
}

/// A trade must have an id and a symbol.
fn require_trade_identity(trade: Trade) -> Result<Trade, ExchangeError> {
    if trade.id.is_none() {
        return Err(missing("trade id"));
    }
    if trade.symbol.is_none() {
        return Err(missing("trade market id"));
    }
    Ok(trade)
}

pub fn convert_trade(
    raw: &QtradeTrade,
    market: Option<&Market>,
    index: &MarketIndex,
) -> Result<Trade, ExchangeError> {
    require_trade_identity(build_trade(raw, market, index))
}

fn build_trade(raw: &QtradeTrade, market: Option<&Market>, index: &MarketIndex) -> Trade {
    let (symbol, market) = resolve_symbol(raw.market_id(), market, index);

    let timestamp = raw
        .created_at_ts
        .map(micros_to_millis)
        .or_else(|| raw.created_at.as_deref().and_then(parse8601));
    let price = raw.price;
    let amount = raw.market_amount.or(raw.amount);
    let cost = raw
        .base_volume
        .or(raw.base_amount)
        .or_else(|| mul(price, amount));

    let fee = raw.base_fee.map(|cost| Fee {
        cost,
        currency: market
            .map(|m| m.symbol.quote.clone())
            .or_else(|| symbol.as_ref().map(|s| s.quote.clone())),
    });

    Trade {
        id: raw.id.clone(),
        order_id: raw.order_id.clone(),
        symbol,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        side: raw.side.as_deref().and_then(OrderSide::parse),
        taker_or_maker: raw
            .taker
            .map(|taker| if taker { TakerOrMaker::Taker } else { TakerOrMaker::Maker }),
        price,
        amount,
        cost,
        fee,
    }
}

/// Convert, sort oldest first, then apply `since` and `limit`.
pub fn convert_trades(
    raws: &[QtradeTrade],
    market: Option<&Market>,
    index: &MarketIndex,
    since: Option<i64>,
    limit: Option<usize>,
) -> Result<Vec<Trade>, ExchangeError> {
    let mut trades = raws
        .iter()
        .map(|raw| convert_trade(raw, market, index))
        .collect::<Result<Vec<_>, _>>()?;
    trades.sort_by_key(|trade| trade.timestamp);
    Ok(filter_by_since_limit(trades, since, limit, |t| t.timestamp))
}

pub fn convert_kline(raw: &QtradeOhlcv, symbol: &Symbol, interval: KlineInterval) -> Kline {
    Kline {
        symbol: symbol.clone(),
        open_time: raw.time.as_deref().and_then(parse8601),
        interval,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.market_volume,
        quote_volume: raw.volume,
    }
}

pub fn convert_klines(
    raws: &[QtradeOhlcv],
    symbol: &Symbol,
    interval: KlineInterval,
    since: Option<i64>,
    limit: Option<usize>,
) -> Vec<Kline> {
    let mut klines: Vec<Kline> = raws
        .iter()
        .map(|raw| convert_kline(raw, symbol, interval))
        .collect();
    klines.sort_by_key(|kline| kline.open_time);
    filter_by_since_limit(klines, since, limit, |k| k.open_time)
}

/// Merge available and in-order balances per unified currency code.
pub fn convert_balances(
    raw: &QtradeBalances,
    codes: &CurrencyCodes,
) -> Result<Balances, ExchangeError> {
    let mut sides: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    for entry in &raw.balances {
        let currency = entry.currency.as_deref().ok_or_else(|| missing("balance currency"))?;
        sides.entry(codes.canonical(currency)).or_default().0 =
            entry.balance.unwrap_or_default();
    }
    for entry in &raw.order_balances {
        let currency = entry.currency.as_deref().ok_or_else(|| missing("balance currency"))?;
        sides.entry(codes.canonical(currency)).or_default().1 =
            entry.balance.unwrap_or_default();
    }

    Ok(sides
        .into_iter()
        .map(|(code, (free, used))| (code, Balance::new(free, used)))
        .collect())
}

fn order_side(order_type: Option<&str>) -> Option<OrderSide> {
    match order_type? {
        "buy_limit" => Some(OrderSide::Buy),
        "sell_limit" => Some(OrderSide::Sell),
        _ => None,
    }
}

/// Order symbol: the cached market when known, else the id split on `_`
/// as `BASE/QUOTE`.
fn order_symbol(market_id: &str, index: &MarketIndex) -> Option<Symbol> {
    if let Some(market) = index.by_id(market_id) {
        return Some(market.symbol.clone());
    }
    let codes = index.currency_codes();
    let (base_id, quote_id) = market_id.split_once('_')?;
    Symbol::new(codes.canonical(base_id), codes.canonical(quote_id)).ok()
}

pub fn convert_order(raw: &QtradeOrder, index: &MarketIndex) -> Result<Order, ExchangeError> {
    let id = raw.id.clone().ok_or_else(|| missing("order id"))?;
    let timestamp = raw.created_at.as_deref().and_then(parse8601);
    let side = order_side(raw.order_type.as_deref());
    let market = raw.market_string.as_deref().and_then(|m| index.by_id(m));
    let symbol = raw
        .market_string
        .as_deref()
        .and_then(|m| order_symbol(m, index));

    let trades = raw
        .trades
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|fill| {
            let mut trade = build_trade(fill, market, index);
            trade.side = side;
            if trade.symbol.is_none() {
                trade.symbol = symbol.clone();
            }
            if trade.order_id.is_none() {
                trade.order_id = Some(id.clone());
            }
            require_trade_identity(trade)
        })
        .collect::<Result<Vec<_>, ExchangeError>>()?;

    let amount = raw.market_amount;
    let remaining = raw.market_amount_remaining;
    let filled = amount.zip(remaining).and_then(|(a, r)| a.checked_sub(r));
    let cost = mul(filled, raw.price);

    Ok(Order {
        id,
        symbol,
        timestamp,
        datetime: timestamp
            .and_then(iso8601)
            .or_else(|| raw.created_at.clone()),
        last_trade_timestamp: trades.first().and_then(|t| t.timestamp),
        status: if raw.open == Some(true) {
            OrderStatus::Open
        } else {
            OrderStatus::Closed
        },
        order_type: OrderType::Limit,
        side,
        price: raw.price,
        amount,
        remaining,
        filled,
        cost,
        trades,
    })
}

/// Convert, then keep orders matching `symbol` and `since`, at most `limit`.
pub fn convert_orders(
    raws: &[QtradeOrder],
    index: &MarketIndex,
    symbol: Option<&Symbol>,
    since: Option<i64>,
    limit: Option<usize>,
) -> Result<Vec<Order>, ExchangeError> {
    let orders = raws
        .iter()
        .map(|raw| convert_order(raw, index))
        .filter(|order| match (order, symbol) {
            (Ok(order), Some(symbol)) => order.symbol.as_ref() == Some(symbol),
            _ => true,
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(filter_by_since_limit(orders, since, limit, |o| o.timestamp))
}

/// Split `address:tag`. A bare address has no tag.
pub fn split_address(raw: &str) -> (String, Option<String>) {
    match raw.split_once(':') {
        Some((address, tag)) if !tag.is_empty() => (address.to_string(), Some(tag.to_string())),
        Some((address, _)) => (address.to_string(), None),
        None => (raw.to_string(), None),
    }
}

pub fn convert_transfer(
    raw: &QtradeTransfer,
    kind: TransactionType,
    codes: &CurrencyCodes,
) -> Transaction {
    let timestamp = raw.created_at.as_deref().and_then(parse8601);
    let (address, tag) = raw
        .address
        .as_deref()
        .map_or((None, None), |a| {
            let (address, tag) = split_address(a);
            (Some(address), tag)
        });

    Transaction {
        id: raw.id.clone(),
        txid: raw.network_data.as_ref().and_then(|n| n.txid.clone()),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        address,
        tag,
        kind,
        amount: raw.amount,
        currency: raw.currency.as_deref().map(|c| codes.canonical(c)),
        status: raw.status.clone(),
    }
}

/// Convert every record, then filter by currency, `since` and `limit`.
pub fn convert_transfers(
    raws: &[QtradeTransfer],
    kind: TransactionType,
    codes: &CurrencyCodes,
    currency: Option<&str>,
    since: Option<i64>,
    limit: Option<usize>,
) -> Vec<Transaction> {
    let wanted = currency.map(|c| codes.canonical(c));
    let transfers: Vec<Transaction> = raws
        .iter()
        .map(|raw| convert_transfer(raw, kind, codes))
        .filter(|tx| wanted.is_none() || tx.currency == wanted)
        .collect();
    filter_by_since_limit(transfers, since, limit, |tx| tx.timestamp)
}

pub fn convert_deposit_address(
    raw: &QtradeDepositAddress,
    currency: &str,
    codes: &CurrencyCodes,
) -> Result<DepositAddress, ExchangeError> {
    let full = raw.address.as_deref().ok_or_else(|| missing("deposit address"))?;
    let (address, tag) = split_address(full);
    Ok(DepositAddress {
        currency: codes.canonical(currency),
        address,
        tag,
    })
}

pub fn convert_withdraw_result(
    raw: &QtradeWithdrawResult,
    request: &WithdrawRequest,
    codes: &CurrencyCodes,
) -> Transaction {
    Transaction {
        id: raw.id.clone(),
        txid: None,
        timestamp: None,
        datetime: None,
        address: Some(request.address.clone()),
        tag: request.tag.clone(),
        kind: TransactionType::Withdrawal,
        amount: Some(request.amount),
        currency: Some(codes.canonical(&request.currency)),
        status: raw.result.clone().or_else(|| raw.code.clone()),
    }
}
