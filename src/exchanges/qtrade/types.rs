use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// Lenient field decoders. qTrade sends decimals as strings, sometimes as
/// bare numbers, and occasionally as empty strings; ids come as either
/// numbers or strings.
pub mod de {
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    fn parse_decimal(text: &str) -> Result<Decimal, String> {
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| format!("invalid decimal '{}': {}", text, e))
    }

    /// Decimal from a JSON string or number. Null and blank strings are `None`.
    pub fn decimal_from_value(value: &Value) -> Result<Option<Decimal>, String> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_decimal(s.trim()).map(Some),
            Value::Number(n) => parse_decimal(&n.to_string()).map(Some),
            other => Err(format!("expected decimal, got {}", other)),
        }
    }

    pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value(&value).map_err(D::Error::custom)
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(D::Error::custom(format!("expected id, got {}", other))),
        }
    }

    pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("integer out of range: {}", n))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid integer '{}': {}", s, e))),
            other => Err(D::Error::custom(format!("expected integer, got {}", other))),
        }
    }

    /// Decimal place counts: integer or numeric string, never negative
    pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_i64(deserializer)?
            .map(|n| {
                u32::try_from(n)
                    .map_err(|_| D::Error::custom(format!("precision out of range: {}", n)))
            })
            .transpose()
    }

    pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            Value::String(s) => match s.as_str() {
                "true" => Ok(Some(true)),
                "false" | "" => Ok(Some(false)),
                other => Err(D::Error::custom(format!("expected boolean, got '{}'", other))),
            },
            Value::Number(n) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
            other => Err(D::Error::custom(format!("expected boolean, got {}", other))),
        }
    }
}

/// `data.markets` of `GET /v1/markets`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeMarket {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    /// Base currency in unified terms (qTrade calls it the market currency)
    #[serde(default)]
    pub market_currency: Option<String>,
    /// Quote currency in unified terms
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub maker_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub taker_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub can_trade: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub can_view: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub can_cancel: Option<bool>,
    #[serde(default)]
    pub market_string: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub minimum_sell_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub minimum_buy_value: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub market_precision: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub base_precision: Option<u32>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeCurrencyConfig {
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub withdraw_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub price: Option<Decimal>,
}

/// `data.currencies` of `GET /v1/currencies`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeCurrency {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub precision: Option<u32>,
    #[serde(default)]
    pub config: Option<QtradeCurrencyConfig>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub minimum_order: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub can_withdraw: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub delisted: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub deposit_disabled: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub withdraw_disabled: Option<bool>,
}

/// `GET /v1/ticker/{market}` data, and each entry of `GET /v1/tickers`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeTicker {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    /// Human readable market id, e.g. `LTC_BTC`
    #[serde(default)]
    pub id_hr: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub ask: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub bid: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_avg_price: Option<Decimal>,
    /// Fractional change, -0.02 means -2%
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_change: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_high: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_low: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_open: Option<Decimal>,
    /// Volume in the quote currency
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_volume_base: Option<Decimal>,
    /// Volume in the base currency
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub day_volume_market: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub last: Option<Decimal>,
    /// Microseconds
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub last_change: Option<i64>,
}

/// `GET /v1/orderbook/{market}` data: price string -> amount
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeOrderBook {
    #[serde(default)]
    pub buy: BTreeMap<String, Value>,
    #[serde(default)]
    pub sell: BTreeMap<String, Value>,
    /// Microseconds
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub last_change: Option<i64>,
}

/// Public trade, private fill, or a fill nested inside an order
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeTrade {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub market_string: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub market_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub base_volume: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub base_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub base_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub taker: Option<bool>,
    /// Microseconds
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub created_at_ts: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl QtradeTrade {
    /// Market id from whichever key the payload used
    pub fn market_id(&self) -> Option<&str> {
        self.market_string.as_deref().or(self.symbol.as_deref())
    }
}

/// One candle of `GET /v1/market/{market}/ohlcv/{interval}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeOhlcv {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub high: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub low: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub close: Option<Decimal>,
    /// Quote-currency volume
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub volume: Option<Decimal>,
    /// Base-currency volume
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub market_volume: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeBalanceEntry {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub balance: Option<Decimal>,
}

/// `GET /v1/user/balances_all` data
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeBalances {
    #[serde(default)]
    pub balances: Vec<QtradeBalanceEntry>,
    #[serde(default)]
    pub order_balances: Vec<QtradeBalanceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeOrder {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub open: Option<bool>,
    /// `buy_limit` or `sell_limit`
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub market_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub market_amount_remaining: Option<Decimal>,
    #[serde(default)]
    pub market_string: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub market_id: Option<i64>,
    #[serde(default)]
    pub trades: Option<Vec<QtradeTrade>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeNetworkData {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub txid: Option<String>,
}

/// Deposit or withdrawal record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeTransfer {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    /// `address` or `address:tag`
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub network_data: Option<QtradeNetworkData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeDepositAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub currency_status: Option<String>,
}

/// `POST /v1/user/withdraw` data
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QtradeWithdrawResult {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

// Envelopes found under the top-level `data` key.

#[derive(Debug, Default, Deserialize)]
pub struct MarketsData {
    #[serde(default)]
    pub markets: Vec<QtradeMarket>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrenciesData {
    #[serde(default)]
    pub currencies: Vec<QtradeCurrency>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickersData {
    #[serde(default)]
    pub markets: Vec<QtradeTicker>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TradesData {
    #[serde(default)]
    pub trades: Vec<QtradeTrade>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlicesData {
    #[serde(default)]
    pub slices: Vec<QtradeOhlcv>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrdersData {
    #[serde(default)]
    pub orders: Vec<QtradeOrder>,
}

#[derive(Debug, Deserialize)]
pub struct OrderData {
    pub order: QtradeOrder,
}

#[derive(Debug, Default, Deserialize)]
pub struct DepositsData {
    #[serde(default)]
    pub deposits: Vec<QtradeTransfer>,
}

#[derive(Debug, Deserialize)]
pub struct DepositData {
    pub deposit: QtradeTransfer,
}

#[derive(Debug, Default, Deserialize)]
pub struct WithdrawsData {
    #[serde(default)]
    pub withdraws: Vec<QtradeTransfer>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawData {
    pub withdraw: QtradeTransfer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn decimals_accept_strings_numbers_and_blanks() {
        let ticker: QtradeTicker = serde_json::from_value(json!({
            "ask": "0.02",
            "bid": 0.01,
            "last": "",
            "day_change": null,
            "last_change": "1576115400123456"
        }))
        .unwrap();

        assert_eq!(ticker.ask, Some(dec!(0.02)));
        assert_eq!(ticker.bid, Some(dec!(0.01)));
        assert_eq!(ticker.last, None);
        assert_eq!(ticker.day_change, None);
        assert_eq!(ticker.day_high, None);
        assert_eq!(ticker.last_change, Some(1_576_115_400_123_456));
    }

    #[test]
    fn ids_accept_numbers_or_strings() {
        let trade: QtradeTrade =
            serde_json::from_value(json!({"id": 101, "order_id": "77"})).unwrap();
        assert_eq!(trade.id.as_deref(), Some("101"));
        assert_eq!(trade.order_id.as_deref(), Some("77"));
    }

    #[test]
    fn precision_accepts_numbers_and_strings() {
        let market: QtradeMarket = serde_json::from_value(json!({
            "market_precision": "8",
            "base_precision": 6
        }))
        .unwrap();
        assert_eq!(market.market_precision, Some(8));
        assert_eq!(market.base_precision, Some(6));

        let currency: QtradeCurrency =
            serde_json::from_value(json!({"code": "BTC", "precision": "8"})).unwrap();
        assert_eq!(currency.precision, Some(8));

        let negative: Result<QtradeMarket, _> =
            serde_json::from_value(json!({"market_precision": -1}));
        assert!(negative.is_err());
    }

    #[test]
    fn garbage_decimal_is_an_error() {
        let result: Result<QtradeTicker, _> = serde_json::from_value(json!({"ask": "abc"}));
        assert!(result.is_err());
    }

    #[test]
    fn scientific_notation_is_accepted() {
        assert_eq!(
            de::decimal_from_value(&json!("1e-7")).unwrap(),
            Some(dec!(0.0000001))
        );
    }
}
