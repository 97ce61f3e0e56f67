use async_trait::async_trait;
use qtrade_connector::core::errors::ExchangeError;
use qtrade_connector::core::kernel::{RawResponse, RestClient, SignedRequest};
use qtrade_connector::core::traits::{
    AccountInfo, FundingSource, MarketDataSource, OrderPlacer,
};
use qtrade_connector::exchanges::qtrade::{QtradeBuilder, QtradeConnector};
use qtrade_connector::{
    KlineInterval, OrderBookEntry, OrderRequest, OrderSide, OrderStatus, OrderType, Symbol,
    TransactionType, WithdrawRequest,
};
use reqwest::Method;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Transport fake: answers by URL fragment and records every request
#[derive(Clone, Default)]
struct MockRest {
    routes: Arc<Mutex<Vec<(String, RawResponse)>>>,
    sent: Arc<Mutex<Vec<SignedRequest>>>,
}

impl MockRest {
    fn route(self, fragment: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((fragment.to_string(), RawResponse::new(status, body)));
        self
    }

    fn sent(&self) -> Vec<SignedRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, ExchangeError> {
        let response = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| RawResponse::new(404, ""));
        self.sent.lock().unwrap().push(request);
        Ok(response)
    }
}

fn markets_body() -> String {
    json!({
        "data": {
            "markets": [
                {
                    "id": 1,
                    "market_currency": "LTC",
                    "base_currency": "BTC",
                    "maker_fee": "0",
                    "taker_fee": "0.005",
                    "can_trade": true,
                    "can_view": true,
                    "can_cancel": true,
                    "market_string": "LTC_BTC",
                    "minimum_sell_amount": "0.0001",
                    "minimum_buy_value": "0.0001",
                    "market_precision": 8,
                    "base_precision": 8
                },
                {
                    "id": 36,
                    "market_currency": "XBT",
                    "base_currency": "USDT",
                    "taker_fee": "",
                    "can_trade": true,
                    "can_view": false,
                    "market_string": "XBT_USDT",
                    "market_precision": 4,
                    "base_precision": 2
                }
            ]
        }
    })
    .to_string()
}

fn ltc_btc() -> Symbol {
    Symbol::new("LTC", "BTC").unwrap()
}

fn public_connector(mock: &MockRest) -> QtradeConnector<MockRest> {
    QtradeBuilder::new().build_with_transport(mock.clone())
}

fn private_connector(mock: &MockRest) -> QtradeConnector<MockRest> {
    QtradeBuilder::new()
        .with_credentials("256".to_string(), "secret".to_string())
        .build_with_transport(mock.clone())
}

fn body_json(request: &SignedRequest) -> Value {
    serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
}

#[tokio::test]
async fn markets_load_once_and_resolve_tickers() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/ticker/LTC_BTC",
            200,
            json!({
                "data": {
                    "ask": "0.02249",
                    "bid": "0.0191154",
                    "day_avg_price": "0.0197664",
                    "day_change": "0.0263",
                    "day_high": "0.02249",
                    "day_low": "0.0190108",
                    "day_open": "0.02",
                    "day_volume_base": "0.0097",
                    "day_volume_market": "0.5",
                    "id": 1,
                    "id_hr": "LTC_BTC",
                    "last": "0.0191154",
                    "last_change": 1_588_533_365_354_609_i64
                }
            })
            .to_string(),
        );
    let qtrade = public_connector(&mock);

    let index = qtrade.load_markets(false).await.unwrap();
    assert_eq!(index.len(), 2);
    let btc = index.by_id("XBT_USDT").unwrap();
    assert_eq!(btc.symbol, Symbol::new("BTC", "USDT").unwrap());
    assert!(!btc.active);
    assert_eq!(btc.taker, dec!(0.0025));

    let ticker = qtrade.get_ticker(&ltc_btc()).await.unwrap();
    assert_eq!(ticker.symbol, ltc_btc());
    assert_eq!(ticker.timestamp, Some(1_588_533_365_354));
    assert_eq!(ticker.percentage, Some(dec!(2.63)));
    assert_eq!(ticker.vwap, Some(dec!(0.0194)));

    qtrade.get_ticker(&ltc_btc()).await.unwrap();

    let sent = mock.sent();
    assert_eq!(sent.len(), 3, "markets are fetched once");
    assert_eq!(sent[0].url, "https://api.qtrade.io/v1/markets");
    assert_eq!(sent[0].method, Method::GET);
    assert!(sent[1].headers.is_empty(), "public calls are unsigned");
}

#[tokio::test]
async fn concurrent_readers_share_the_market_snapshot() {
    let mock = MockRest::default().route("/v1/markets", 200, markets_body());
    let qtrade = public_connector(&mock);
    qtrade.load_markets(false).await.unwrap();

    let loads = futures::future::join_all((0..4).map(|_| qtrade.load_markets(false))).await;
    for index in loads {
        assert_eq!(index.unwrap().len(), 2);
    }
    assert_eq!(mock.sent().len(), 1);

    qtrade.load_markets(true).await.unwrap();
    assert_eq!(mock.sent().len(), 2);
}

#[tokio::test]
async fn unknown_symbol_is_rejected() {
    let mock = MockRest::default().route("/v1/markets", 200, markets_body());
    let qtrade = public_connector(&mock);

    let result = qtrade.get_order_book(&Symbol::new("DOGE", "BTC").unwrap()).await;
    assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
}

#[tokio::test]
async fn market_orders_fail_before_any_request() {
    let mock = MockRest::default();
    let qtrade = private_connector(&mock);

    let order = OrderRequest {
        symbol: ltc_btc(),
        side: OrderSide::Buy,
        order_type: OrderType::Market,
        amount: dec!(1),
        price: None,
    };
    let result = qtrade.place_order(order).await;

    assert!(matches!(result, Err(ExchangeError::InvalidOrder(_))));
    assert!(mock.sent().is_empty());
}

#[tokio::test]
async fn limit_order_is_quantized_and_signed() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/user/sell_limit",
            200,
            json!({
                "data": {
                    "order": {
                        "created_at": "2018-04-06T20:46:52.899248Z",
                        "id": 13253,
                        "market_amount": "1.12345678",
                        "market_amount_remaining": "1.12345678",
                        "market_id": 1,
                        "open": true,
                        "order_type": "sell_limit",
                        "price": "0.01234568",
                        "trades": null
                    }
                }
            })
            .to_string(),
        );
    let qtrade = private_connector(&mock);

    let request = OrderRequest::limit(
        ltc_btc(),
        OrderSide::Sell,
        dec!(1.123456789),
        dec!(0.012345675),
    );
    let order = qtrade.place_order(request).await.unwrap();

    assert_eq!(order.id, "13253");
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.side, Some(OrderSide::Sell));
    assert_eq!(order.filled, Some(dec!(0)));

    let sent = mock.sent();
    let place = &sent[1];
    assert_eq!(place.method, Method::POST);
    assert_eq!(place.url, "https://api.qtrade.io/v1/user/sell_limit");
    assert_eq!(
        body_json(place),
        json!({"amount": "1.12345678", "market_id": 1, "price": "0.01234568"})
    );
    let auth = place.headers.get("Authorization").unwrap();
    assert!(auth.starts_with("HMAC-SHA256 256:"));
    assert!(place.headers.contains_key("HMAC-Timestamp"));
}

#[tokio::test]
async fn insufficient_funds_is_typed() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/user/buy_limit",
            400,
            r#"{"errors":[{"code":"insuff_funds","title":"Your available balance is too low for that action"}]}"#,
        );
    let qtrade = private_connector(&mock);

    let request = OrderRequest::limit(ltc_btc(), OrderSide::Buy, dec!(10), dec!(0.02));
    let result = qtrade.place_order(request).await;

    match result {
        Err(ref error @ ExchangeError::InsufficientFunds(ref message)) => {
            assert!(error.is_exchange_error());
            assert!(message.starts_with("qtrade "));
            assert!(message.contains("insuff_funds"));
        }
        other => panic!("expected InsufficientFunds, got {:?}", other),
    }
}

#[tokio::test]
async fn bad_credentials_are_typed() {
    let mock = MockRest::default().route(
        "/v1/user/balances_all",
        401,
        r#"{"errors":[{"code":"invalid_auth","title":"Invalid HMAC signature"}]}"#,
    );
    let qtrade = private_connector(&mock);

    let result = qtrade.get_account_balance().await;
    assert!(matches!(result, Err(ExchangeError::AuthenticationFailure(_))));
}

#[tokio::test]
async fn private_calls_need_credentials() {
    let mock = MockRest::default();
    let qtrade = public_connector(&mock);

    let result = qtrade.get_account_balance().await;
    let error = result.unwrap_err();
    assert!(matches!(error, ExchangeError::AuthError(_)));
    assert!(!error.is_exchange_error());
    assert!(mock.sent().is_empty());
}

#[tokio::test]
async fn cancel_accepts_empty_body() {
    let mock = MockRest::default().route("/v1/user/cancel_order", 200, "");
    let qtrade = private_connector(&mock);

    qtrade.cancel_order("8932314").await.unwrap();

    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(body_json(&sent[0]), json!({"id": 8_932_314}));
}

#[tokio::test]
async fn unsupported_interval_fails_locally() {
    let mock = MockRest::default().route("/v1/markets", 200, markets_body());
    let qtrade = public_connector(&mock);

    let result = qtrade
        .get_klines(&ltc_btc(), KlineInterval::Minutes3, None, None)
        .await;

    assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
    assert!(mock.sent().is_empty());
}

#[tokio::test]
async fn klines_use_native_interval() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/market/LTC_BTC/ohlcv/fivemin",
            200,
            json!({
                "data": {
                    "slices": [
                        {"time": "2019-12-07T22:20:00Z", "open": "0.0076", "high": "0.0077",
                         "low": "0.0075", "close": "0.0076", "volume": "0.1", "market_volume": "13"},
                        {"time": "2019-12-07T22:15:00Z", "open": "0.0075", "high": "0.0076",
                         "low": "0.0074", "close": "0.0076", "volume": "0.2", "market_volume": "26"}
                    ]
                }
            })
            .to_string(),
        );
    let qtrade = public_connector(&mock);

    let klines = qtrade
        .get_klines(&ltc_btc(), KlineInterval::Minutes5, None, Some(1))
        .await
        .unwrap();

    assert_eq!(klines.len(), 1);
    assert_eq!(klines[0].open_time, Some(1_575_756_900_000));
    assert_eq!(klines[0].volume, Some(dec!(26)));
}

#[tokio::test]
async fn deposit_address_splits_tag() {
    let mock = MockRest::default().route(
        "/v1/user/deposit_address/XLM",
        200,
        r#"{"data":{"address":"GCUG7:1f2e3d","currency_status":"ok"}}"#,
    );
    let qtrade = private_connector(&mock);

    let address = qtrade.get_deposit_address("XLM").await.unwrap();

    assert_eq!(address.currency, "XLM");
    assert_eq!(address.address, "GCUG7");
    assert_eq!(address.tag.as_deref(), Some("1f2e3d"));
    assert_eq!(mock.sent()[0].method, Method::POST);
}

#[tokio::test]
async fn withdraw_joins_tag_into_address() {
    let mock = MockRest::default().route(
        "/v1/user/withdraw",
        200,
        r#"{"data":{"code":"initiated","id":3,"result":"Withdraw initiated. Please allow 3-5 minutes for our system to process."}}"#,
    );
    let qtrade = private_connector(&mock);

    let tx = qtrade
        .withdraw(WithdrawRequest {
            currency: "XLM".to_string(),
            amount: dec!(25.000),
            address: "GCUG7".to_string(),
            tag: Some("memo".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(tx.id.as_deref(), Some("3"));
    assert_eq!(tx.tag.as_deref(), Some("memo"));
    assert_eq!(
        body_json(&mock.sent()[0]),
        json!({"address": "GCUG7:memo", "amount": "25", "currency": "XLM"})
    );
}

#[tokio::test]
async fn transactions_list_deposits_then_withdrawals() {
    let mock = MockRest::default()
        .route(
            "/v1/user/deposits",
            200,
            json!({"data": {"deposits": [
                {"id": "d1", "amount": "1", "currency": "BTC", "status": "credited",
                 "address": "bc1q", "created_at": "2019-01-01T00:00:00Z"},
                {"id": "d2", "amount": "5", "currency": "LTC", "status": "credited",
                 "address": "ltc1", "created_at": "2019-01-02T00:00:00Z"}
            ]}})
            .to_string(),
        )
        .route(
            "/v1/user/withdraws",
            200,
            json!({"data": {"withdraws": [
                {"id": 9, "amount": "0.5", "currency": "BTC", "status": "sent",
                 "address": "bc1x", "created_at": "2019-01-03T00:00:00Z",
                 "network_data": {"txid": "abc"}}
            ]}})
            .to_string(),
        );
    let qtrade = private_connector(&mock);

    let txs = qtrade.get_transactions(Some("BTC"), None, None).await.unwrap();

    let ids: Vec<_> = txs.iter().map(|tx| tx.id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["d1", "9"]);
    assert_eq!(txs[1].txid.as_deref(), Some("abc"));
}

#[tokio::test]
async fn tickers_are_filtered_by_symbol() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/tickers",
            200,
            json!({"data": {"markets": [
                {"id": 1, "id_hr": "LTC_BTC", "last": "0.019"},
                {"id": 36, "id_hr": "XBT_USDT", "last": "7000"}
            ]}})
            .to_string(),
        );
    let qtrade = public_connector(&mock);

    let all = qtrade.get_tickers(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains_key(&Symbol::new("BTC", "USDT").unwrap()));

    let wanted = [ltc_btc()];
    let some = qtrade.get_tickers(Some(&wanted)).await.unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[&ltc_btc()].last, Some(dec!(0.019)));
}

#[tokio::test]
async fn open_orders_query_and_symbol_filter() {
    let mock = MockRest::default().route(
        "/v1/user/orders",
        200,
        json!({"data": {"orders": [
            {"id": 1, "market_string": "LTC_BTC", "open": true, "order_type": "buy_limit",
             "price": "0.01", "market_amount": "2", "market_amount_remaining": "1",
             "created_at": "2019-01-01T00:00:00Z"},
            {"id": 2, "market_string": "XBT_USDT", "open": true, "order_type": "sell_limit",
             "price": "7000", "market_amount": "1", "market_amount_remaining": "1",
             "created_at": "2019-01-02T00:00:00Z"}
        ]}})
        .to_string(),
    );
    let qtrade = private_connector(&mock);

    let orders = qtrade.get_open_orders(Some(&ltc_btc()), None, None).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].filled, Some(dec!(1)));
    assert_eq!(orders[0].cost, Some(dec!(0.01)));
    assert_eq!(mock.sent()[0].url, "https://api.qtrade.io/v1/user/orders?open=true");
}

#[tokio::test]
async fn my_trades_filter_by_symbol_before_limit() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/user/trades",
            200,
            json!({"data": {"trades": [
                {"id": 3, "order_id": 30, "market_string": "LTC_BTC", "side": "sell",
                 "price": "0.02", "market_amount": "1", "base_volume": "0.02",
                 "base_fee": "0.0001", "taker": true, "created_at_ts": 3_000_000},
                {"id": 1, "order_id": 10, "market_string": "XBT_USDT", "side": "buy",
                 "price": "7000", "market_amount": "0.1", "created_at_ts": 1_000_000},
                {"id": 2, "order_id": 20, "market_string": "LTC_BTC", "side": "buy",
                 "price": "0.019", "market_amount": "2", "created_at_ts": 2_000_000}
            ]}})
            .to_string(),
        );
    let qtrade = private_connector(&mock);

    let trades = qtrade.get_my_trades(Some(&ltc_btc()), None, Some(1)).await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].id.as_deref(), Some("2"));
    assert_eq!(trades[0].symbol, Some(ltc_btc()));
    assert_eq!(trades[0].timestamp, Some(2_000));

    let all = qtrade.get_my_trades(None, None, None).await.unwrap();
    let ids: Vec<_> = all.iter().map(|t| t.id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(all[0].symbol, Some(Symbol::new("BTC", "USDT").unwrap()));
    assert_eq!(all[2].fee.as_ref().map(|f| f.cost), Some(dec!(0.0001)));
}

#[tokio::test]
async fn single_order_carries_its_fills() {
    let mock = MockRest::default().route(
        "/v1/user/order/123",
        200,
        json!({"data": {"order": {
            "id": 123, "market_string": "LTC_BTC", "open": false, "order_type": "buy_limit",
            "price": "0.02", "market_amount": "2", "market_amount_remaining": "0",
            "created_at": "2019-01-01T00:00:00Z",
            "trades": [
                {"id": 55, "price": "0.02", "market_amount": "2", "base_volume": "0.04",
                 "created_at": "2019-01-01T00:00:05Z"}
            ]
        }}})
        .to_string(),
    );
    let qtrade = private_connector(&mock);

    let order = qtrade.get_order("123").await.unwrap();

    assert_eq!(order.id, "123");
    assert_eq!(order.status, OrderStatus::Closed);
    assert_eq!(order.symbol, Some(ltc_btc()));
    assert_eq!(order.filled, Some(dec!(2)));
    assert_eq!(order.trades.len(), 1);
    let fill = &order.trades[0];
    assert_eq!(fill.order_id.as_deref(), Some("123"));
    assert_eq!(fill.symbol, Some(ltc_btc()));
    assert_eq!(fill.side, Some(OrderSide::Buy));
    assert_eq!(order.last_trade_timestamp, fill.timestamp);

    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://api.qtrade.io/v1/user/order/123");
    assert!(sent[0].headers.contains_key("Authorization"));
}

#[tokio::test]
async fn currencies_are_keyed_by_unified_code() {
    let mock = MockRest::default().route(
        "/v1/currencies",
        200,
        json!({"data": {"currencies": [
            {"code": "XBT", "long_name": "Bitcoin", "type": "bitcoin_like", "precision": "8",
             "config": {"withdraw_fee": "0.0005"}, "minimum_order": "0.0001",
             "status": "ok", "can_withdraw": true},
            {"code": "LTC", "long_name": "Litecoin", "precision": 8, "status": "offline",
             "can_withdraw": true, "deposit_disabled": true}
        ]}})
        .to_string(),
    );
    let qtrade = public_connector(&mock);

    let currencies = qtrade.get_currencies().await.unwrap();

    assert_eq!(currencies.len(), 2);
    let btc = &currencies["BTC"];
    assert_eq!(btc.id, "XBT");
    assert!(btc.active);
    assert_eq!(btc.precision, Some(8));
    assert_eq!(btc.fee, Some(dec!(0.0005)));
    assert_eq!(btc.limits.amount.min, Some(dec!(0.0001)));
    let ltc = &currencies["LTC"];
    assert!(!ltc.active);
    assert!(!ltc.deposit);
    assert!(mock.sent()[0].headers.is_empty());
}

#[tokio::test]
async fn single_deposit_and_withdrawal_by_id() {
    let mock = MockRest::default()
        .route(
            "/v1/user/deposit/ab12",
            200,
            json!({"data": {"deposit": {
                "id": "ab12", "amount": "30", "currency": "XRP", "status": "credited",
                "address": "rPEP:77", "created_at": "2019-02-01T00:00:00Z",
                "network_data": {"txid": "f00d"}
            }}})
            .to_string(),
        )
        .route(
            "/v1/user/withdraw/5",
            200,
            json!({"data": {"withdraw": {
                "id": 5, "amount": "0.25", "currency": "XBT", "status": "sent",
                "address": "bc1q", "created_at": "2019-02-02T00:00:00Z"
            }}})
            .to_string(),
        );
    let qtrade = private_connector(&mock);

    let deposit = qtrade.get_deposit("ab12").await.unwrap();
    assert_eq!(deposit.kind, TransactionType::Deposit);
    assert_eq!(deposit.address.as_deref(), Some("rPEP"));
    assert_eq!(deposit.tag.as_deref(), Some("77"));
    assert_eq!(deposit.txid.as_deref(), Some("f00d"));
    assert_eq!(deposit.amount, Some(dec!(30)));

    let withdrawal = qtrade.get_withdrawal("5").await.unwrap();
    assert_eq!(withdrawal.kind, TransactionType::Withdrawal);
    assert_eq!(withdrawal.id.as_deref(), Some("5"));
    assert_eq!(withdrawal.currency.as_deref(), Some("BTC"));
    assert_eq!(withdrawal.tag, None);

    let urls: Vec<_> = mock.sent().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.qtrade.io/v1/user/deposit/ab12",
            "https://api.qtrade.io/v1/user/withdraw/5"
        ]
    );
}

#[tokio::test]
async fn order_book_sides_follow_price_strings() {
    let mock = MockRest::default()
        .route("/v1/markets", 200, markets_body())
        .route(
            "/v1/orderbook/LTC_BTC",
            200,
            json!({"data": {
                "buy": {"0.019": "10", "0.0185": "3"},
                "sell": {"0.02": "1.5"},
                "last_change": 1_588_533_365_354_609_i64
            }})
            .to_string(),
        );
    let qtrade = public_connector(&mock);

    let book = qtrade.get_order_book(&ltc_btc()).await.unwrap();

    assert_eq!(book.symbol, ltc_btc());
    assert_eq!(
        book.bids,
        vec![
            OrderBookEntry { price: dec!(0.0185), amount: dec!(3) },
            OrderBookEntry { price: dec!(0.019), amount: dec!(10) },
        ]
    );
    assert_eq!(book.asks, vec![OrderBookEntry { price: dec!(0.02), amount: dec!(1.5) }]);
    assert_eq!(book.timestamp, Some(1_588_533_365_354));
}

#[tokio::test]
async fn balances_merge_free_and_reserved() {
    let mock = MockRest::default().route(
        "/v1/user/balances_all",
        200,
        json!({"data": {
            "balances": [
                {"currency": "XBT", "balance": "1.5"},
                {"currency": "LTC", "balance": "10"}
            ],
            "order_balances": [
                {"currency": "XBT", "balance": "0.5"}
            ]
        }})
        .to_string(),
    );
    let qtrade = private_connector(&mock);

    let balances = qtrade.get_account_balance().await.unwrap();

    assert_eq!(balances.len(), 2);
    assert_eq!(balances["BTC"].free, dec!(1.5));
    assert_eq!(balances["BTC"].used, dec!(0.5));
    assert_eq!(balances["BTC"].total, dec!(2));
    assert_eq!(balances["LTC"].used, dec!(0));
    assert_eq!(balances["LTC"].total, dec!(10));
}

#[tokio::test]
async fn malformed_payload_error_quotes_the_body() {
    let body = r#"{"data":{"markets":[{"id":1,"market_currency":"LTC","base_currency":"BTC","MARKER_oops":1}]}}"#;
    let mock = MockRest::default().route("/v1/markets", 200, body);
    let qtrade = public_connector(&mock);

    match qtrade.get_markets().await {
        Err(ExchangeError::ParseError(message)) => {
            assert!(message.starts_with("qtrade missing market_string: "));
            assert!(message.contains("MARKER_oops"));
        }
        other => panic!("expected ParseError, got {:?}", other),
    }

    let mock = MockRest::default().route("/v1/currencies", 200, r#"{"data":{"currencies":7}}"#);
    let qtrade = public_connector(&mock);
    match qtrade.get_currencies().await {
        Err(ExchangeError::ParseError(message)) => {
            assert!(message.starts_with("qtrade "));
            assert!(message.ends_with(r#"{"data":{"currencies":7}}"#));
        }
        other => panic!("expected ParseError, got {:?}", other),
    }
}
