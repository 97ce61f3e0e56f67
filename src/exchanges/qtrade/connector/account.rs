use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, FundingSource};
use crate::core::types::{
    Balances, DepositAddress, Transaction, TransactionType, WithdrawRequest,
};
use crate::exchanges::qtrade::connector::markets::MarketCache;
use crate::exchanges::qtrade::converters;
use crate::exchanges::qtrade::errors::EXCHANGE_ID;
use crate::exchanges::qtrade::rest::QtradeRest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

/// qTrade balances and funding
#[derive(Debug)]
pub struct Account<R: RestClient> {
    rest: Arc<QtradeRest<R>>,
    markets: Arc<MarketCache<R>>,
}

impl<R: RestClient> Account<R> {
    pub fn new(rest: Arc<QtradeRest<R>>, markets: Arc<MarketCache<R>>) -> Self {
        Self { rest, markets }
    }
}

/// qTrade takes the destination as one `address:tag` string
fn withdraw_address(request: &WithdrawRequest) -> String {
    match request.tag.as_deref() {
        Some(tag) if !tag.is_empty() => format!("{}:{}", request.address, tag),
        _ => request.address.clone(),
    }
}

fn validate_withdraw(request: &WithdrawRequest) -> Result<(), ExchangeError> {
    if request.amount <= Decimal::ZERO {
        return Err(ExchangeError::InvalidParameters(format!(
            "Withdraw amount must be positive, got {}",
            request.amount
        )));
    }
    if request.address.trim().is_empty() {
        return Err(ExchangeError::InvalidParameters(
            "Withdraw address is required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError> {
        let raw = self.rest.get_balances().await?;
        raw.parse(|balances| converters::convert_balances(balances, self.markets.currency_codes()))
    }
}

#[async_trait]
impl<R: RestClient> FundingSource for Account<R> {
    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_deposits(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        let raw = self.rest.get_deposits().await?;
        Ok(converters::convert_transfers(
            &raw.data,
            TransactionType::Deposit,
            self.markets.currency_codes(),
            currency,
            since,
            limit,
        ))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_deposit(&self, deposit_id: &str) -> Result<Transaction, ExchangeError> {
        let raw = self.rest.get_deposit(deposit_id).await?;
        Ok(converters::convert_transfer(
            &raw.data,
            TransactionType::Deposit,
            self.markets.currency_codes(),
        ))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        let raw = self.rest.get_withdraws().await?;
        Ok(converters::convert_transfers(
            &raw.data,
            TransactionType::Withdrawal,
            self.markets.currency_codes(),
            currency,
            since,
            limit,
        ))
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_withdrawal(&self, withdrawal_id: &str) -> Result<Transaction, ExchangeError> {
        let raw = self.rest.get_withdraw(withdrawal_id).await?;
        Ok(converters::convert_transfer(
            &raw.data,
            TransactionType::Withdrawal,
            self.markets.currency_codes(),
        ))
    }

    async fn get_transactions(
        &self,
        currency: Option<&str>,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        let mut transactions = self.get_deposits(currency, since, None).await?;
        transactions.extend(self.get_withdrawals(currency, since, None).await?);
        transactions.truncate(limit.unwrap_or(usize::MAX));
        Ok(transactions)
    }

    #[instrument(skip(self), fields(exchange = EXCHANGE_ID))]
    async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, ExchangeError> {
        let raw = self.rest.create_deposit_address(currency).await?;
        raw.parse(|address| {
            converters::convert_deposit_address(address, currency, self.markets.currency_codes())
        })
    }

    #[instrument(skip(self, request), fields(exchange = EXCHANGE_ID, currency = %request.currency))]
    async fn withdraw(&self, request: WithdrawRequest) -> Result<Transaction, ExchangeError> {
        validate_withdraw(&request)?;
        let raw = self
            .rest
            .withdraw(
                &request.currency,
                request.amount.normalize().to_string(),
                withdraw_address(&request),
            )
            .await?;
        Ok(converters::convert_withdraw_result(
            &raw.data,
            &request,
            self.markets.currency_codes(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(tag: Option<&str>) -> WithdrawRequest {
        WithdrawRequest {
            currency: "XLM".to_string(),
            amount: dec!(12.50),
            address: "GABC".to_string(),
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn tag_is_appended_to_address() {
        assert_eq!(withdraw_address(&request(Some("memo1"))), "GABC:memo1");
        assert_eq!(withdraw_address(&request(None)), "GABC");
        assert_eq!(withdraw_address(&request(Some(""))), "GABC");
    }

    #[test]
    fn withdraw_requires_positive_amount() {
        let mut bad = request(None);
        bad.amount = Decimal::ZERO;
        assert!(matches!(
            validate_withdraw(&bad),
            Err(ExchangeError::InvalidParameters(_))
        ));
        assert!(validate_withdraw(&request(None)).is_ok());
    }
}
