use crate::core::currency::CurrencyCodes;
use crate::core::types::{Market, Symbol};
use std::collections::HashMap;

/// Immutable snapshot of the exchange's markets.
///
/// Built once per load and shared behind an `Arc`; a reload builds a new
/// index instead of mutating the old one.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    markets: Vec<Market>,
    by_id: HashMap<String, usize>,
    by_symbol: HashMap<Symbol, usize>,
    codes: CurrencyCodes,
}

impl MarketIndex {
    pub fn new(markets: Vec<Market>, codes: CurrencyCodes) -> Self {
        let mut by_id = HashMap::with_capacity(markets.len());
        let mut by_symbol = HashMap::with_capacity(markets.len());
        for (position, market) in markets.iter().enumerate() {
            by_id.insert(market.id.clone(), position);
            by_symbol.insert(market.symbol.clone(), position);
        }

        Self {
            markets,
            by_id,
            by_symbol,
            codes,
        }
    }

    /// Look up by native market string, e.g. `LTC_BTC`
    pub fn by_id(&self, id: &str) -> Option<&Market> {
        self.by_id.get(id).map(|&i| &self.markets[i])
    }

    pub fn by_symbol(&self, symbol: &Symbol) -> Option<&Market> {
        self.by_symbol.get(symbol).map(|&i| &self.markets[i])
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn currency_codes(&self) -> &CurrencyCodes {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
