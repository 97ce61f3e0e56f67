use std::collections::HashMap;

/// Native currency ids the exchange world commonly renames.
const COMMON_CURRENCIES: &[(&str, &str)] = &[
    ("XBT", "BTC"),
    ("BCC", "BCH"),
    ("DRK", "DASH"),
    ("BCHABC", "BCH"),
    ("BCHSV", "BSV"),
];

/// Maps native currency ids to unified currency codes.
///
/// Ids are uppercased first, then looked up in the alias table. Unknown ids
/// pass through uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyCodes {
    aliases: HashMap<String, String>,
}

impl Default for CurrencyCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyCodes {
    /// Table preloaded with the common aliases
    pub fn new() -> Self {
        let aliases = COMMON_CURRENCIES
            .iter()
            .map(|(native, code)| ((*native).to_string(), (*code).to_string()))
            .collect();
        Self { aliases }
    }

    /// Table with no aliases; ids are only uppercased
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, native: &str, code: &str) -> Self {
        self.aliases
            .insert(native.to_uppercase(), code.to_uppercase());
        self
    }

    pub fn canonical(&self, native_id: &str) -> String {
        let upper = native_id.to_uppercase();
        match self.aliases.get(&upper) {
            Some(code) => code.clone(),
            None => upper,
        }
    }
}
