pub mod converters;
pub mod endpoints;
pub mod errors;
pub mod request;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

pub use builder::{create_qtrade_connector, QtradeBuilder, DEFAULT_BASE_URL};
pub use connector::{Account, MarketCache, MarketData, QtradeConnector, Trading};
pub use endpoints::{Access, Endpoint, QtradeInterval};
pub use errors::{classify, interpret_response, EXCHANGE_ID};
pub use request::RequestBuilder;
pub use rest::{Payload, QtradeRest};
pub use signer::QtradeSigner;
