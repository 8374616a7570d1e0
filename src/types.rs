use clap::{ArgEnum, Parser};

#[derive(Debug, Parser)]
#[clap(name="ordershot")]
#[clap(about="ordershot places a single market or limit order on Binance's USDT-M futures testnet", long_about=None)]
pub struct CommandlineArgs {
    /// Trading pair, e.g. BTCUSDT. Sent to the exchange upper-cased;
    /// format is left for the exchange to validate.
    #[clap(short='s', long)]
    pub symbol: String,

    /// Order side.
    #[clap(long, arg_enum, ignore_case(true))]
    pub side: Side,

    /// Order type.
    #[clap(long="type", arg_enum, ignore_case(true))]
    pub order_type: OrderType,

    /// Quantity of the base asset to trade, e.g. 0.001. Must be positive.
    #[clap(short='q', long)]
    pub qty: f64,

    /// Target price. Required (and positive) for LIMIT orders,
    /// ignored for MARKET orders.
    #[clap(short='p', long)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
pub enum OrderType {
    Market,
    Limit,
}

/// A fully validated order, ready to be turned into wire parameters.
/// Constructed once from command-line input and never mutated afterwards.
///
/// Invariants held after validation: `quantity > 0`, and `price` is
/// `Some(p)` with `p > 0` exactly when `order_type` is `Limit`.
#[derive(Debug)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
}

/// API key pair loaded from the environment (a `.env` file is honored).
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Everything the API plumbing needs to talk to the exchange.
pub struct ClientContext {
    pub credentials: Credentials,

    /// Resolved REST base URL. Always the testnet one in this tool.
    pub base_url: &'static str,
}

/// Success payload of the order entry endpoint. The exchange returns many
/// more fields; only the ones we report are kept, the rest are ignored.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: u64,
    pub status: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Error body the exchange attaches to non-2xx responses.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Which layer of the exchange rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    /// Rejected before reaching the trading engine: bad signature,
    /// bad parameters, throttling, timestamp outside recvWindow.
    Api,
    /// Accepted by the API but rejected by the matching engine:
    /// insufficient balance/margin, symbol filter violations.
    Order,
}

/// Outcome of one submission attempt. A rejected order is a normal
/// business outcome here, not a program failure.
#[derive(Debug)]
pub enum Submission {
    Placed(OrderAck),
    Rejected {
        kind: RejectKind,
        code: i64,
        message: String,
    },
}

/// Local input problems caught before anything touches the network.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("LIMIT orders require a positive --price")]
    MissingLimitPrice,
}

#[derive(Debug, thiserror::Error)]
#[error("required environment variable {0} is not set")]
pub struct MissingCredential(pub &'static str);

/// Failures raised by the exchange API plumbing. `Api` and `Order` are the
/// two expected rejection kinds and are handled at the submission boundary;
/// the rest propagate to the top level.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("order error (code {code}): {message}")]
    Order { code: i64, message: String },

    #[error("transport failure: {0}")]
    Transport(#[from] isahc::Error),

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("failed to build request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP request: {0}")]
    Request(#[from] isahc::http::Error),

    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}
