/// Base URL of Binance USDT-M futures production REST API.
/// NOTE: Kept for completeness; the program always runs against testnet.
pub const MAINNET_BASE_URL: &str = "https://fapi.binance.com";

/// Base URL of Binance USDT-M futures testnet REST API.
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Liveness check endpoint. Unauthenticated.
pub const PING_PATH: &str = "/fapi/v1/ping";

/// Order entry endpoint. Requires an HMAC-signed query string.
pub const ORDER_PATH: &str = "/fapi/v1/order";

/// Time-in-force flag sent with every order.
pub const TIME_IN_FORCE_GTC: &str = "GTC";

/// Tolerated gap in milliseconds between our request timestamp and the
/// server's clock before the API rejects the request.
pub const RECV_WINDOW_MS: u64 = 5000;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "API_KEY";

/// Environment variable holding the API secret.
pub const ENV_API_SECRET: &str = "API_SECRET";

/// File receiving the debug-level-and-above log stream, appended in the
/// current working directory.
pub const LOG_FILE_NAME: &str = "trading_log.log";
