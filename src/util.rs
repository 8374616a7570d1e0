use crate::defines::*;
use crate::types::*;

use anyhow::Context;
use isahc::{ReadResponseExt, Request, RequestExt};
use ring::hmac;
use tracing::{debug, error, info};
use url::Url;

/// Lower-case hex rendering of a byte slice, as the exchange expects for
/// the signature parameter.
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// HMAC-SHA256 of `query` keyed by the API secret, hex-encoded.
fn sign_query(api_secret: &str, query: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, api_secret.as_bytes());
    to_hex(hmac::sign(&key, query.as_bytes()).as_ref())
}

fn timestamp_ms() -> Result<u64, std::time::SystemTimeError> {
    let elapsed = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?;
    Ok(elapsed.as_millis() as u64)
}

/// Assemble a fully signed request URL: business parameters first, then
/// `recvWindow` and `timestamp`, then the signature over the whole query
/// string appended last.
fn build_signed_url(
    ctx: &ClientContext,
    path: &str,
    params: &[(&'static str, String)],
) -> Result<Url, ExchangeError> {
    let mut url = Url::parse(ctx.base_url)?.join(path)?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("recvWindow", &RECV_WINDOW_MS.to_string());
        pairs.append_pair("timestamp", &timestamp_ms()?.to_string());
    }

    let query = url.query().unwrap_or("").to_owned();
    let signature = sign_query(&ctx.credentials.api_secret, &query);
    url.query_pairs_mut().append_pair("signature", &signature);
    Ok(url)
}

/// Liveness check against the futures REST API. Unauthenticated, but a
/// failure here means order entry would fail too, so the caller treats it
/// as fatal.
pub fn api_ping(ctx: &ClientContext) -> anyhow::Result<()> {
    let url = Url::parse(ctx.base_url)
        .and_then(|u| u.join(PING_PATH))
        .context("building ping URL")?;

    let response = isahc::get(url.as_str()).context("ping request failed")?;
    if !response.status().is_success() {
        anyhow::bail!("ping returned HTTP {}", response.status());
    }
    Ok(())
}

/// Construct the client context and immediately verify connectivity.
/// Ping failures are logged here and re-raised for the top level to handle.
pub fn connect(credentials: Credentials, use_testnet: bool) -> anyhow::Result<ClientContext> {
    info!("Initializing futures client...");
    let ctx = ClientContext::new(credentials, use_testnet);
    match api_ping(&ctx) {
        Ok(()) => {
            info!(
                "Futures client initialized successfully and connected to {}",
                ctx.base_url
            );
            Ok(ctx)
        }
        Err(e) => {
            error!("Error initializing futures client: {:#}", e);
            Err(e)
        }
    }
}

/// Issue the order-creation call. Exactly one attempt, no retry.
///
/// A 2xx response parses into an `OrderAck`. A non-2xx response carrying
/// the exchange's `{code, msg}` error body is classified into the API/order
/// taxonomy; everything else surfaces as transport or malformed-response
/// errors.
fn api_create_order(
    ctx: &ClientContext,
    params: &[(&'static str, String)],
) -> Result<OrderAck, ExchangeError> {
    let url = build_signed_url(ctx, ORDER_PATH, params)?;

    let mut response = Request::post(url.as_str())
        .header("X-MBX-APIKEY", ctx.credentials.api_key.as_str())
        .body(())?
        .send()?;

    let status = response.status();
    let body = response.text()?;
    debug!("API response (HTTP {}): {}", status, body);

    if status.is_success() {
        serde_json::from_str::<OrderAck>(&body)
            .map_err(|e| ExchangeError::MalformedResponse(format!("{}: {}", e, body)))
    } else if let Ok(error_body) = serde_json::from_str::<ApiErrorBody>(&body) {
        Err(ExchangeError::classify(error_body))
    } else {
        Err(ExchangeError::MalformedResponse(format!(
            "HTTP {} with unrecognized body: {}",
            status, body
        )))
    }
}

/// Submit one validated order and report the outcome.
///
/// The two expected exchange rejection kinds are logged, printed, and
/// returned as a `Rejected` result; they never propagate. Transport and
/// other unexpected failures do propagate to the caller. `Ok(None)` is the
/// defensive answer to a LIMIT request that somehow lost its price.
pub fn submit_order(
    ctx: &ClientContext,
    request: &OrderRequest,
) -> anyhow::Result<Option<Submission>> {
    match request.price {
        Some(price) => info!(
            "Attempting order: Side={}, Type={}, Symbol={}, Qty={}, Price={}",
            request.side, request.order_type, request.symbol, request.quantity, price
        ),
        None => info!(
            "Attempting order: Side={}, Type={}, Symbol={}, Qty={}",
            request.side, request.order_type, request.symbol, request.quantity
        ),
    }

    // Unreachable when the request came through validation, but this
    // function does not get to assume that.
    if request.order_type == OrderType::Limit && request.price.is_none() {
        error!("LIMIT order requires a price parameter");
        println!("Order Failed: LIMIT order requires a target price.");
        return Ok(None);
    }

    let params = request.to_wire_params();
    match api_create_order(ctx, &params) {
        Ok(ack) => {
            info!("Order placed successfully. Status: {}", ack.status);
            debug!("Parsed ack: {:?}", ack);
            println!("\nOrder Placed Successfully:");
            println!("   Order ID: {}", ack.order_id);
            println!("   Status: {}", ack.status);
            println!("   Type: {}", ack.order_type);
            Ok(Some(Submission::Placed(ack)))
        }
        Err(ExchangeError::Api { code, message }) => {
            error!("Exchange API error (Code {}): {}", code, message);
            println!("\nOrder Failed (API Error): {}", message);
            Ok(Some(Submission::Rejected {
                kind: RejectKind::Api,
                code,
                message,
            }))
        }
        Err(ExchangeError::Order { code, message }) => {
            error!("Exchange order error (Code {}): {}", code, message);
            println!("\nOrder Failed (Order Error): {}", message);
            Ok(Some(Submission::Rejected {
                kind: RejectKind::Order,
                code,
                message,
            }))
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rendering_is_lowercase_and_padded() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xa5, 0xff]), "000fa5ff");
    }

    // Signature test vector from the exchange's official API documentation.
    #[test]
    fn signature_matches_documented_example() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign_query(secret, query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signed_url_appends_transport_fields_after_business_params() {
        let ctx = ClientContext::new(
            Credentials {
                api_key: "key".to_owned(),
                api_secret: "secret".to_owned(),
            },
            true,
        );
        let params = vec![("symbol", "BTCUSDT".to_owned()), ("side", "BUY".to_owned())];
        let url = build_signed_url(&ctx, ORDER_PATH, &params).unwrap();

        let query = url.query().unwrap();
        assert!(query.starts_with("symbol=BTCUSDT&side=BUY&recvWindow=5000&timestamp="));
        assert!(query.contains("&signature="));
        // signature must come last so it covers everything before it
        let signature_pos = query.find("&signature=").unwrap();
        assert_eq!(query[signature_pos + 1..].matches('=').count(), 1);
    }

    #[test]
    fn limit_without_price_returns_no_result_without_network() {
        let ctx = ClientContext::new(
            Credentials {
                api_key: "key".to_owned(),
                api_secret: "secret".to_owned(),
            },
            true,
        );
        // bypasses validation on purpose; submit_order must catch this
        // on its own and answer without issuing the API call
        let request = OrderRequest {
            symbol: "BTCUSDT".to_owned(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            quantity: 0.01,
            price: None,
        };
        let result = submit_order(&ctx, &request).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn success_payload_fields_survive_deserialization() {
        let body = r#"{"orderId": 12345, "status": "FILLED", "type": "MARKET", "symbol": "BTCUSDT", "origQty": "0.001"}"#;
        let ack: OrderAck = serde_json::from_str(body).unwrap();
        assert_eq!(ack.order_id, 12345);
        assert_eq!(ack.status, "FILLED");
        assert_eq!(ack.order_type, "MARKET");
        assert_eq!(ack.symbol.as_deref(), Some("BTCUSDT"));
    }

    #[test]
    fn error_body_deserializes() {
        let body = r#"{"code": -1021, "msg": "Timestamp for this request is outside of the recvWindow."}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, -1021);
        assert!(parsed.msg.contains("recvWindow"));
    }
}
