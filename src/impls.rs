use crate::defines::*;
use crate::types::*;

impl Side {
    /// Wire-format spelling expected by the exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read an environment variable, treating an empty value the same as an
/// unset one.
fn non_empty_env(name: &'static str) -> Result<String, MissingCredential> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(MissingCredential(name)),
    }
}

impl Credentials {
    /// Load the key pair from `API_KEY`/`API_SECRET`. Either one missing
    /// (or empty) is a startup failure; nothing network-facing is
    /// constructed before this succeeds.
    pub fn from_env() -> Result<Credentials, MissingCredential> {
        Ok(Credentials {
            api_key: non_empty_env(ENV_API_KEY)?,
            api_secret: non_empty_env(ENV_API_SECRET)?,
        })
    }
}

impl ClientContext {
    pub fn new(credentials: Credentials, use_testnet: bool) -> ClientContext {
        ClientContext {
            credentials,
            base_url: if use_testnet {
                TESTNET_BASE_URL
            } else {
                MAINNET_BASE_URL
            },
        }
    }
}

impl CommandlineArgs {
    /// Validate raw command-line input and normalize it into an
    /// `OrderRequest`. Rules, in order: quantity must be strictly
    /// positive, and LIMIT orders must carry a strictly positive price.
    /// A price supplied alongside MARKET is dropped here; symbol format
    /// is left for the exchange to judge.
    pub fn into_order_request(self) -> Result<OrderRequest, ValidationError> {
        // NaN is rejected here too, so it never reaches the exchange
        if self.qty.is_nan() || self.qty <= 0.0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        let price = match self.order_type {
            OrderType::Limit => match self.price {
                Some(p) if p > 0.0 => Some(p),
                _ => return Err(ValidationError::MissingLimitPrice),
            },
            OrderType::Market => None,
        };

        Ok(OrderRequest {
            symbol: self.symbol.to_uppercase(),
            side: self.side,
            order_type: self.order_type,
            quantity: self.qty,
            price,
        })
    }
}

impl OrderRequest {
    /// Build the business fields of the order entry request, in wire order.
    /// `timeInForce=GTC` is always included, MARKET orders too.
    // TODO: confirm with the exchange docs whether timeInForce should be
    // omitted for MARKET orders; the testnet currently accepts it as sent.
    pub fn to_wire_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_owned()),
            ("type", self.order_type.as_str().to_owned()),
            ("quantity", self.quantity.to_string()),
            ("timeInForce", TIME_IN_FORCE_GTC.to_owned()),
        ];
        if self.order_type == OrderType::Limit {
            if let Some(price) = self.price {
                params.push(("price", price.to_string()));
            }
        }
        params
    }
}

impl ExchangeError {
    /// Classify an error body returned by the exchange. Trading-engine
    /// rejections (balance, margin, symbol filters) get `Order`; anything
    /// else raised at the transport/API layer gets `Api`.
    pub fn classify(body: ApiErrorBody) -> ExchangeError {
        match body.code {
            // -1013 percent-price/lot-size filter, -2010..-2022 new-order
            // rejections, -4xxx futures-specific order checks.
            -1013 | -2010 | -2011 | -2013 | -2018 | -2019 | -2020 | -2021 | -2022 => {
                ExchangeError::Order {
                    code: body.code,
                    message: body.msg,
                }
            }
            c if c <= -4000 => ExchangeError::Order {
                code: body.code,
                message: body.msg,
            },
            _ => ExchangeError::Api {
                code: body.code,
                message: body.msg,
            },
        }
    }
}
