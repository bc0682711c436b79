use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("missing required environment variables: {vars}")]
    Missing { vars: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("indicator request for {symbol} failed")]
    Request { symbol: String },
    #[display("indicator provider returned an error for {symbol}")]
    Status { symbol: String },
    #[display("failed to parse indicator response for {symbol}")]
    ResponseParse { symbol: String },
    #[display("indicator response for {symbol} has no value")]
    MissingValue { symbol: String },
}

#[derive(Debug, Display, Error)]
pub enum NotifyError {
    #[display("notification request failed")]
    Request,
    #[display("messaging provider rejected the notification")]
    Status,
}
