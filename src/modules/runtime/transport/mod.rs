//! Outbound transport for remote query services
//!
//! Building a request is separated from sending it: `OutboundRequest` is plain
//! data, and any `Transport` can execute it. `HttpTransport` is the reqwest
//! implementation used in production.

mod http;
mod request;
mod traits;

pub use http::HttpTransport;
pub use request::{
    basic_auth_value, encode_query_form, OutboundRequest, ACCEPT_SPARQL_RESULTS_JSON,
    CONTENT_TYPE_FORM, USER_AGENT,
};
pub use traits::{Transport, TransportError, TransportResponse};
