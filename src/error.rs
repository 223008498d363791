use std::io;
use std::str::Utf8Error;

use thiserror::Error;

use crate::packet::ResponseKind;

/// Every way a query can fail, from socket setup through payload decoding.
///
/// A failed call raises exactly one of these; partially-decoded values are
/// never returned alongside an error.
#[derive(Debug, Error)]
pub enum SourceQueryError {
    /// The datagram ended (or a string never hit its NUL terminator)
    /// before the field being decoded was complete.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// The server answered with a multi-packet (split) response, which
    /// this client does not reassemble.
    #[error("server sent a multi-packet response, which is unsupported")]
    UnsupportedFormat,

    /// The response-kind byte is not one this protocol defines.
    #[error("unrecognized response kind 0x{0:02X}")]
    UnrecognizedResponseKind(u8),

    /// The response-kind byte is valid but does not answer the request
    /// that was sent.
    #[error("unexpected response kind (got {got:?}, expected {expected})")]
    UnexpectedResponseKind {
        got: ResponseKind,
        expected: &'static str,
    },

    /// The server issued a second challenge for the same query.
    #[error("server requested too many challenges")]
    ChallengeLoop,

    /// No reply arrived within the configured window.
    #[error("request timed out")]
    TimedOut(#[from] tokio::time::error::Elapsed),

    /// A query was attempted after [`close`](crate::query::A2SQuery::close).
    #[error("the connection has been closed, no more requests can be made")]
    ClosedConnection,

    /// A string field in the payload was not valid UTF-8.
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("failed to bind local socket: {0}")]
    FailedPortBind(#[source] io::Error),

    #[error("could not connect to host: {0}")]
    UnreachableHost(#[source] io::Error),

    #[error("failed to send request: {0}")]
    SendError(#[source] io::Error),

    #[error("failed to receive response: {0}")]
    ReceiveError(#[source] io::Error),
}
