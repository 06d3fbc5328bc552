//! This crate provides a high-level client for AirCast wireless display streamers, speaking
//! the JSON-RPC-over-TCP control protocol the streamer listens on.
//!
//! Every operation is a single request/response round trip on its own TCP connection: the
//! client dials the streamer's command port, writes one JSON-RPC object, half-closes the
//! write direction to mark the end of the request, and reads the response until the streamer
//! closes the connection. A response carrying an `error` member is a failure.
//!
//! The blocking [`Client`] is available by default; enabling the `async` feature adds
//! `AsyncClient`, the same surface on top of [Tokio](https://tokio.rs/).
//!
//! On first use the client initializes a small local configuration file holding a generated
//! installation id, see [`Config`].
//!
//! # Example
//! ```rust,no_run
//! use aircast_client::{Client, Config};
//!
//! fn main() -> aircast_client::Result<()> {
//!     let config = Config::load_default()?;
//!     let client = Client::new("10.0.0.8", config);
//!
//!     client.init_streamer()?;
//!     client.connect_receiver("10.0.0.15")?;
//!     client.set_framerate(30)?;
//!     Ok(())
//! }
//! ```

mod command;
mod config;
mod rpc;

#[cfg(feature = "async")]
mod async_client;
#[cfg(feature = "sync")]
mod client;

pub use self::command::{Command, ParseToggleError, Setting, Toggle};
pub use self::config::{default_config_path, Config};
pub use self::rpc::{is_error, Request, RpcError};

#[cfg(feature = "async")]
pub use self::async_client::AsyncClient;
#[cfg(feature = "sync")]
pub use self::client::Client;

/// TCP port the streamer listens on for control commands.
pub const COMMAND_PORT: u16 = 8004;

/// TCP port receivers accept media on. Sent as a parameter of `connect` and `disconnect`,
/// never dialed by this client.
pub const RECEIVER_PORT: u16 = 8002;

/// Error type for streamer operations.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ClientError);

#[derive(Debug, thiserror::Error)]
pub(crate) enum ClientError {
    #[error("cannot reach the streamer: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed streamer response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("could not resolve host {0}")]
    Resolve(String),

    #[error("the {0} setting is not supported by the streamer")]
    Unsupported(&'static str),
}

/// [`Result`] alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl<T> From<T> for Error
where
    T: Into<ClientError>,
{
    fn from(inner: T) -> Self {
        Error(inner.into())
    }
}

impl Error {
    /// The error payload returned by the streamer, if this was an RPC-level failure.
    pub fn rpc(&self) -> Option<&RpcError> {
        match &self.0 {
            ClientError::Rpc(err) => Some(err),
            _ => None,
        }
    }
}
