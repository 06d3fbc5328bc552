use crate::command::{Command, Setting, Toggle};
use crate::config::Config;
use crate::rpc::{self, Request};
use serde_json::Value;
use std::net::IpAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};

/// Asynchronous streamer client, mirroring the blocking `Client` on top of Tokio.
///
/// Same transport contract as the blocking flavor: one connection per operation, write then
/// half-close, read the response to EOF.
pub struct AsyncClient {
    addr: String,
    config: Config,
}

impl AsyncClient {
    /// Client for the streamer at `host`, on the standard command port.
    pub fn new(host: &str, config: Config) -> Self {
        Self::with_addr(format!("{}:{}", host, crate::COMMAND_PORT), config)
    }

    /// Client for a streamer at an explicit `host:port` address.
    pub fn with_addr(addr: impl Into<String>, config: Config) -> Self {
        AsyncClient {
            addr: addr.into(),
            config,
        }
    }

    /// Installation id from the local config.
    pub fn uuid(&self) -> &str {
        self.config.uuid()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a command and return the parsed response.
    pub async fn call(&self, command: &Command) -> crate::Result<Value> {
        let params = command.params();
        log::debug!("sending command [{} | {:?}]", command.method(), params);

        let mut stream = TcpStream::connect(&self.addr).await?;
        stream
            .write_all(&Request::new(command.method(), &params).to_vec()?)
            .await?;
        stream.shutdown().await?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;

        let response = rpc::parse_response(&buf);
        match &response {
            Ok(value) => log::debug!("received response: {}", value),
            Err(err) => log::debug!("received error: {}", err),
        }
        response
    }

    pub async fn init_streamer(&self) -> crate::Result<Value> {
        self.call(&Command::InitStreamer).await
    }

    /// Point the streamer at a receiver. `host` may be an IP literal or a name to resolve.
    pub async fn connect_receiver(&self, host: &str) -> crate::Result<Value> {
        let receiver = resolve(host).await?;
        self.call(&Command::Connect { receiver }).await
    }

    pub async fn disconnect_receiver(&self, host: &str) -> crate::Result<Value> {
        let receiver = resolve(host).await?;
        self.call(&Command::Disconnect { receiver }).await
    }

    pub async fn close_streamer(&self) -> crate::Result<Value> {
        self.call(&Command::CloseStreamer).await
    }

    pub async fn state(&self) -> crate::Result<Value> {
        self.call(&Command::GetState).await
    }

    pub async fn set_framerate(&self, fps: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Framerate(fps))).await
    }

    pub async fn set_quality(&self, level: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Quality(level))).await
    }

    pub async fn set_buffer(&self, size: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Buffer(size))).await
    }

    pub async fn set_mode(&self, mode: &str) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Mode(mode.to_owned()))).await
    }

    pub async fn set_audio(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Audio(state))).await
    }

    pub async fn set_video(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Video(state))).await
    }

    pub async fn set_video_jitterbuffer(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::VideoJitterbuffer(state)))
            .await
    }

    pub async fn set_jitterbuffer_delay(&self, ms: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::JitterbufferDelay(ms))).await
    }

    /// Not supported by current streamer firmware.
    pub async fn set_audio_jitterbuffer(&self, _state: Toggle) -> crate::Result<Value> {
        Err(crate::ClientError::Unsupported("audio jitterbuffer").into())
    }

    /// Not supported by current streamer firmware.
    pub async fn set_reliable_transport(&self, _state: Toggle) -> crate::Result<Value> {
        Err(crate::ClientError::Unsupported("reliable transport").into())
    }
}

// IP literals pass through, names go through the resolver.
async fn resolve(host: &str) -> crate::Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    lookup_host((host, 0))
        .await?
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| crate::ClientError::Resolve(host.to_owned()).into())
}
