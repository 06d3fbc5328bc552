use crate::command::{Command, Setting, Toggle};
use crate::config::Config;
use crate::rpc::{self, Request};
use serde_json::Value;
use std::io::{Read, Write};
use std::net::{IpAddr, Shutdown, TcpStream, ToSocketAddrs};

/// Blocking streamer client.
///
/// Each operation dials the streamer, writes one request, half-closes the write direction
/// and reads the response until the streamer closes the connection. There is no pooling and
/// no retry; an operation maps to exactly one connection.
pub struct Client {
    addr: String,
    config: Config,
}

impl Client {
    /// Client for the streamer at `host`, on the standard command port.
    pub fn new(host: &str, config: Config) -> Self {
        Self::with_addr(format!("{}:{}", host, crate::COMMAND_PORT), config)
    }

    /// Client for a streamer at an explicit `host:port` address.
    pub fn with_addr(addr: impl Into<String>, config: Config) -> Self {
        Client {
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
    pub fn call(&self, command: &Command) -> crate::Result<Value> {
        let params = command.params();
        log::debug!("sending command [{} | {:?}]", command.method(), params);

        let mut stream = TcpStream::connect(&self.addr)?;
        stream.write_all(&Request::new(command.method(), &params).to_vec()?)?;
        stream.shutdown(Shutdown::Write)?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;

        let response = rpc::parse_response(&buf);
        match &response {
            Ok(value) => log::debug!("received response: {}", value),
            Err(err) => log::debug!("received error: {}", err),
        }
        response
    }

    pub fn init_streamer(&self) -> crate::Result<Value> {
        self.call(&Command::InitStreamer)
    }

    /// Point the streamer at a receiver. `host` may be an IP literal or a name to resolve.
    pub fn connect_receiver(&self, host: &str) -> crate::Result<Value> {
        let receiver = resolve(host)?;
        self.call(&Command::Connect { receiver })
    }

    pub fn disconnect_receiver(&self, host: &str) -> crate::Result<Value> {
        let receiver = resolve(host)?;
        self.call(&Command::Disconnect { receiver })
    }

    pub fn close_streamer(&self) -> crate::Result<Value> {
        self.call(&Command::CloseStreamer)
    }

    pub fn state(&self) -> crate::Result<Value> {
        self.call(&Command::GetState)
    }

    pub fn set_framerate(&self, fps: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Framerate(fps)))
    }

    pub fn set_quality(&self, level: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Quality(level)))
    }

    pub fn set_buffer(&self, size: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Buffer(size)))
    }

    pub fn set_mode(&self, mode: &str) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Mode(mode.to_owned())))
    }

    pub fn set_audio(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Audio(state)))
    }

    pub fn set_video(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::Video(state)))
    }

    pub fn set_video_jitterbuffer(&self, state: Toggle) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::VideoJitterbuffer(state)))
    }

    pub fn set_jitterbuffer_delay(&self, ms: u32) -> crate::Result<Value> {
        self.call(&Command::Set(Setting::JitterbufferDelay(ms)))
    }

    /// Not supported by current streamer firmware.
    pub fn set_audio_jitterbuffer(&self, _state: Toggle) -> crate::Result<Value> {
        Err(crate::ClientError::Unsupported("audio jitterbuffer").into())
    }

    /// Not supported by current streamer firmware.
    pub fn set_reliable_transport(&self, _state: Toggle) -> crate::Result<Value> {
        Err(crate::ClientError::Unsupported("reliable transport").into())
    }
}

// IP literals pass through, names go through the system resolver.
fn resolve(host: &str) -> crate::Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    (host, 0)
        .to_socket_addrs()?
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| crate::ClientError::Resolve(host.to_owned()).into())
}
