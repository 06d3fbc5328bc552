use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Two-state setting value, parsed from `on`/`off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl FromStr for Toggle {
    type Err = ParseToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Toggle::On),
            "off" => Ok(Toggle::Off),
            _ => Err(ParseToggleError(s.to_owned())),
        }
    }
}

/// Error returned when parsing a [`Toggle`] from anything but `on`/`off`.
#[derive(Debug, Clone)]
pub struct ParseToggleError(String);

impl fmt::Display for ParseToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected `on` or `off`, got `{}`", self.0)
    }
}

impl std::error::Error for ParseToggleError {}

/// A streamer setting and its wire encoding.
///
/// Every setting goes over the wire as a `setStreamerSettings` call with a string key and a
/// string value; [`Setting::key`] and [`Setting::value`] are that translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// Capture framerate, frames per second.
    Framerate(u32),
    /// Encoding quality level.
    Quality(u32),
    /// Stream buffer size.
    Buffer(u32),
    /// Streaming mode, passed through verbatim.
    Mode(String),
    Audio(Toggle),
    Video(Toggle),
    VideoJitterbuffer(Toggle),
    /// Jitter buffer delay in milliseconds.
    JitterbufferDelay(u32),
}

impl Setting {
    pub fn key(&self) -> &'static str {
        match self {
            Setting::Framerate(_) => "framerate",
            Setting::Quality(_) => "quality",
            Setting::Buffer(_) => "buffer",
            Setting::Mode(_) => "streaming_mode",
            Setting::Audio(_) | Setting::Video(_) => "av_flags",
            Setting::VideoJitterbuffer(_) => "video_jb_flags",
            Setting::JitterbufferDelay(_) => "jb_delay",
        }
    }

    pub fn value(&self) -> String {
        match self {
            Setting::Framerate(v)
            | Setting::Quality(v)
            | Setting::Buffer(v)
            | Setting::JitterbufferDelay(v) => v.to_string(),
            Setting::Mode(mode) => mode.clone(),
            // TODO: read the current av_flags and preserve the other channel's bit instead
            // of overwriting both.
            Setting::Audio(Toggle::On) => "3".to_string(),
            Setting::Audio(Toggle::Off) => "1".to_string(),
            Setting::Video(Toggle::On) => "1".to_string(),
            Setting::Video(Toggle::Off) => "0".to_string(),
            Setting::VideoJitterbuffer(Toggle::On) => "1".to_string(),
            Setting::VideoJitterbuffer(Toggle::Off) => "0".to_string(),
        }
    }
}

/// A control operation and its RPC method/parameter encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    InitStreamer,
    Connect { receiver: IpAddr },
    Disconnect { receiver: IpAddr },
    CloseStreamer,
    GetState,
    Set(Setting),
}

impl Command {
    pub fn method(&self) -> &'static str {
        match self {
            Command::InitStreamer => "initStreamer",
            Command::Connect { .. } => "connect",
            Command::Disconnect { .. } => "disconnect",
            Command::CloseStreamer => "closeStreamer",
            Command::GetState => "getState",
            Command::Set(_) => "setStreamerSettings",
        }
    }

    pub fn params(&self) -> Vec<String> {
        match self {
            Command::InitStreamer | Command::CloseStreamer | Command::GetState => Vec::new(),
            Command::Connect { receiver } | Command::Disconnect { receiver } => {
                vec![receiver.to_string(), crate::RECEIVER_PORT.to_string()]
            }
            Command::Set(setting) => vec![setting.key().to_string(), setting.value()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_commands_have_no_params() {
        assert_eq!(Command::InitStreamer.method(), "initStreamer");
        assert_eq!(Command::CloseStreamer.method(), "closeStreamer");
        assert_eq!(Command::GetState.method(), "getState");
        assert!(Command::InitStreamer.params().is_empty());
        assert!(Command::CloseStreamer.params().is_empty());
        assert!(Command::GetState.params().is_empty());
    }

    #[test]
    fn connect_carries_receiver_and_port() {
        let command = Command::Connect {
            receiver: "10.0.0.15".parse().unwrap(),
        };
        assert_eq!(command.method(), "connect");
        assert_eq!(command.params(), vec!["10.0.0.15", "8002"]);
    }

    #[test]
    fn disconnect_carries_receiver_and_port() {
        let command = Command::Disconnect {
            receiver: "10.0.0.15".parse().unwrap(),
        };
        assert_eq!(command.method(), "disconnect");
        assert_eq!(command.params(), vec!["10.0.0.15", "8002"]);
    }

    #[test]
    fn numeric_settings_encode_as_decimal_strings() {
        let command = Command::Set(Setting::Framerate(30));
        assert_eq!(command.method(), "setStreamerSettings");
        assert_eq!(command.params(), vec!["framerate", "30"]);

        assert_eq!(
            Command::Set(Setting::Quality(4)).params(),
            vec!["quality", "4"]
        );
        assert_eq!(
            Command::Set(Setting::Buffer(512)).params(),
            vec!["buffer", "512"]
        );
        assert_eq!(
            Command::Set(Setting::JitterbufferDelay(120)).params(),
            vec!["jb_delay", "120"]
        );
    }

    #[test]
    fn mode_passes_through_verbatim() {
        assert_eq!(
            Command::Set(Setting::Mode("mirror".to_string())).params(),
            vec!["streaming_mode", "mirror"]
        );
    }

    #[test]
    fn av_flags_translation() {
        assert_eq!(
            Command::Set(Setting::Audio(Toggle::On)).params(),
            vec!["av_flags", "3"]
        );
        assert_eq!(
            Command::Set(Setting::Audio(Toggle::Off)).params(),
            vec!["av_flags", "1"]
        );
        assert_eq!(
            Command::Set(Setting::Video(Toggle::On)).params(),
            vec!["av_flags", "1"]
        );
        assert_eq!(
            Command::Set(Setting::Video(Toggle::Off)).params(),
            vec!["av_flags", "0"]
        );
    }

    #[test]
    fn video_jitterbuffer_translation() {
        assert_eq!(
            Command::Set(Setting::VideoJitterbuffer(Toggle::On)).params(),
            vec!["video_jb_flags", "1"]
        );
        assert_eq!(
            Command::Set(Setting::VideoJitterbuffer(Toggle::Off)).params(),
            vec!["video_jb_flags", "0"]
        );
    }

    #[test]
    fn toggle_parses_on_and_off_only() {
        assert_eq!("on".parse::<Toggle>().unwrap(), Toggle::On);
        assert_eq!("off".parse::<Toggle>().unwrap(), Toggle::Off);
        assert!("1".parse::<Toggle>().is_err());
        assert!("On".parse::<Toggle>().is_err());
    }
}
