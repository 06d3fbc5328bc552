use aircast_client::{Client, Config, Toggle};
use clap::{Parser, Subcommand};
use log::{error, LevelFilter};
use serde_json::Value;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

mod shell;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Address of the streamer, e.g. `10.0.0.8` or `10.0.0.8:8004`.
    #[clap(short, long, global = true, default_value = "localhost")]
    streamer: String,

    /// Use a config file at this path instead of the default location.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every command and response.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Initialize the streamer.
    Init,
    /// Attach a receiver to the streamer.
    Connect { host: String },
    /// Detach a receiver from the streamer.
    Disconnect { host: String },
    /// Close the streamer.
    Close,
    /// Print the streamer state.
    State,
    /// Change a streamer setting.
    #[clap(subcommand)]
    Set(SetCmd),
    /// Open an interactive session.
    Shell,
}

#[derive(Subcommand, Debug)]
enum SetCmd {
    /// Capture framerate, frames per second.
    Framerate { fps: u32 },
    /// Encoding quality level.
    Quality { level: u32 },
    /// Stream buffer size.
    Buffer { size: u32 },
    /// Streaming mode.
    Mode { mode: String },
    /// Toggle audio streaming (`on`/`off`).
    Audio { state: String },
    /// Toggle video streaming (`on`/`off`).
    Video { state: String },
    /// Toggle the video jitter buffer (`on`/`off`).
    VideoJitterbuffer { state: String },
    /// Jitter buffer delay in milliseconds.
    JitterbufferDelay { ms: u32 },
    /// Toggle the audio jitter buffer (`on`/`off`).
    AudioJitterbuffer { state: String },
    /// Toggle reliable transport (`on`/`off`).
    ReliableTransport { state: String },
}

fn main() -> ! {
    let args = Args::parse();

    let filter = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        filter,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    let config = match &args.config {
        Some(path) => Config::load(path.clone()),
        None => Config::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!("Cannot load configuration: {}", err);
            proc_exit::Code::FAILURE.process_exit();
        }
    };

    // A bare host gets the standard command port appended.
    let client = if args.streamer.contains(':') {
        Client::with_addr(args.streamer.clone(), config)
    } else {
        Client::new(&args.streamer, config)
    };

    if let Cmd::Shell = args.command {
        shell::run(client, &args.streamer);
    }

    match dispatch(&client, &args.command) {
        Ok(()) => proc_exit::Code::SUCCESS.process_exit(),
        Err(err) => {
            error!("{}", err);
            proc_exit::Code::FAILURE.process_exit();
        }
    }
}

fn dispatch(client: &Client, command: &Cmd) -> aircast_client::Result<()> {
    match command {
        Cmd::Init => report(client.init_streamer()?),
        Cmd::Connect { host } => report(client.connect_receiver(host)?),
        Cmd::Disconnect { host } => report(client.disconnect_receiver(host)?),
        Cmd::Close => report(client.close_streamer()?),
        Cmd::State => println!("{:#}", client.state()?),
        Cmd::Set(setting) => {
            let response = match setting {
                SetCmd::Framerate { fps } => client.set_framerate(*fps)?,
                SetCmd::Quality { level } => client.set_quality(*level)?,
                SetCmd::Buffer { size } => client.set_buffer(*size)?,
                SetCmd::Mode { mode } => client.set_mode(mode)?,
                SetCmd::Audio { state } => client.set_audio(parse_toggle(state))?,
                SetCmd::Video { state } => client.set_video(parse_toggle(state))?,
                SetCmd::VideoJitterbuffer { state } => {
                    client.set_video_jitterbuffer(parse_toggle(state))?
                }
                SetCmd::JitterbufferDelay { ms } => client.set_jitterbuffer_delay(*ms)?,
                SetCmd::AudioJitterbuffer { state } => {
                    client.set_audio_jitterbuffer(parse_toggle(state))?
                }
                SetCmd::ReliableTransport { state } => {
                    client.set_reliable_transport(parse_toggle(state))?
                }
            };
            report(response);
        }
        // Handled before dispatch; the shell never returns.
        Cmd::Shell => unreachable!(),
    }
    Ok(())
}

fn report(response: Value) {
    match response.get("result") {
        Some(result) => println!("{:#}", result),
        None => println!("ok"),
    }
}

fn parse_toggle(value: &str) -> Toggle {
    match value.parse() {
        Ok(toggle) => toggle,
        Err(err) => {
            eprintln!("{}", err);
            proc_exit::Code::USAGE_ERR.process_exit();
        }
    }
}
