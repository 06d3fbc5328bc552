use aircast_client::{Client, Command, ParseToggleError, Setting, Toggle};
use ansi_term::Colour::{Fixed, Green, Yellow};
use crossterm::tty::IsTty;
use rustyline_async::{Readline, ReadlineError, SharedWriter};
use serde_json::Value;
use std::io::{BufRead, Lines, Stderr, StdinLock, Stdout, Write};

/// Interactive session against one streamer.
///
/// Never returns; every exit goes through `proc_exit`. RPC failures are printed and the
/// session keeps going.
pub fn run(client: Client, host: &str) -> ! {
    let prompt = format!("{}> ", Fixed(10).paint(host));
    let (mut read, mut write) = new_console(prompt);

    loop {
        let line = read.read_line();
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if dispatch(&client, line, &mut write) {
            proc_exit::Code::SUCCESS.process_exit();
        }
    }
}

// Returns true when the session should end.
fn dispatch(client: &Client, line: &str, write: &mut ConsoleWrite) -> bool {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let result = match (command, args.as_slice()) {
        ("help", _) => {
            print_help(write);
            return false;
        }
        ("quit", _) | ("exit", _) => return true,
        ("init", []) => client.init_streamer(),
        ("connect", [host]) => client.connect_receiver(host),
        ("disconnect", [host]) => client.disconnect_receiver(host),
        ("close", []) => client.close_streamer(),
        ("state", []) => match client.state() {
            Ok(state) => {
                writeln!(write.out(), "{:#}", state).unwrap();
                return false;
            }
            Err(err) => Err(err),
        },
        ("set", [setting, value]) => match parse_setting(setting, value) {
            Ok(setting) => client.call(&Command::Set(setting)),
            Err(message) => {
                writeln!(write.err(), "{}", message).unwrap();
                return false;
            }
        },
        _ => {
            writeln!(write.err(), "Unknown command, try `help`.").unwrap();
            return false;
        }
    };

    match result {
        Ok(response) => report(write, &response),
        Err(err) => writeln!(write.err(), "An error occurred: {}", err).unwrap(),
    }
    false
}

fn parse_setting(setting: &str, value: &str) -> Result<Setting, String> {
    fn number(value: &str) -> Result<u32, String> {
        value
            .parse()
            .map_err(|_| format!("expected a number, got `{}`", value))
    }
    fn toggle(value: &str) -> Result<Toggle, String> {
        value.parse().map_err(|err: ParseToggleError| err.to_string())
    }

    match setting {
        "framerate" => Ok(Setting::Framerate(number(value)?)),
        "quality" => Ok(Setting::Quality(number(value)?)),
        "buffer" => Ok(Setting::Buffer(number(value)?)),
        "mode" => Ok(Setting::Mode(value.to_owned())),
        "audio" => Ok(Setting::Audio(toggle(value)?)),
        "video" => Ok(Setting::Video(toggle(value)?)),
        "video-jitterbuffer" => Ok(Setting::VideoJitterbuffer(toggle(value)?)),
        "jitterbuffer-delay" => Ok(Setting::JitterbufferDelay(number(value)?)),
        "audio-jitterbuffer" | "reliable-transport" => Err(format!(
            "the {} setting is not supported by the streamer",
            setting
        )),
        _ => Err(format!("Unknown setting `{}`, try `help`.", setting)),
    }
}

fn report(write: &mut ConsoleWrite, response: &Value) {
    match response.get("result") {
        Some(result) => writeln!(write.out(), "{:#}", result).unwrap(),
        None => writeln!(write.out(), "ok").unwrap(),
    }
}

fn print_help(write: &mut ConsoleWrite) {
    let out = write.out();
    writeln!(
        out,
        "{} {}",
        Green.paint(env!("CARGO_PKG_NAME")),
        env!("CARGO_PKG_VERSION")
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", Yellow.paint("COMMANDS")).unwrap();
    writeln!(out, "    help                       View this help listing").unwrap();
    writeln!(out, "    init                       Initialize the streamer").unwrap();
    writeln!(
        out,
        "    connect {}             Attach a receiver",
        Green.paint("<HOST>")
    )
    .unwrap();
    writeln!(
        out,
        "    disconnect {}          Detach a receiver",
        Green.paint("<HOST>")
    )
    .unwrap();
    writeln!(out, "    close                      Close the streamer").unwrap();
    writeln!(out, "    state                      Print the streamer state").unwrap();
    writeln!(
        out,
        "    set {}  Change a setting",
        Green.paint("<SETTING> <VALUE>")
    )
    .unwrap();
    writeln!(out, "    quit                       Leave the session").unwrap();
}

struct ConsoleRead {
    prompt: String,
    inner: ConsoleReadInner,
}

struct ConsoleWrite {
    inner: ConsoleWriteInner,
}

enum ConsoleReadInner {
    Interactive(Readline, SharedWriter),
    Stream(Lines<StdinLock<'static>>),
}

enum ConsoleWriteInner {
    Interactive(SharedWriter),
    Stream(Stdout, Stderr),
}

// Line-edited console when attached to a terminal, plain stream IO when piped.
fn new_console(prompt: String) -> (ConsoleRead, ConsoleWrite) {
    if std::io::stdout().is_tty() {
        let (read_line, writer) = Readline::new(prompt.clone()).unwrap();
        (
            ConsoleRead {
                prompt,
                inner: ConsoleReadInner::Interactive(read_line, writer.clone()),
            },
            ConsoleWrite {
                inner: ConsoleWriteInner::Interactive(writer),
            },
        )
    } else {
        (
            ConsoleRead {
                prompt,
                inner: ConsoleReadInner::Stream(std::io::stdin().lock().lines()),
            },
            ConsoleWrite {
                inner: ConsoleWriteInner::Stream(std::io::stdout(), std::io::stderr()),
            },
        )
    }
}

impl ConsoleRead {
    fn read_line(&mut self) -> String {
        match &mut self.inner {
            ConsoleReadInner::Interactive(read, writer) => {
                let line = match futures::executor::block_on(read.readline()) {
                    Ok(line) => line,
                    Err(ReadlineError::IO(err)) => {
                        eprintln!("An error occurred: {}", err);
                        proc_exit::Code::UNKNOWN.process_exit();
                    }
                    Err(ReadlineError::Eof | ReadlineError::Closed) => {
                        proc_exit::Code::SIGHUP.process_exit()
                    }
                    Err(ReadlineError::Interrupted) => proc_exit::Code::SIGINT.process_exit(),
                };

                read.add_history_entry(line.clone());

                // echo back the line
                writeln!(writer, "{}{}", self.prompt, line).unwrap();

                line
            }
            ConsoleReadInner::Stream(stream) => match stream.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    eprintln!("An error occurred: {}", err);
                    proc_exit::Code::UNKNOWN.process_exit();
                }
                None => proc_exit::Code::SUCCESS.process_exit(),
            },
        }
    }
}

impl ConsoleWrite {
    fn out(&mut self) -> &mut dyn Write {
        match &mut self.inner {
            ConsoleWriteInner::Interactive(writer) => writer,
            ConsoleWriteInner::Stream(stdout, _) => stdout,
        }
    }

    fn err(&mut self) -> &mut dyn Write {
        match &mut self.inner {
            ConsoleWriteInner::Interactive(writer) => writer,
            ConsoleWriteInner::Stream(_, stderr) => stderr,
        }
    }
}
