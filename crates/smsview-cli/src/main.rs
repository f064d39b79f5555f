// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod render;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::{Loader, ViewRequest, apply_view};
use smsview_app::{AppCommand, AppState, ConversationKey, MessageId};
use smsview_fetch::Source;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `smsview --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_filter());

    let input = options.input.as_ref().ok_or_else(|| {
        anyhow!("no export given; pass --file <path> or --url <url-or-key> (see --help)")
    })?;
    let source = input.source()?;
    debug!(%source, "resolved input");

    let loader = Loader::new(&config).with_context(|| {
        format!(
            "invalid [fetch] config in {}",
            options.config_path.display()
        )
    })?;
    let messages = loader.load_messages(&source)?;

    let mut state = AppState::default();
    state.dispatch(AppCommand::SetMessages(messages));
    apply_view(&mut state, &options.view)?;

    if !options.json {
        render::render_status(&state, &mut io::stderr())?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render_state(&state, options.json, &mut out)?;
    out.flush().context("flush stdout")?;
    Ok(())
}

fn init_logging(config_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    File(PathBuf),
    Url(String),
}

impl Input {
    fn source(&self) -> Result<Source> {
        match self {
            Self::File(path) => Ok(Source::file(path)),
            Self::Url(raw) => Source::detect(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    input: Option<Input>,
    view: ViewRequest,
    json: bool,
    print_config_path: bool,
    print_example: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        input: None,
        view: ViewRequest::default(),
        json: false,
        print_config_path: false,
        print_example: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let flag = arg.as_ref();
        let mut value = |what: &str| {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match flag {
            "--config" => {
                options.config_path = PathBuf::from(value("a file path")?);
            }
            "--file" => {
                set_input(&mut options, Input::File(PathBuf::from(value("a file path")?)))?;
            }
            "--url" => {
                set_input(&mut options, Input::Url(value("a URL or pastebin key")?))?;
            }
            "--search" => {
                options.view.search = Some(value("a search term")?);
            }
            "--conversation" => {
                options.view.conversation = Some(ConversationKey::new(value("a conversation key")?));
            }
            "--thread-search" => {
                options.view.thread_search = Some(value("a search term")?);
            }
            "--window" => {
                options.view.window = Some(parse_count(flag, &value("a message count")?)?);
            }
            "--more" => {
                options.view.more = parse_count(flag, &value("a page count")?)?;
            }
            "--jump" => {
                options.view.jump = Some(MessageId::new(value("a message id")?));
            }
            "--json" => {
                options.json = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn set_input(options: &mut CliOptions, input: Input) -> Result<()> {
    if options.input.is_some() {
        return Err(anyhow!("pass only one of --file or --url"));
    }
    options.input = Some(input);
    Ok(())
}

fn parse_count(flag: &str, raw: &str) -> Result<usize> {
    raw.parse()
        .with_context(|| format!("{flag} expects a non-negative integer, got {raw:?}"))
}

fn print_help() {
    println!("smsview - browse exported SMS messages");
    println!("  --file <path>            Load an export from a local JSON file");
    println!("  --url <url-or-key>       Load from Pastebin, GitHub, Internet Archive or a JSON URL");
    println!("  --search <term>          List messages matching a term instead of conversations");
    println!("  --conversation <key>     Show one conversation thread");
    println!("  --thread-search <term>   Filter the open thread");
    println!("  --window <n>             Show at least n messages of the thread");
    println!("  --more <k>               Load k more pages of 50 messages");
    println!("  --jump <id>              Open the thread holding a message and show it");
    println!("  --json                   Print JSON instead of text");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --help                   Show this help");
}
