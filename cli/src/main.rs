//! Interactive terminal host for the contacts manager.
//!
//! Reads one command per line from stdin, applies it to a
//! `ContactsManager`, executes whatever request that produces, and prints
//! the re-rendered screen. Logs go to stderr.

mod repl;
mod transport;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use contacts_core::{render, Command, ContactsClient, ContactsManager, Outgoing};
use tracing_subscriber::EnvFilter;

use repl::{parse_line, to_command, Input};
use transport::Transport;

#[derive(Parser, Debug)]
#[command(name = "contacts")]
#[command(about = "Manage your contacts against a contacts API")]
struct Cli {
    /// Base URL of the API; `/api/contacts/...` is appended.
    #[arg(long, env = "CONTACTS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Bearer token. Without one the list stays empty until `login`.
    #[arg(long, env = "CONTACTS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CONTACTS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

struct Host {
    manager: ContactsManager,
    transport: Transport,
}

impl Host {
    /// Apply a command and, if it needs the network, run it to completion.
    fn apply(&mut self, command: Command) {
        match self.manager.dispatch(command) {
            Ok(Some(outgoing)) => self.run(outgoing),
            Ok(None) => {}
            Err(err) => println!("! {err}"),
        }
    }

    fn run(&mut self, outgoing: Outgoing) {
        let Outgoing { ticket, request } = outgoing;
        let outcome = self.transport.execute(request);
        self.manager.resolve(ticket, outcome);
    }

    fn show(&self) {
        print!("{}", render(&self.manager));
        // A failed flush only delays output.
        let _ = io::stdout().flush();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ContactsClient::new(&cli.base_url).context("configuring API client")?;
    let mut host = Host {
        manager: ContactsManager::new(client),
        transport: Transport::new(Duration::from_secs(cli.timeout_secs)),
    };
    tracing::info!(base_url = %cli.base_url, "contacts client started");

    if cli.token.is_some() {
        host.apply(Command::SetCredential(cli.token));
    }
    host.show();

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(err) => {
                println!("! {err}");
                continue;
            }
        };
        match input {
            Input::Quit => break,
            Input::Help => {
                println!("{}", repl::HELP);
                continue;
            }
            _ => {}
        }
        match to_command(input, &render(&host.manager)) {
            Ok(Some(command)) => host.apply(command),
            Ok(None) => {}
            Err(err) => println!("! {err}"),
        }
        host.show();
    }
    Ok(())
}
