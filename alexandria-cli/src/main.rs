// SPDX-License-Identifier: MIT OR Apache-2.0

//! `alex` encrypts and decrypts messages for multiple recipients.
//!
//! Plaintext and envelopes travel over stdin/stdout; keys are passed as
//! base58 flags or, for `pubkey`, on stdin. Exits 1 on any library or I/O
//! error and 2 on flag-parsing errors.
use std::io::{Read, Write};
use std::process;

use alexandria::{PublicKey, Rng, SecretKey};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "alex", version, about = "Encrypt and decrypt messages for multiple recipients")]
struct Args {
    /// Print debug information on stderr.
    #[arg(short = 'd', long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new private key.
    Genkey,

    /// Derive the public key from a private key read on stdin.
    Pubkey,

    /// Encrypt stdin towards the given recipients.
    #[command(alias = "enc")]
    Encrypt {
        /// Sender private key, base58.
        #[arg(short = 'k', long = "key", value_name = "PRIVATE_KEY")]
        key: String,

        /// Recipient public key, base58; repeat for multiple recipients.
        #[arg(short = 'r', long = "recipient", value_name = "PUBLIC_KEY")]
        recipients: Vec<String>,

        /// Write an armored text envelope instead of binary.
        #[arg(short = 'a', long)]
        armor: bool,
    },

    /// Decrypt an envelope from stdin; armor is detected automatically.
    #[command(alias = "dec")]
    Decrypt {
        /// Recipient private key, base58.
        #[arg(short = 'k', long = "key", value_name = "PRIVATE_KEY")]
        key: String,
    },

    /// Print version information.
    Version,
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .try_init()
        .ok();
}

fn main() {
    let args = Args::parse();

    if args.debug {
        setup_logging();
    }

    if let Err(err) = run(args.command) {
        eprintln!("alex: {err:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let rng = Rng::default();

    match command {
        Command::Genkey => {
            let key = SecretKey::generate(&rng)?;
            println!("{}", key.to_base58());
        }
        Command::Pubkey => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("could not read private key from stdin")?;
            let key = SecretKey::from_base58(input.trim())?;
            println!("{}", key.public_key());
        }
        Command::Encrypt {
            key,
            recipients,
            armor,
        } => {
            let key = SecretKey::from_base58(&key)?;
            let recipients = recipients
                .iter()
                .map(|value| PublicKey::from_base58(value))
                .collect::<Result<Vec<_>, _>>()?;
            if recipients.is_empty() {
                eprintln!("alex: no recipient specified, defaulting to own key");
            }
            debug!(sender = %key.public_key(), recipients = recipients.len(), "encrypting");

            let plaintext = read_stdin()?;
            let envelope = alexandria::encrypt(&plaintext, &key, &recipients, &rng)?;
            if armor {
                println!("{}", alexandria::armor(&envelope));
            } else {
                write_stdout(&envelope)?;
            }
        }
        Command::Decrypt { key } => {
            let key = SecretKey::from_base58(&key)?;
            debug!(recipient = %key.public_key(), "decrypting");

            let input = read_stdin()?;
            let envelope = match std::str::from_utf8(&input) {
                Ok(text) if alexandria::is_armored(text) => alexandria::dearmor(text)?,
                _ => input,
            };
            let plaintext = alexandria::decrypt(&envelope, &key)?;
            write_stdout(&plaintext)?;
        }
        Command::Version => {
            println!("alex version: {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("could not read stdin")?;
    Ok(buf)
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes).context("could not write stdout")?;
    stdout.flush().context("could not flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Args;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }
}
