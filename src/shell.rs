use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use itertools::Itertools;
use itres::cache::{Addresses, RecordCache, RemoveStatus, Table};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::resolver::codec::Codec;
use crate::resolver::transport::Transport;
use crate::resolver::{Lookup, Outcome, Resolver};

const PROMPT: &str = "Enter a domain name or .exit > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Clear,
    List,
    Remove(Option<&'a str>),
    Lookup(&'a str),
}

impl<'a> Command<'a> {
    /// Blank lines aren't commands
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        let mut words = line.split_whitespace();

        let command = match words.next()? {
            ".exit" => Self::Exit,
            ".clear" => Self::Clear,
            ".list" => Self::List,
            ".remove" => Self::Remove(words.next()),
            _ => Self::Lookup(line),
        };

        Some(command)
    }
}

pub struct Shell<T, C, W> {
    resolver: Resolver<T, C>,
    cache: Arc<Mutex<RecordCache>>,
    out: W,
}

impl<T: Transport, C: Codec, W: Write> Shell<T, C, W> {
    pub fn new(resolver: Resolver<T, C>, out: W) -> Self {
        let cache = resolver.cache();

        Self {
            resolver,
            cache,
            out,
        }
    }

    /// Reads commands until `.exit` or the end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let mut lines = input.lines();

        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Command::parse(&line) {
                None => continue,
                Some(Command::Exit) => break,
                Some(command) => self.execute(command).await?,
            }
        }

        Ok(())
    }

    pub async fn execute(&mut self, command: Command<'_>) -> io::Result<()> {
        debug!(?command, "executing");

        match command {
            Command::Exit => Ok(()),
            Command::Clear => {
                let dropped = self.lock_cache().clear();
                writeln!(self.out, "\tAll cache cleared ({dropped} entries removed).")
            }
            Command::List => self.list(),
            Command::Remove(Some(name)) => self.remove(name),
            Command::Remove(None) => writeln!(self.out, "\tUsage: .remove <name>"),
            Command::Lookup(name) => {
                let lookup = self.resolver.resolve(name).await;
                self.report(&lookup)
            }
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, RecordCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn list(&mut self) -> io::Result<()> {
        let (a, ns, aaaa) = {
            let cache = self.lock_cache();
            (
                format_table(&cache.a),
                format_table(&cache.ns),
                format_table(&cache.aaaa),
            )
        };

        writeln!(self.out, "\tCached IPv4 Addresses: {a}")?;
        writeln!(self.out, "\tCached Name Servers: {ns}")?;
        writeln!(self.out, "\tCached IPv6 Addresses: {aaaa}")
    }

    fn remove(&mut self, name: &str) -> io::Result<()> {
        let removal = self.lock_cache().remove_name(name);

        let lines = [
            (removal.a, "IP address"),
            (removal.ns, "name server"),
            (removal.aaaa, "IPv6 address"),
        ];

        for (status, what) in lines {
            match status {
                RemoveStatus::Removed => {
                    writeln!(self.out, "\tSuccessfully removed {what} from cache.")?
                }
                RemoveStatus::NotStored => {
                    writeln!(self.out, "\t{} not stored.", capitalize(what))?
                }
            }
        }

        Ok(())
    }

    fn report(&mut self, lookup: &Lookup) -> io::Result<()> {
        for server in lookup.consulted.iter() {
            writeln!(self.out, "\tConsulted {server}")?;
        }

        match &lookup.outcome {
            Outcome::Cached(addresses) => {
                writeln!(
                    self.out,
                    "\t{} (saved in cache)",
                    format_addresses(&lookup.name, addresses)
                )
            }
            Outcome::Resolved(addresses) => {
                writeln!(self.out, "\t{}", format_addresses(&lookup.name, addresses))
            }
            Outcome::Unrecognized { label } => {
                writeln!(self.out, "\t{label} unrecognized")?;
                self.not_retrieved(&lookup.name)
            }
            Outcome::Unresolved => self.not_retrieved(&lookup.name),
        }
    }

    fn not_retrieved(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "\tCould not retrieve IPv4 address for {name}.")
    }
}

fn format_addresses(name: &str, addresses: &Addresses) -> String {
    match addresses.ipv6 {
        Some(ipv6) => format!("{name}: {}, IPv6: {ipv6}", addresses.ipv4),
        None => format!("{name}: {}", addresses.ipv4),
    }
}

fn format_table<V: std::fmt::Display>(table: &Table<V>) -> String {
    format!(
        "{{{}}}",
        table.iter().map(|(name, value)| format!("{name}: {value}")).join(", ")
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
