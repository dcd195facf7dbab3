use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use itres::cache::{Addresses, Ipv4Entry, RecordCache};
use itres::{DnsError, Message, Name, RecordData, RecordType, ResourceRecord, RCODE_NO_ERROR};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;

pub mod codec;
use codec::{Codec, Query, WireCodec};

pub mod transport;
use transport::Transport;

/// Why a single label of a lookup could not be resolved
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("server answered with response code {0}")]
    ServerError(u8),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("could not build query: {0}")]
    Query(#[from] DnsError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The name was already cached, nothing was sent
    Cached(Addresses),
    Resolved(Addresses),
    /// A label along the chain failed and the lookup was abandoned there
    Unrecognized { label: String },
    /// Every label was queried but nobody handed out an address for the name
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub name: String,
    /// Servers queried, in order
    pub consulted: Vec<String>,
    pub outcome: Outcome,
}

pub struct Resolver<T, C = WireCodec> {
    transport: T,
    codec: C,
    cache: Arc<Mutex<RecordCache>>,
    config: Config,
}

impl<T: Transport, C: Codec> Resolver<T, C> {
    pub fn new(transport: T, codec: C, cache: Arc<Mutex<RecordCache>>, config: Config) -> Self {
        Self {
            transport,
            codec,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> Arc<Mutex<RecordCache>> {
        Arc::clone(&self.cache)
    }

    fn lock_cache(&self) -> MutexGuard<'_, RecordCache> {
        // Nothing panics while holding the lock, but a poisoned cache is
        // still consistent since every write is a single map operation
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves `name` by walking down from its top level label, asking the
    /// nameserver cached for each parent zone (or the root server when there
    /// is none) about every increasingly qualified suffix.
    #[instrument(skip(self))]
    pub async fn resolve(&mut self, name: &str) -> Lookup {
        let mut consulted = Vec::new();

        if let Some(addresses) = self.lock_cache().addresses(name) {
            debug!("answered from cache");
            return Lookup {
                name: name.to_owned(),
                consulted,
                outcome: Outcome::Cached(addresses),
            };
        }

        let chain = Name::new(name);
        for label in chain.iter_subdomains() {
            if let Err(err) = self.resolve_label(label, &mut consulted).await {
                warn!(%label, %err, "label could not be resolved");
                self.lock_cache().mark_unresolvable(label);
            }

            let mut cache = self.lock_cache();
            if cache.is_unresolvable(label) {
                // Forget the failure so the next lookup tries again
                cache.a.remove(label);

                return Lookup {
                    name: name.to_owned(),
                    consulted,
                    outcome: Outcome::Unrecognized {
                        label: label.to_owned(),
                    },
                };
            }
        }

        let outcome = match self.lock_cache().addresses(name) {
            Some(addresses) => Outcome::Resolved(addresses),
            None => Outcome::Unresolved,
        };
        info!(?outcome, "lookup finished");

        Lookup {
            name: name.to_owned(),
            consulted,
            outcome,
        }
    }

    async fn resolve_label(
        &mut self,
        label: &str,
        consulted: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        let server = {
            let zone = Name::new(label);
            let cache = self.lock_cache();

            zone.parent()
                .and_then(|parent| cache.ns.get(parent))
                .cloned()
                .unwrap_or_else(|| self.config.root_server.clone())
        };

        self.query(label, &server, consulted).await?;

        // Some servers only hand out a delegation, ask the delegated
        // nameserver directly
        let delegated = {
            let cache = self.lock_cache();
            if cache.a.contains(label) {
                None
            } else {
                cache.ns.get(label).cloned()
            }
        };

        if let Some(server) = delegated {
            debug!(%label, %server, "following delegation");
            self.query(label, &server, consulted).await?;
        }

        Ok(())
    }

    /// Sends a single non-recursive A query for `label` and caches what the
    /// response teaches us
    async fn query(
        &mut self,
        label: &str,
        server: &str,
        consulted: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        let query = self.codec.encode_query(label, RecordType::A)?;
        consulted.push(server.to_owned());
        debug!(%label, %server, id = query.id, "consulting");

        // The deadline covers sending too, which may have to look up the
        // nameserver's address first
        let exchange = Self::exchange(&mut self.transport, &self.codec, server, &query);
        let response = match timeout(self.config.timeout, exchange).await {
            Ok(response) => response?,
            Err(_) => return Err(ResolveError::Timeout(self.config.timeout)),
        };

        let rcode = response.header.flags.rcode();
        if rcode != RCODE_NO_ERROR {
            return Err(ResolveError::ServerError(rcode));
        }

        cache_response(&mut self.lock_cache(), label, &response);

        Ok(())
    }

    /// Sends `query` and waits for the response carrying its id. Anything
    /// else that shows up in the meantime is dropped.
    async fn exchange(
        transport: &mut T,
        codec: &C,
        server: &str,
        query: &Query,
    ) -> Result<Message, ResolveError> {
        transport.send(server, &query.bytes).await?;
        let id = query.id;

        loop {
            let raw = transport.receive().await?;

            match codec.decode_response(&raw) {
                Ok(message) if message.header.id == id => return Ok(message),
                Ok(message) => debug!(
                    expected = id,
                    received = message.header.id,
                    "discarding unmatched response"
                ),
                Err(err) => debug!(%err, "discarding malformed response"),
            }
        }
    }
}

/// Files the records of a response under the label that was asked about.
/// Sections are scanned answer, authority, additional, and nothing already
/// cached gets replaced.
fn cache_response(cache: &mut RecordCache, label: &str, response: &Message) {
    for record in response.answers.iter() {
        cache_address(cache, label, record);
    }

    for record in response.authorities.iter() {
        if let RecordData::Ns(ref nameserver) = record.data {
            cache.ns.put(label, nameserver.to_string());
        }
    }

    for record in response.additionals.iter() {
        cache_address(cache, label, record);
    }
}

fn cache_address(cache: &mut RecordCache, label: &str, record: &ResourceRecord) {
    match record.data {
        RecordData::Aaaa(addr) => {
            cache.aaaa.put(label, addr);
        }
        RecordData::A(addr) if !record.name.as_str().is_empty() => {
            // The owner of the address record is the server that answers
            // for the label from now on
            if cache.a.put(label, Ipv4Entry::Address(addr)) {
                cache.ns.put(label, record.name.to_string());
            }
        }
        _ => {}
    }
}
