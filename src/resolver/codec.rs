use std::io::Cursor;

use bytes::Bytes;
use itres::{DnsError, Flags, Header, Message, Networkable, Question, RecordType};

/// An encoded query along with the transaction id its response must echo
#[derive(Debug, Clone)]
pub struct Query {
    pub id: u16,
    pub bytes: Bytes,
}

/// Turns questions into request datagrams and response datagrams into
/// messages
pub trait Codec: Send {
    fn encode_query(&self, name: &str, type_: RecordType) -> Result<Query, DnsError>;

    fn decode_response(&self, bytes: &[u8]) -> Result<Message, DnsError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl Codec for WireCodec {
    fn encode_query(&self, name: &str, type_: RecordType) -> Result<Query, DnsError> {
        let question = Question::new(name, type_)?;

        // Recursion desired stays cleared, every server gets asked directly
        let mut flags = Flags::default();
        flags.set_rd(false);

        let id = rand::random::<u16>();
        let mut query = Message::new(Header::new(id, flags));
        query.add_question(question);

        Ok(Query {
            id,
            bytes: query.to_bytes(),
        })
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Message, DnsError> {
        Message::from_bytes(&mut Cursor::new(bytes))
    }
}
