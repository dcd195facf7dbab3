use std::io::Cursor;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::instrument;

use super::{Name, Networkable};
use crate::{DnsError, RecordType};

const MAX_NAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

// Internet
const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Name,
    pub type_: RecordType,
    pub class: u16,
}

impl Question {
    pub fn new(name: &str, type_: RecordType) -> Result<Self, DnsError> {
        if name.len() > MAX_NAME_LENGTH
            || name
                .trim_end_matches('.')
                .split('.')
                .any(|label| label.len() > MAX_LABEL_LENGTH)
        {
            return Err(DnsError::InvalidName(name.to_owned()));
        }

        Ok(Self {
            name: Name::new(name),
            type_,
            class: CLASS_IN,
        })
    }
}

impl Networkable for Question {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();

        ret.extend_from_slice(&self.name.to_bytes());
        ret.put_u16(self.type_.to_int());
        ret.put_u16(self.class);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = Name::from_bytes(bytes)?;

        if bytes.remaining() < 4 {
            return Err(DnsError::FormatError);
        }

        let type_ = RecordType::from_int(bytes.get_u16());
        let class = bytes.get_u16();

        Ok(Self { name, type_, class })
    }
}

#[cfg(test)]
mod tests {
    use crate::{DnsError, Question, RecordType};

    #[test]
    fn rejects_oversized_labels() {
        let label = "a".repeat(64);
        let name = format!("{label}.com");

        assert_eq!(
            Question::new(&name, RecordType::A),
            Err(DnsError::InvalidName(name))
        );
    }

    #[test]
    fn rejects_oversized_names() {
        let name = ["abcdefghij"; 24].join(".");
        assert!(name.len() > 253);
        assert!(Question::new(&name, RecordType::A).is_err());
    }

    #[test]
    fn defaults_to_internet_class() {
        let question = Question::new("example.com", RecordType::Aaaa).unwrap();
        assert_eq!(question.class, 1);
        assert_eq!(question.name.as_str(), "example.com");
    }
}
