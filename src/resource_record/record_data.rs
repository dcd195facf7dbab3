use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{Buf, Bytes};
use tracing::trace;

use crate::{DnsError, Name, Networkable, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(Name),
    Cname(Name),
    Aaaa(Ipv6Addr),
    /// Raw rdata of every type this resolver doesn't interpret
    Other(Bytes),
}

impl RecordData {
    pub fn from_bytes(
        type_: RecordType,
        rd_length: u16,
        bytes: &mut Cursor<&[u8]>,
    ) -> Result<Self, DnsError> {
        let rd_length = rd_length as usize;
        if bytes.remaining() < rd_length {
            return Err(DnsError::FormatError);
        }

        let end = bytes.position() + rd_length as u64;

        let data = match type_ {
            RecordType::A => {
                if rd_length != 4 {
                    return Err(DnsError::FormatError);
                }
                Self::A(bytes.get_u32().into())
            }
            RecordType::Aaaa => {
                if rd_length != 16 {
                    return Err(DnsError::FormatError);
                }
                Self::Aaaa(bytes.get_u128().into())
            }
            RecordType::Ns => Self::Ns(Name::from_bytes(bytes)?),
            RecordType::Cname => Self::Cname(Name::from_bytes(bytes)?),
            other => {
                trace!("keeping raw record data of type {}", other);
                Self::Other(bytes.copy_to_bytes(rd_length))
            }
        };

        // A name inside rdata must not run past the record
        if bytes.position() > end {
            return Err(DnsError::FormatError);
        }
        bytes.set_position(end);

        Ok(data)
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::A(data) => Bytes::copy_from_slice(&data.octets()),
            Self::Ns(data) => data.to_bytes(),
            Self::Cname(data) => data.to_bytes(),
            Self::Aaaa(data) => Bytes::copy_from_slice(&data.octets()),
            Self::Other(data) => data.clone(),
        }
    }
}
