use std::io::Cursor;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::instrument;

use super::{Name, Networkable};
use crate::{DnsError, RecordType};

mod record_data;
pub use record_data::RecordData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub type_: RecordType,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: &str, type_: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: Name::new(name),
            type_,
            class: 1,
            ttl,
            data,
        }
    }
}

impl Networkable for ResourceRecord {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();
        ret.extend_from_slice(&self.name.to_bytes());
        ret.put_u16(self.type_.to_int());
        ret.put_u16(self.class);
        ret.put_u32(self.ttl);
        let data = self.data.to_bytes();
        ret.put_u16(data.len() as u16);
        ret.extend_from_slice(&data);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = Name::from_bytes(bytes)?;

        if bytes.remaining() < 10 {
            return Err(DnsError::FormatError);
        }

        let type_ = RecordType::from_int(bytes.get_u16());
        let class = bytes.get_u16();
        let ttl = bytes.get_u32();
        let data_length = bytes.get_u16();

        let data = RecordData::from_bytes(type_, data_length, bytes)?;

        Ok(Self {
            name,
            type_,
            class,
            ttl,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::net::Ipv4Addr;

    use bytes::Bytes;

    use crate::{Name, Networkable, RecordData, RecordType, ResourceRecord};

    #[test]
    fn parses_ns_record_with_compressed_target() {
        // "com" at offset 0, then a record owned by "com" pointing at
        // "a.gtld-servers.net" whose "net" suffix is spelled out
        let mut raw = b"\x03com\x00".to_vec();
        raw.extend_from_slice(b"\xc0\x00\x00\x02\x00\x01\x00\x02\xa3\x00\x00\x14");
        raw.extend_from_slice(b"\x01a\x0cgtld-servers\x03net\x00");

        let mut cursor = Cursor::new(&raw[..]);
        cursor.set_position(5);

        let record = ResourceRecord::from_bytes(&mut cursor).unwrap();
        assert_eq!(record.name.as_str(), "com");
        assert_eq!(record.type_, RecordType::Ns);
        assert_eq!(record.ttl, 172800);
        assert_eq!(record.data, RecordData::Ns(Name::new("a.gtld-servers.net")));
        assert_eq!(cursor.position(), raw.len() as u64);
    }

    #[test]
    fn rejects_bad_address_length() {
        let raw = b"\x00\x00\x01\x00\x01\x00\x00\x00\x10\x00\x03\x01\x02\x03";
        assert!(ResourceRecord::from_bytes(&mut Cursor::new(&raw[..])).is_err());
    }

    #[test]
    fn keeps_unknown_rdata_verbatim() {
        let record = ResourceRecord::new(
            "example.com",
            RecordType::Unknown(99),
            60,
            RecordData::Other(Bytes::from_static(b"\x01\x02\x03")),
        );
        let bytes = record.to_bytes();

        let parsed = ResourceRecord::from_bytes(&mut Cursor::new(&bytes[..])).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn encodes_a_record() {
        let record = ResourceRecord::new(
            "a",
            RecordType::A,
            1,
            RecordData::A(Ipv4Addr::new(10, 0, 0, 1)),
        );

        assert_eq!(
            &record.to_bytes()[..],
            b"\x01a\x00\x00\x01\x00\x01\x00\x00\x00\x01\x00\x04\x0a\x00\x00\x01"
        );
    }
}
