use std::io::Cursor;

use bitfield::bitfield;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{instrument, warn};

use super::Networkable;
use crate::DnsError;

bitfield! {
    /// The second 16 bits of the header, most significant bit first
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Flags(u16);
    impl Debug;
    u8;
    pub qr, set_qr: 15;
    pub opcode, set_opcode: 14, 11;
    pub aa, set_aa: 10;
    pub tc, set_tc: 9;
    // Cleared in every query this resolver sends
    pub rd, set_rd: 8;
    pub ra, set_ra: 7;
    pub z, set_z: 6;
    pub ad, set_ad: 5;
    pub cd, set_cd: 4;
    pub rcode, set_rcode: 3, 0;
}

impl Networkable for Flags {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.0.to_be_bytes())
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        if bytes.remaining() < 2 {
            return Err(DnsError::FormatError);
        }

        Ok(Self(bytes.get_u16()))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub num_questions: u16,
    pub num_answers: u16,
    pub num_authorities: u16,
    pub num_additionals: u16,
}

impl Header {
    pub fn new(id: u16, flags: Flags) -> Self {
        Self {
            id,
            flags,
            ..Default::default()
        }
    }
}

impl Networkable for Header {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::with_capacity(12);
        ret.put_u16(self.id);
        ret.extend_from_slice(&self.flags.to_bytes());
        ret.put_u16(self.num_questions);
        ret.put_u16(self.num_answers);
        ret.put_u16(self.num_authorities);
        ret.put_u16(self.num_additionals);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        if bytes.remaining() < 12 {
            warn!(len = bytes.remaining(), "message shorter than a header");
            return Err(DnsError::FormatError);
        }

        Ok(Self {
            id: bytes.get_u16(),
            flags: Flags::from_bytes(bytes)?,
            num_questions: bytes.get_u16(),
            num_answers: bytes.get_u16(),
            num_authorities: bytes.get_u16(),
            num_additionals: bytes.get_u16(),
        })
    }
}
