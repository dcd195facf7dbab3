use std::fmt::Display;
use std::io::Cursor;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Networkable;
use crate::DnsError;

// Bounds how many compression pointers one name may follow, so a message
// whose pointers form a cycle is rejected instead of looping forever.
const MAX_POINTER_JUMPS: usize = 64;

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name {
    /// This is the domain name
    /// E.g. www.google.com
    pub name: String,

    /// This is a vector of all the indices where a label starts
    /// E.g. www.google.com would have a split_indices of [0, 4, 11]
    pub split_indices: Vec<usize>,
}

impl Name {
    pub fn new(name: &str) -> Self {
        let mut split_indices = vec![0];
        split_indices.extend(name.match_indices('.').filter_map(|(i, _)| {
            if i == name.len() - 1 {
                None
            } else {
                Some(i + 1)
            }
        }));

        Self {
            name: name.to_owned(),
            split_indices,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Get larger and larger subdomains, which is the order an iterative
    /// lookup has to walk them in.
    /// Eg www.google.com -> [com, google.com, www.google.com]
    pub fn iter_subdomains(&self) -> impl Iterator<Item = &str> + '_ {
        self.split_indices.iter().rev().map(|i| &self.name[*i..])
    }

    /// The zone one label up, e.g. google.com for www.google.com.
    /// Single label names have no parent.
    pub fn parent(&self) -> Option<&str> {
        self.name
            .split_once('.')
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty())
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Networkable for Name {
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();

        // A trailing dot leaves an empty final section, which is the
        // terminator written below.
        for section in self.name.split('.').filter(|s| !s.is_empty()) {
            ret.put_u8(section.len() as u8);
            ret.extend_from_slice(section.as_bytes());
        }

        ret.put_u8(0);

        ret.into()
    }

    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let mut parts: Vec<String> = Vec::new();
        let mut jumps = 0;
        let mut resume_at = None;

        loop {
            if !bytes.has_remaining() {
                return Err(DnsError::FormatError);
            }

            let len = bytes.get_u8();
            if len == 0 {
                break;
            }

            match len >> 6 {
                0b11 => {
                    // Compressed
                    if !bytes.has_remaining() {
                        return Err(DnsError::FormatError);
                    }

                    let pointer = (((len & 0b0011_1111) as u64) << 8) | (bytes.get_u8() as u64);

                    jumps += 1;
                    if jumps > MAX_POINTER_JUMPS || pointer >= bytes.get_ref().len() as u64 {
                        return Err(DnsError::FormatError);
                    }

                    resume_at.get_or_insert(bytes.position());
                    bytes.set_position(pointer);
                }
                0b00 => {
                    // Uncompressed
                    let len = len as usize;
                    if bytes.remaining() < len {
                        return Err(DnsError::FormatError);
                    }

                    let chars = bytes.copy_to_bytes(len);
                    let s = std::str::from_utf8(&chars).or(Err(DnsError::FormatError))?;
                    parts.push(s.to_owned());
                }
                // 0b01 and 0b10 are reserved label types
                _ => return Err(DnsError::FormatError),
            }
        }

        if let Some(position) = resume_at {
            bytes.set_position(position);
        }

        let name = parts.join(".");

        Ok(Self::new(&name))
    }
}
