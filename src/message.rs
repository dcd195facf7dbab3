use std::io::Cursor;

use bytes::{Bytes, BytesMut};
use tracing::instrument;

use super::{Header, Networkable, Question, ResourceRecord};
use crate::DnsError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    pub fn add_question(&mut self, question: Question) {
        self.header.num_questions += 1;
        self.questions.push(question)
    }

    pub fn add_answer(&mut self, answer: ResourceRecord) {
        self.header.num_answers += 1;
        self.answers.push(answer)
    }

    pub fn add_authority(&mut self, authority: ResourceRecord) {
        self.header.num_authorities += 1;
        self.authorities.push(authority)
    }

    pub fn add_additional(&mut self, additional: ResourceRecord) {
        self.header.num_additionals += 1;
        self.additionals.push(additional)
    }

    /// Every record of the answer, authority and additional sections, in
    /// that order
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }
}

fn parse_records(
    count: u16,
    bytes: &mut Cursor<&[u8]>,
) -> Result<Vec<ResourceRecord>, DnsError> {
    (0..count)
        .map(|_| ResourceRecord::from_bytes(bytes))
        .collect()
}

impl Networkable for Message {
    #[instrument(level = "debug", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut response = BytesMut::new();
        response.extend_from_slice(&self.header.to_bytes());

        for question in self.questions.iter() {
            response.extend_from_slice(&question.to_bytes())
        }

        for record in self.records() {
            response.extend_from_slice(&record.to_bytes())
        }

        response.into()
    }

    #[instrument(level = "debug", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let header = Header::from_bytes(bytes)?;

        let questions = (0..header.num_questions)
            .map(|_| Question::from_bytes(bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let answers = parse_records(header.num_answers, bytes)?;
        let authorities = parse_records(header.num_authorities, bytes)?;
        let additionals = parse_records(header.num_additionals, bytes)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::net::{Ipv4Addr, Ipv6Addr};

    use crate::{
        Flags, Header, Message, Name, Networkable, Question, RecordData, RecordType,
        ResourceRecord,
    };

    #[test]
    fn parses_referral() {
        let mut flags = Flags::default();
        flags.set_qr(true);

        let mut message = Message::new(Header::new(0x1234, flags));
        message.add_question(Question::new("example.com", RecordType::A).unwrap());
        message.add_authority(ResourceRecord::new(
            "example.com",
            RecordType::Ns,
            3600,
            RecordData::Ns(Name::new("a.iana-servers.net")),
        ));
        message.add_additional(ResourceRecord::new(
            "a.iana-servers.net",
            RecordType::A,
            3600,
            RecordData::A(Ipv4Addr::new(199, 43, 135, 53)),
        ));
        message.add_additional(ResourceRecord::new(
            "a.iana-servers.net",
            RecordType::Aaaa,
            3600,
            RecordData::Aaaa(Ipv6Addr::new(0x2001, 0x500, 0x8f, 0, 0, 0, 0, 0x53)),
        ));

        let bytes = message.to_bytes();
        let parsed = Message::from_bytes(&mut Cursor::new(&bytes[..])).unwrap();

        assert_eq!(parsed.header.num_authorities, 1);
        assert_eq!(parsed.header.num_additionals, 2);
        assert_eq!(parsed, message);

        let types: Vec<RecordType> = parsed.records().map(|r| r.type_).collect();
        assert_eq!(types, [RecordType::Ns, RecordType::A, RecordType::Aaaa]);
    }

    #[test]
    fn rejects_missing_records() {
        let mut header = Header::new(1, Default::default());
        header.num_answers = 1;

        let bytes = header.to_bytes();
        assert!(Message::from_bytes(&mut Cursor::new(&bytes[..])).is_err());
    }
}
