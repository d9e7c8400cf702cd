//! A full DNS message: header plus question/answer/authority/additional
//! sections (RFC 1035 §4.1). This is the unit the transport exchanges.
use std::io::Cursor;

use rand::Rng;

use crate::error::DNSResult;

use super::header::{Flags, Header, OpCode, ResponseCode};
use super::question::{QClass, QType, Question};
use super::record::ResourceRecord;
use super::{Name, ToFromNetworkOrder};

pub const MAX_MESSAGE_SIZE: usize = 65535;

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Builds a fresh outbound query: random 16-bit id, one question,
    /// `rd` copied from the caller (spec §4.1 point 1).
    pub fn query(name: &Name, qtype: QType, qclass: QClass, recursion_desired: bool) -> Self {
        let id = rand::thread_rng().gen::<u16>();

        let header = Header {
            id,
            flags: Flags {
                is_response: false,
                op_code: OpCode::Query,
                recursion_desired,
                ..Default::default()
            },
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        };

        Message {
            header,
            questions: vec![Question {
                name: name.clone(),
                qtype,
                qclass,
            }],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn to_network_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.header.to_network_bytes(&mut buffer)?;
        for question in &self.questions {
            question.to_network_bytes(&mut buffer)?;
        }
        for rr in self
            .answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
        {
            rr.to_network_bytes(&mut buffer)?;
        }
        Ok(buffer)
    }

    pub fn from_network_bytes(bytes: &[u8]) -> DNSResult<Self> {
        let mut cursor = Cursor::new(bytes);

        let mut header = Header::default();
        header.from_network_bytes(&mut cursor)?;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        for _ in 0..header.qd_count {
            let mut question = Question::default();
            question.from_network_bytes(&mut cursor)?;
            questions.push(question);
        }

        let mut answers = Vec::with_capacity(header.an_count as usize);
        for _ in 0..header.an_count {
            answers.push(ResourceRecord::from_network_bytes(&mut cursor)?);
        }

        let mut authorities = Vec::with_capacity(header.ns_count as usize);
        for _ in 0..header.ns_count {
            authorities.push(ResourceRecord::from_network_bytes(&mut cursor)?);
        }

        let mut additionals = Vec::with_capacity(header.ar_count as usize);
        for _ in 0..header.ar_count {
            additionals.push(ResourceRecord::from_network_bytes(&mut cursor)?);
        }

        Ok(Message {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}
