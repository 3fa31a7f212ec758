// File signature (magic byte) rules over byte streams

use crate::rule::{Check, Outcome};
use crate::value::ByteStream;
use crate::Value;
use std::io;

/// Leading and trailing byte patterns identifying a file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub start: &'static [u8],
    pub end: &'static [u8],
}

pub const JPG: Signature = Signature {
    name: "JPG",
    start: &[0xFF, 0xD8, 0xFF, 0xE0],
    end: &[0xFF, 0xD9],
};

pub const PNG: Signature = Signature {
    name: "PNG",
    start: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    end: &[],
};

pub const GIF87A: Signature = Signature {
    name: "GIF",
    start: &[0x47, 0x49, 0x46, 0x38, 0x37, 0x61],
    end: &[],
};

pub const GIF89A: Signature = Signature {
    name: "GIF",
    start: &[0x47, 0x49, 0x46, 0x38, 0x39, 0x61],
    end: &[],
};

enum Mismatch {
    Bytes,
    NotSeekable,
}

impl Signature {
    /// `head` holds the first bytes of `stream`, at least as many as any
    /// alternative's start pattern when the stream is long enough.
    fn matches(&self, head: &[u8], stream: &ByteStream) -> io::Result<Result<(), Mismatch>> {
        if !head.starts_with(self.start) {
            return Ok(Err(Mismatch::Bytes));
        }
        if !self.end.is_empty() {
            match stream.read_tail(self.end.len())? {
                Err(_) => return Ok(Err(Mismatch::NotSeekable)),
                Ok(tail) if tail.as_deref() != Some(self.end) => return Ok(Err(Mismatch::Bytes)),
                Ok(_) => {}
            }
        }
        Ok(Ok(()))
    }
}

/// Input stream must carry one of the given signatures.
///
/// Alternatives are tried in order; the first match wins. Null passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSignature {
    name: &'static str,
    accepted: Vec<Signature>,
}

impl FileSignature {
    pub fn new(signature: Signature) -> Self {
        Self {
            name: signature.name,
            accepted: vec![signature],
        }
    }

    /// Accept any of several signatures reported under one format name.
    pub fn any_of(name: &'static str, accepted: impl IntoIterator<Item = Signature>) -> Self {
        Self {
            name,
            accepted: accepted.into_iter().collect(),
        }
    }

    pub fn jpg() -> Self {
        Self::new(JPG)
    }

    pub fn png() -> Self {
        Self::new(PNG)
    }

    pub fn gif() -> Self {
        Self::any_of("GIF", [GIF87A, GIF89A])
    }
}

impl Check for FileSignature {
    fn check(&self, input: &Value) -> Outcome {
        let stream = match input {
            Value::Null => return Outcome::Valid,
            Value::Stream(stream) => stream,
            _ => return Outcome::fail("must be a Stream"),
        };
        // Forward-only streams cannot be rewound, so the head is read once
        // and shared by every alternative.
        let longest = self.accepted.iter().map(|s| s.start.len()).max().unwrap_or(0);
        let head = match stream.read_prefix(longest) {
            Ok(head) => head,
            Err(e) => {
                tracing::debug!(target: "palisade::rule", format = self.name, error = %e, "stream read failed");
                return Outcome::fail(format!("is not a valid {}", self.name));
            }
        };

        let mut not_seekable = false;
        for signature in &self.accepted {
            match signature.matches(&head, stream) {
                Ok(Ok(())) => return Outcome::Valid,
                Ok(Err(Mismatch::NotSeekable)) => not_seekable = true,
                Ok(Err(Mismatch::Bytes)) => {}
                Err(e) => {
                    tracing::debug!(target: "palisade::rule", format = self.name, error = %e, "stream read failed");
                }
            }
        }
        if not_seekable {
            Outcome::fail("is not a seekable stream and cannot be validated")
        } else {
            Outcome::fail(format!("is not a valid {}", self.name))
        }
    }

    fn name(&self) -> &str {
        "file_signature"
    }
}
