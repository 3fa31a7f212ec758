// Input values accepted by every rule

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A dynamically typed input value.
///
/// Rules pattern-match on the variants they understand and treat anything
/// else as a parse failure.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Guid(Uuid),
    Stream(ByteStream),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `true` for `Null` and for empty text.
    pub fn is_null_or_empty_text(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Textual rendering of scalar values.
    ///
    /// Lists, streams and `Null` have no textual form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s)),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Decimal(d) => Some(Cow::Owned(d.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "True" } else { "False" })),
            Value::Date(d) => Some(Cow::Owned(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
            Value::Guid(g) => Some(Cow::Owned(g.to_string())),
            Value::Null | Value::Stream(_) | Value::List(_) => None,
        }
    }

    /// Length in characters for text, in items for lists.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Null | Value::Stream(_) => None,
            other => other.as_text().map(|s| s.chars().count()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Guid(_) => "guid",
            Value::Stream(_) => "stream",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Stream(_) => f.write_str("<stream>"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            other => match other.as_text() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}

/// Snapshot a borrowed host value into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! to_value_via {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    #[allow(clippy::redundant_closure_call)]
                    Value::$variant(($conv)(*self))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.to_value()
                }
            }
        )+
    };
}

to_value_via!(Int: i8, i16, i32, i64, u8, u16, u32 => |v| i64::from(v));
to_value_via!(Float: f32, f64 => |v| f64::from(v));
to_value_via!(Bool: bool => |v| v);
to_value_via!(Decimal: Decimal => |v| v);
to_value_via!(Date: NaiveDateTime => |v| v);
to_value_via!(Guid: Uuid => |v| v);

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Decimal(Decimal::from(*self)),
        }
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        (*self as u64).to_value()
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(self.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> ToValue for DateTime<Tz> {
    fn to_value(&self) -> Value {
        Value::Date(self.naive_local())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for ByteStream {
    fn to_value(&self) -> Value {
        Value::Stream(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> From<&T> for Value {
    fn from(value: &T) -> Self {
        value.to_value()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        value.to_value()
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        value.to_value()
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        value.to_value()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        value.to_value()
    }
}

impl From<ByteStream> for Value {
    fn from(value: ByteStream) -> Self {
        Value::Stream(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

enum Source {
    Seekable(Box<dyn ReadSeek>),
    Forward(Box<dyn Read + Send>),
}

/// Shared handle to a caller-supplied byte source.
///
/// Signature rules read through the handle but never close the underlying
/// reader; the caller keeps its own clone and decides when to drop it.
#[derive(Clone)]
pub struct ByteStream {
    source: Arc<Mutex<Source>>,
}

impl ByteStream {
    /// Wrap a reader that supports seeking.
    pub fn seekable<R: Read + Seek + Send + 'static>(reader: R) -> Self {
        Self {
            source: Arc::new(Mutex::new(Source::Seekable(Box::new(reader)))),
        }
    }

    /// Wrap a reader that can only be consumed front to back.
    pub fn forward_only<R: Read + Send + 'static>(reader: R) -> Self {
        Self {
            source: Arc::new(Mutex::new(Source::Forward(Box::new(reader)))),
        }
    }

    pub fn is_seekable(&self) -> bool {
        self.source
            .lock()
            .map(|source| matches!(*source, Source::Seekable(_)))
            .unwrap_or(false)
    }

    /// Read `len` bytes from the start of the stream.
    ///
    /// Seekable streams are rewound first; forward-only streams are read from
    /// their current position. Returns `None` when fewer than `len` bytes
    /// are available.
    pub fn read_head(&self, len: usize) -> io::Result<Option<Vec<u8>>> {
        let head = self.read_prefix(len)?;
        Ok((head.len() == len).then_some(head))
    }

    /// Read up to `len` bytes from the start of the stream.
    ///
    /// Same positioning as [`read_head`](Self::read_head), but a short stream
    /// yields whatever bytes it has.
    pub fn read_prefix(&self, len: usize) -> io::Result<Vec<u8>> {
        let mut source = self.lock()?;
        let mut buf = vec![0u8; len];
        let read = match &mut *source {
            Source::Seekable(reader) => {
                reader.seek(SeekFrom::Start(0))?;
                read_full(reader, &mut buf)?
            }
            Source::Forward(reader) => read_full(reader, &mut buf)?,
        };
        buf.truncate(read);
        Ok(buf)
    }

    /// Read the last `len` bytes of the stream.
    ///
    /// Returns `Ok(Err(NotSeekable))` for forward-only streams.
    pub fn read_tail(&self, len: usize) -> io::Result<Result<Option<Vec<u8>>, NotSeekable>> {
        let mut source = self.lock()?;
        let reader = match &mut *source {
            Source::Seekable(reader) => reader,
            Source::Forward(_) => return Ok(Err(NotSeekable)),
        };
        let total = reader.seek(SeekFrom::End(0))?;
        if total < len as u64 {
            return Ok(Ok(None));
        }
        reader.seek(SeekFrom::End(-(len as i64)))?;
        let mut buf = vec![0u8; len];
        let read = read_full(reader, &mut buf)?;
        Ok(Ok((read == len).then_some(buf)))
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Source>> {
        self.source
            .lock()
            .map_err(|_| io::Error::other("byte stream lock poisoned"))
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("seekable", &self.is_seekable())
            .finish()
    }
}

/// Marker returned when a tail read is requested on a forward-only stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotSeekable;

fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
