//! Binary prop buffer codec for the script boundary.
//!
//! Props crossing the boundary are serialized to a self-describing buffer:
//! a 2-byte header (magic + format version) followed by one typed value
//! tree. Both sides decode the same layout; serialize→deserialize is
//! value-equal. All multi-byte integers are big-endian.

use crate::value::{PropMap, PropValue};
use thiserror::Error;

const MAGIC: u8 = 0xFF;
const VERSION: u8 = 0x01;

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_DOUBLE: u8 = 0x03;
const TAG_STR: u8 = 0x04;
const TAG_ARRAY: u8 = 0x05;
const TAG_OBJECT: u8 = 0x06;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("buffer truncated at offset {0}")]
    Truncated(usize),

    #[error("bad header (expected {MAGIC:#04x} {VERSION:#04x})")]
    BadHeader,

    #[error("unknown type tag {tag:#04x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("invalid utf-8 in string value")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Serialize a single value, header included.
pub fn encode(value: &PropValue) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.push(MAGIC);
    out.push(VERSION);
    write_value(&mut out, value);
    out
}

/// Serialize a prop map as a single object value, header included.
pub fn encode_map(props: &PropMap) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.push(MAGIC);
    out.push(VERSION);
    out.push(TAG_OBJECT);
    out.extend_from_slice(&(props.len() as u32).to_be_bytes());
    for (key, value) in props {
        write_str(&mut out, key);
        write_value(&mut out, value);
    }
    out
}

fn write_value(out: &mut Vec<u8>, value: &PropValue) {
    match value {
        PropValue::Null => out.push(TAG_NULL),
        PropValue::Bool(b) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*b));
        }
        PropValue::Int(n) => {
            out.push(TAG_INT);
            out.extend_from_slice(&n.to_be_bytes());
        }
        PropValue::Double(n) => {
            out.push(TAG_DOUBLE);
            out.extend_from_slice(&n.to_bits().to_be_bytes());
        }
        PropValue::Str(s) => {
            out.push(TAG_STR);
            write_str_body(out, s);
        }
        PropValue::Array(items) => {
            out.push(TAG_ARRAY);
            out.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                write_value(out, item);
            }
        }
        PropValue::Object(fields) => {
            out.push(TAG_OBJECT);
            out.extend_from_slice(&(fields.len() as u32).to_be_bytes());
            for (key, value) in fields {
                write_str(out, key);
                write_value(out, value);
            }
        }
    }
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    out.push(TAG_STR);
    write_str_body(out, s);
}

fn write_str_body(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Deserialize a buffer produced by [`encode`] or [`encode_map`].
pub fn decode(buf: &[u8]) -> Result<PropValue, WireError> {
    let mut reader = Reader { buf, pos: 0 };
    if reader.read_u8()? != MAGIC || reader.read_u8()? != VERSION {
        return Err(WireError::BadHeader);
    }
    reader.read_value()
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or(WireError::Truncated(self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(WireError::Truncated(self.pos))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_str(&mut self) -> Result<&'a str, WireError> {
        let len = self.read_u32()? as usize;
        Ok(std::str::from_utf8(self.take(len)?)?)
    }

    fn read_value(&mut self) -> Result<PropValue, WireError> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        match tag {
            TAG_NULL => Ok(PropValue::Null),
            TAG_BOOL => Ok(PropValue::Bool(self.read_u8()? != 0)),
            TAG_INT => {
                let bytes = self.take(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(PropValue::Int(i64::from_be_bytes(raw)))
            }
            TAG_DOUBLE => {
                let bytes = self.take(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(PropValue::Double(f64::from_bits(u64::from_be_bytes(raw))))
            }
            TAG_STR => Ok(PropValue::Str(self.read_str()?.into())),
            TAG_ARRAY => {
                let count = self.read_u32()? as usize;
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(self.read_value()?);
                }
                Ok(PropValue::Array(items))
            }
            TAG_OBJECT => {
                let count = self.read_u32()? as usize;
                let mut fields = std::collections::HashMap::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key_tag = self.read_u8()?;
                    if key_tag != TAG_STR {
                        return Err(WireError::UnknownTag {
                            tag: key_tag,
                            offset: self.pos - 1,
                        });
                    }
                    let key = self.read_str()?.into();
                    let value = self.read_value()?;
                    fields.insert(key, value);
                }
                Ok(PropValue::Object(fields))
            }
            _ => Err(WireError::UnknownTag { tag, offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropMap;

    fn sample_map() -> PropMap {
        let mut inner = std::collections::HashMap::new();
        inner.insert("margin".into(), PropValue::Array(vec![
            PropValue::Int(1),
            PropValue::Double(2.5),
        ]));

        let mut map = PropMap::new();
        map.insert("text".into(), PropValue::Str("hello".into()));
        map.insert("hidden".into(), PropValue::Bool(false));
        map.insert("count".into(), PropValue::Int(0));
        map.insert("nothing".into(), PropValue::Null);
        map.insert("style".into(), PropValue::Object(inner));
        map
    }

    #[test]
    fn test_roundtrip_map() {
        let map = sample_map();
        let buf = encode_map(&map);
        match decode(&buf).unwrap() {
            PropValue::Object(decoded) => assert_eq!(decoded, map),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip_scalar() {
        for value in [
            PropValue::Null,
            PropValue::Bool(true),
            PropValue::Int(-42),
            PropValue::Double(f64::MIN_POSITIVE),
            PropValue::Str("".into()),
        ] {
            let buf = encode(&value);
            assert_eq!(decode(&buf).unwrap(), value);
        }
    }

    #[test]
    fn test_bad_header_rejected() {
        let value = PropValue::Int(1);
        let mut buf = encode(&value);
        buf[0] = 0x00;
        assert!(matches!(decode(&buf), Err(WireError::BadHeader)));
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let buf = encode(&PropValue::Str("truncate me".into()));
        for len in 0..buf.len() {
            assert!(decode(&buf[..len]).is_err(), "len {} should fail", len);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let buf = vec![MAGIC, VERSION, 0x7F];
        assert!(matches!(
            decode(&buf),
            Err(WireError::UnknownTag { tag: 0x7F, .. })
        ));
    }
}
