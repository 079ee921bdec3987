//! PDF Object Model
//!
//! The subset of PDF object types the planner writer emits: numbers, names,
//! literal strings, arrays, dictionaries, indirect references and streams.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Object number of an indirect object (generation is always 0)
pub type ObjectId = u32;

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Literal string, escaped on output
    String(Vec<u8>),
    /// Name object (written with a leading /)
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    /// Indirect reference `n 0 R`
    Reference(ObjectId),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn string(s: impl Into<Vec<u8>>) -> Self {
        PdfObject::String(s.into())
    }

    /// Rectangle array `[llx lly urx ury]`
    pub fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(llx),
            PdfObject::Real(lly),
            PdfObject::Real(urx),
            PdfObject::Real(ury),
        ])
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(i64::from(n))
    }
}

impl From<usize> for PdfObject {
    fn from(n: usize) -> Self {
        PdfObject::Integer(n as i64)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(arr: Vec<PdfObject>) -> Self {
        PdfObject::Array(arr)
    }
}

/// PDF dictionary; keys are written in sorted order so output is stable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with a `/Type` entry
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// PDF stream (dictionary + data)
#[derive(Debug, Clone)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Set once a filter has been applied; the writer will not compress again
    pub encoded: bool,
}

impl PdfStream {
    /// Raw stream, eligible for compression
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    /// Stream whose data is already encoded with `filter`
    pub fn encoded(dict: PdfDictionary, data: Vec<u8>, filter: &str) -> Self {
        Self {
            dict: dict.with("Filter", PdfObject::name(filter)),
            data,
            encoded: true,
        }
    }
}

/// Serializer for PDF objects
pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => write!(self.writer, "{}", n),
            PdfObject::Real(n) => write!(self.writer, "{}", format_number(*n)),
            PdfObject::String(data) => self.write_string(data),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                write!(self.writer, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " ")?;
                    }
                    self.write_object(item)?;
                }
                write!(self.writer, "]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Reference(id) => write!(self.writer, "{} 0 R", id),
        }
    }

    pub fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        write!(self.writer, "<<")?;
        for (key, value) in dict.iter() {
            write!(self.writer, " ")?;
            self.write_name(key)?;
            write!(self.writer, " ")?;
            self.write_object(value)?;
        }
        write!(self.writer, " >>")
    }

    /// Write a stream; `/Length` must already be in the dictionary
    pub fn write_stream(&mut self, stream: &PdfStream) -> io::Result<()> {
        self.write_dictionary(&stream.dict)?;
        write!(self.writer, "\nstream\n")?;
        self.writer.write_all(&stream.data)?;
        write!(self.writer, "\nendstream")
    }

    fn write_string(&mut self, data: &[u8]) -> io::Result<()> {
        write!(self.writer, "(")?;
        for &byte in data {
            match byte {
                b'(' | b')' | b'\\' => write!(self.writer, "\\{}", byte as char)?,
                b'\n' => write!(self.writer, "\\n")?,
                b'\r' => write!(self.writer, "\\r")?,
                0x20..=0x7E => write!(self.writer, "{}", byte as char)?,
                _ => write!(self.writer, "\\{:03o}", byte)?,
            }
        }
        write!(self.writer, ")")
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "/")?;
        for byte in name.bytes() {
            let delimiter = b"#()<>[]{}/%".contains(&byte);
            if (0x21..=0x7E).contains(&byte) && !delimiter {
                write!(self.writer, "{}", byte as char)?;
            } else {
                write!(self.writer, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Shortest decimal form with at most four fractional digits
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        let s = format!("{:.4}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
