//! Minimal class-file reader.
//!
//! Only the parts needed to describe methods are kept: the constant pool
//! (UTF-8 and class entries), the class's own name, and per method its
//! flags, name, descriptor, `Signature` and `Exceptions` attributes. Fields
//! and class-level attributes are skipped.

use crate::error::{FinderError, Result};

const MAGIC: u32 = 0xCAFE_BABE;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;

/// Method modifier keywords in the order javac and javap print them.
const METHOD_MODIFIERS: [(u16, &str); 9] = [
    (ACC_PUBLIC, "public"),
    (ACC_PRIVATE, "private"),
    (ACC_PROTECTED, "protected"),
    (ACC_STATIC, "static"),
    (ACC_FINAL, "final"),
    (ACC_SYNCHRONIZED, "synchronized"),
    (ACC_NATIVE, "native"),
    (ACC_ABSTRACT, "abstract"),
    (ACC_STRICT, "strictfp"),
];

pub fn method_modifiers(flags: u16) -> Vec<String> {
    METHOD_MODIFIERS
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, keyword)| keyword.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    /// Any entry this reader does not need to look into.
    Other(u8),
    /// Index 0 and the second slot of `Long`/`Double`.
    Unusable,
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(index as usize)
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(FinderError::BadConstantRef {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Internal (slash separated) name of a `Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index) {
            Some(Constant::Class { name_index }) => self.utf8(*name_index),
            _ => Err(FinderError::BadConstantRef {
                index,
                expected: "Class",
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub signature_index: Option<u16>,
    pub exception_indexes: Option<Vec<u16>>,
}

#[derive(Debug, Clone)]
pub struct ClassFile {
    pub constant_pool: ConstantPool,
    pub this_class: u16,
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);

        let magic = r.u32()?;
        if magic != MAGIC {
            return Err(FinderError::BadMagic(magic));
        }
        let _minor = r.u16()?;
        let _major = r.u16()?;

        let constant_pool = read_constant_pool(&mut r)?;

        let _access_flags = r.u16()?;
        let this_class = r.u16()?;
        let _super_class = r.u16()?;
        let interfaces = r.u16()? as usize;
        r.skip(interfaces * 2)?;

        let fields = r.u16()?;
        for _ in 0..fields {
            r.skip(6)?;
            skip_attributes(&mut r)?;
        }

        let method_count = r.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(read_method(&mut r, &constant_pool)?);
        }

        Ok(Self {
            constant_pool,
            this_class,
            methods,
        })
    }

    /// Internal name of the class, e.g. `java/util/Random`.
    pub fn name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.this_class)
    }
}

fn read_constant_pool(r: &mut ByteReader<'_>) -> Result<ConstantPool> {
    let count = r.u16()?;
    let mut entries = Vec::with_capacity(count as usize);
    entries.push(Constant::Unusable);

    let mut index: u16 = 1;
    while index < count {
        let tag = r.u8()?;
        let mut slots = 1;
        let constant = match tag {
            1 => {
                let len = r.u16()? as usize;
                Constant::Utf8(decode_modified_utf8(r.take(len)?))
            }
            7 => Constant::Class {
                name_index: r.u16()?,
            },
            // Integer, Float, Fieldref, Methodref, InterfaceMethodref,
            // NameAndType, Dynamic, InvokeDynamic
            3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                r.skip(4)?;
                Constant::Other(tag)
            }
            // Long, Double
            5 | 6 => {
                r.skip(8)?;
                slots = 2;
                Constant::Other(tag)
            }
            // String, MethodType, Module, Package
            8 | 16 | 19 | 20 => {
                r.skip(2)?;
                Constant::Other(tag)
            }
            // MethodHandle
            15 => {
                r.skip(3)?;
                Constant::Other(tag)
            }
            _ => return Err(FinderError::UnknownConstantTag { tag, index }),
        };
        entries.push(constant);
        if slots == 2 {
            entries.push(Constant::Unusable);
        }
        index = index.saturating_add(slots);
    }

    Ok(ConstantPool { entries })
}

fn read_method(r: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<MethodInfo> {
    let mut method = MethodInfo {
        access_flags: r.u16()?,
        name_index: r.u16()?,
        descriptor_index: r.u16()?,
        ..Default::default()
    };

    let attribute_count = r.u16()?;
    for _ in 0..attribute_count {
        let name_index = r.u16()?;
        let len = r.u32()? as usize;
        let body = r.take(len)?;
        let mut body = ByteReader::new(body);

        // An attribute whose name does not resolve is simply not one we know.
        match pool.utf8(name_index).ok() {
            Some("Signature") => {
                method.signature_index = Some(body.u16()?);
            }
            Some("Exceptions") => {
                let count = body.u16()?;
                let mut indexes = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    indexes.push(body.u16()?);
                }
                method.exception_indexes = Some(indexes);
            }
            _ => {}
        }
    }

    Ok(method)
}

fn skip_attributes(r: &mut ByteReader<'_>) -> Result<()> {
    let count = r.u16()?;
    for _ in 0..count {
        r.skip(2)?;
        let len = r.u32()? as usize;
        r.skip(len)?;
    }
    Ok(())
}

/// Decodes the JVM's modified UTF-8 (two-byte NUL, surrogate pairs encoded
/// separately). Invalid sequences become U+FFFD.
fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((((b & 0x1F) as u16) << 6) | (bytes[i + 1] & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (((b & 0x0F) as u16) << 12)
                    | (((bytes[i + 1] & 0x3F) as u16) << 6)
                    | (bytes[i + 2] & 0x3F) as u16,
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(FinderError::Truncated(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
