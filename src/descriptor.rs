//! Method descriptor and generic signature decoding into Java source syntax.

use crate::error::{FinderError, Result};

/// The JVM rejects array types with more dimensions than this.
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Deepest `<...>` nesting accepted in a generic signature.
const MAX_TYPE_ARGUMENT_DEPTH: usize = 64;

/// A method's type information in source notation (`java.lang.String`,
/// `int[]`, `java.util.List<? extends T>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodType {
    pub type_parameters: Vec<String>,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub throws: Vec<String>,
}

/// Decodes an erased descriptor such as `(I[Ljava/lang/String;)V`.
pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodType> {
    let mut p = TypeReader::new(descriptor);
    let parsed = p.method_descriptor();
    parsed.map_err(|reason| FinderError::BadDescriptor {
        descriptor: descriptor.to_string(),
        reason,
    })
}

/// Decodes a `Signature` attribute value such as
/// `<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)TT;^TE;`.
pub fn parse_method_signature(signature: &str) -> Result<MethodType> {
    let mut p = TypeReader::new(signature);
    let parsed = p.method_signature();
    parsed.map_err(|reason| FinderError::BadSignature {
        signature: signature.to_string(),
        reason,
    })
}

type ParseResult<T> = std::result::Result<T, String>;

struct TypeReader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeReader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> ParseResult<u8> {
        let b = self.peek().ok_or_else(|| "unexpected end".to_string())?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, wanted: u8) -> ParseResult<()> {
        match self.next()? {
            b if b == wanted => Ok(()),
            b => Err(format!(
                "expected '{}' at {}, found '{}'",
                wanted as char,
                self.pos - 1,
                b as char
            )),
        }
    }

    fn finish(&self) -> ParseResult<()> {
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(format!("trailing input at {}", self.pos))
        }
    }

    /// Reads up to (not including) the first of `stops`. All stop bytes are
    /// ASCII, so the slice bounds are always char boundaries.
    fn identifier(&mut self, stops: &[u8]) -> ParseResult<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(format!("empty identifier at {start}"));
        }
        Ok(&self.src[start..self.pos])
    }

    fn method_descriptor(&mut self) -> ParseResult<MethodType> {
        self.expect(b'(')?;
        let mut parameters = Vec::new();
        while self.peek() != Some(b')') {
            parameters.push(self.field_type()?);
        }
        self.expect(b')')?;
        let return_type = self.return_type(Self::field_type)?;
        self.finish()?;

        Ok(MethodType {
            parameters,
            return_type,
            ..Default::default()
        })
    }

    /// Consumes a run of `[` and returns its length.
    fn array_dimensions(&mut self) -> ParseResult<usize> {
        let start = self.pos;
        while self.peek() == Some(b'[') {
            self.pos += 1;
        }
        let dimensions = self.pos - start;
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(format!(
                "{dimensions} array dimensions at {start} exceed the limit of {MAX_ARRAY_DIMENSIONS}"
            ));
        }
        Ok(dimensions)
    }

    fn field_type(&mut self) -> ParseResult<String> {
        let dimensions = self.array_dimensions()?;
        let element = match self.next()? {
            b'L' => {
                let name = self.identifier(b";")?;
                self.expect(b';')?;
                name.replace('/', ".")
            }
            b => base_type(b)?.to_string(),
        };
        Ok(with_dimensions(element, dimensions))
    }

    fn return_type(
        &mut self,
        parse: fn(&mut Self) -> ParseResult<String>,
    ) -> ParseResult<String> {
        if self.peek() == Some(b'V') {
            self.pos += 1;
            Ok("void".to_string())
        } else {
            parse(self)
        }
    }

    fn method_signature(&mut self) -> ParseResult<MethodType> {
        let type_parameters = if self.peek() == Some(b'<') {
            self.type_parameters()?
        } else {
            Vec::new()
        };

        self.expect(b'(')?;
        let mut parameters = Vec::new();
        while self.peek() != Some(b')') {
            parameters.push(self.java_type_signature()?);
        }
        self.expect(b')')?;
        let return_type = self.return_type(Self::java_type_signature)?;

        let mut throws = Vec::new();
        while self.peek() == Some(b'^') {
            self.pos += 1;
            throws.push(self.reference_type_signature()?);
        }
        self.finish()?;

        Ok(MethodType {
            type_parameters,
            parameters,
            return_type,
            throws,
        })
    }

    fn type_parameters(&mut self) -> ParseResult<Vec<String>> {
        self.expect(b'<')?;
        let mut params = Vec::new();
        while self.peek() != Some(b'>') {
            let name = self.identifier(b":>")?;
            let mut bounds = Vec::new();
            // Class bound may be empty (`T::Ljava/lang/Comparable;`).
            self.expect(b':')?;
            if !matches!(self.peek(), Some(b':') | Some(b'>')) {
                bounds.push(self.reference_type_signature()?);
            }
            while self.peek() == Some(b':') {
                self.pos += 1;
                bounds.push(self.reference_type_signature()?);
            }
            if bounds.len() == 1 && bounds[0] == "java.lang.Object" {
                bounds.clear();
            }
            if bounds.is_empty() {
                params.push(name.to_string());
            } else {
                params.push(format!("{name} extends {}", bounds.join(" & ")));
            }
        }
        self.expect(b'>')?;
        if params.is_empty() {
            return Err("empty type parameter list".to_string());
        }
        Ok(params)
    }

    fn java_type_signature(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(b'L') | Some(b'T') | Some(b'[') => self.reference_type_signature(),
            Some(b) => {
                self.pos += 1;
                base_type(b).map(str::to_string)
            }
            None => Err("unexpected end".to_string()),
        }
    }

    fn reference_type_signature(&mut self) -> ParseResult<String> {
        if self.peek() == Some(b'[') {
            let dimensions = self.array_dimensions()?;
            let element = self.java_type_signature()?;
            return Ok(with_dimensions(element, dimensions));
        }
        match self.next()? {
            b'L' => self.class_type_signature(),
            b'T' => {
                let name = self.identifier(b";")?;
                self.expect(b';')?;
                Ok(name.to_string())
            }
            b => Err(format!("unexpected '{}' at {}", b as char, self.pos - 1)),
        }
    }

    /// Called after the leading `L`.
    fn class_type_signature(&mut self) -> ParseResult<String> {
        let mut out = self.identifier(b"<.;")?.replace('/', ".");
        loop {
            if self.peek() == Some(b'<') {
                out.push_str(&self.type_arguments()?);
            }
            match self.next()? {
                b';' => return Ok(out),
                b'.' => {
                    out.push('.');
                    out.push_str(self.identifier(b"<.;")?);
                }
                b => return Err(format!("unexpected '{}' at {}", b as char, self.pos - 1)),
            }
        }
    }

    fn type_arguments(&mut self) -> ParseResult<String> {
        if self.depth >= MAX_TYPE_ARGUMENT_DEPTH {
            return Err(format!("type arguments nested too deeply at {}", self.pos));
        }
        self.depth += 1;
        let args = self.type_argument_list();
        self.depth -= 1;
        args
    }

    fn type_argument_list(&mut self) -> ParseResult<String> {
        self.expect(b'<')?;
        let mut args = Vec::new();
        while self.peek() != Some(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    "?".to_string()
                }
                Some(b'+') => {
                    self.pos += 1;
                    format!("? extends {}", self.reference_type_signature()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    format!("? super {}", self.reference_type_signature()?)
                }
                _ => self.reference_type_signature()?,
            };
            args.push(arg);
        }
        self.expect(b'>')?;
        if args.is_empty() {
            return Err("empty type argument list".to_string());
        }
        Ok(format!("<{}>", args.join(", ")))
    }
}

fn with_dimensions(mut element: String, dimensions: usize) -> String {
    element.reserve(dimensions * 2);
    for _ in 0..dimensions {
        element.push_str("[]");
    }
    element
}

fn base_type(b: u8) -> ParseResult<&'static str> {
    Ok(match b {
        b'B' => "byte",
        b'C' => "char",
        b'D' => "double",
        b'F' => "float",
        b'I' => "int",
        b'J' => "long",
        b'S' => "short",
        b'Z' => "boolean",
        _ => return Err(format!("unknown type code '{}'", b as char)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_with_primitives_objects_and_arrays() {
        let t = parse_method_descriptor("(IJ[Ljava/lang/String;[[Z)Ljava/util/List;").unwrap();
        assert_eq!(
            t.parameters,
            vec!["int", "long", "java.lang.String[]", "boolean[][]"]
        );
        assert_eq!(t.return_type, "java.util.List");
        assert!(t.type_parameters.is_empty());
        assert!(t.throws.is_empty());
    }

    #[test]
    fn void_descriptor_without_parameters() {
        let t = parse_method_descriptor("()V").unwrap();
        assert!(t.parameters.is_empty());
        assert_eq!(t.return_type, "void");
    }

    #[test]
    fn malformed_descriptors_are_rejected() {
        for bad in ["", "I", "(I", "(Q)V", "(Ljava/lang/String)V", "()VV", "(V)V"] {
            let err = parse_method_descriptor(bad).unwrap_err();
            assert!(
                matches!(err, FinderError::BadDescriptor { .. }),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn signature_with_type_parameters_and_throws() {
        let t = parse_method_signature(
            "<T:Ljava/lang/Object;E:Ljava/lang/Exception;>(Ljava/util/List<+TT;>;)TT;^TE;^Ljava/io/IOException;",
        )
        .unwrap();
        assert_eq!(t.type_parameters, vec!["T", "E extends java.lang.Exception"]);
        assert_eq!(t.parameters, vec!["java.util.List<? extends T>"]);
        assert_eq!(t.return_type, "T");
        assert_eq!(t.throws, vec!["E", "java.io.IOException"]);
    }

    #[test]
    fn signature_with_interface_bounds_and_wildcards() {
        let t = parse_method_signature(
            "<T::Ljava/lang/Comparable<-TT;>;>(Ljava/util/Map<*[TT;>;)V",
        )
        .unwrap();
        assert_eq!(
            t.type_parameters,
            vec!["T extends java.lang.Comparable<? super T>"]
        );
        assert_eq!(t.parameters, vec!["java.util.Map<?, T[]>"]);
        assert_eq!(t.return_type, "void");
    }

    #[test]
    fn signature_with_inner_class_suffix() {
        let t = parse_method_signature("()Lcom/acme/Outer<TK;>.Inner<Ljava/lang/String;>;").unwrap();
        assert_eq!(t.return_type, "com.acme.Outer<K>.Inner<java.lang.String>");
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let err = parse_method_signature("<T:>(TT)V").unwrap_err();
        assert!(matches!(err, FinderError::BadSignature { .. }));
    }

    #[test]
    fn array_dimensions_are_counted_without_recursion() {
        let deep = format!("({}I)V", "[".repeat(60_000));
        let err = parse_method_descriptor(&deep).unwrap_err();
        assert!(matches!(err, FinderError::BadDescriptor { .. }));

        let deep_signature = format!("({}TT;)V", "[".repeat(60_000));
        let err = parse_method_signature(&deep_signature).unwrap_err();
        assert!(matches!(err, FinderError::BadSignature { .. }));
    }

    #[test]
    fn dimension_limit_is_inclusive() {
        let at_limit = format!("({}I)V", "[".repeat(MAX_ARRAY_DIMENSIONS));
        let t = parse_method_descriptor(&at_limit).unwrap();
        assert_eq!(t.parameters[0], format!("int{}", "[]".repeat(MAX_ARRAY_DIMENSIONS)));

        let over = format!("({}I)V", "[".repeat(MAX_ARRAY_DIMENSIONS + 1));
        assert!(parse_method_descriptor(&over).is_err());
    }

    #[test]
    fn deeply_nested_type_arguments_are_rejected() {
        let depth = 10_000;
        let signature = format!(
            "(L{}java/lang/String;{})V",
            "java/util/List<L".repeat(depth),
            ">;".repeat(depth)
        );
        let err = parse_method_signature(&signature).unwrap_err();
        assert!(matches!(err, FinderError::BadSignature { .. }));
    }

    #[test]
    fn nested_arrays_inside_type_arguments() {
        let t = parse_method_signature("(Ljava/util/List<[[TT;>;)[Ljava/lang/String;").unwrap();
        assert_eq!(t.parameters, vec!["java.util.List<T[][]>"]);
        assert_eq!(t.return_type, "java.lang.String[]");
    }
}
