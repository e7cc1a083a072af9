use std::collections::HashSet;

use crate::Result;

/// Cursor-based parser over one descriptor or generic-signature string.
///
/// Nested class types (`Lpkg/Outer<...>.Inner;`) are handled with an explicit stack of
/// in-progress name buffers rather than recursion on the name level: one buffer is pushed
/// per `L`, `.Inner` continuations append `$Inner` to the buffer on top, and the buffer is
/// recorded and popped at the terminating `;`. Nesting depth is data-dependent, so the
/// stack grows as deep as the input requires.
struct SignatureParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    stack: Vec<Vec<u8>>,
}

impl<'a> SignatureParser<'a> {
    fn new(signature: &'a str) -> Self {
        SignatureParser {
            bytes: signature.as_bytes(),
            pos: 0,
            stack: Vec::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// The byte at the cursor, or 0 at the end of input (never a valid signature byte).
    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn input(&self) -> &str {
        // Constructed from &str, so this cannot fail.
        std::str::from_utf8(self.bytes).unwrap_or_default()
    }

    fn advance_past(&mut self, byte: u8) -> Result<()> {
        while self.pos < self.bytes.len() {
            let current = self.bytes[self.pos];
            self.pos += 1;
            if current == byte {
                return Ok(());
            }
        }
        Err(malformed_error!(
            "expected '{}' before end of signature: {}",
            byte as char,
            self.input()
        ))
    }

    fn top_mut(&mut self) -> Result<&mut Vec<u8>> {
        let len = self.stack.len();
        if len == 0 {
            return Err(malformed_error!(
                "dangling nested-type continuation in signature: {}",
                self.input()
            ));
        }
        Ok(&mut self.stack[len - 1])
    }

    fn top_name(&self) -> Result<String> {
        match self.stack.last() {
            Some(buffer) => Self::buffer_to_name(buffer.clone(), self.input()),
            None => Err(malformed_error!(
                "no class name in progress in signature: {}",
                self.input()
            )),
        }
    }

    fn pop_name(&mut self) -> Result<String> {
        match self.stack.pop() {
            Some(buffer) => Self::buffer_to_name(buffer, self.input()),
            None => Err(malformed_error!(
                "unbalanced class-type terminator in signature: {}",
                self.input()
            )),
        }
    }

    fn buffer_to_name(buffer: Vec<u8>, input: &str) -> Result<String> {
        String::from_utf8(buffer)
            .map_err(|_| malformed_error!("class name is not valid UTF-8 in signature: {}", input))
    }

    /// Consume one `Type` production, adding any class names it references to `out`.
    ///
    /// Returns `Ok(false)` only when called at the end of input; a type that cannot be
    /// matched is a fatal [`crate::Error::Malformed`].
    fn parse_type(&mut self, out: &mut HashSet<String>) -> Result<bool> {
        if self.at_end() {
            return Ok(false);
        }

        let mut current = self.current();
        while matches!(current, b'+' | b'-' | b'[') {
            self.pos += 1;
            current = self.current();
        }

        // Primitive codes and the wildcard marker reference no class type.
        if matches!(
            current,
            b'I' | b'J' | b'B' | b'S' | b'C' | b'Z' | b'F' | b'D' | b'V' | b'*'
        ) {
            self.pos += 1;
            return Ok(true);
        }

        // Type-variable reference: consumed, contributes nothing.
        if current == b'T' {
            self.advance_past(b';')?;
            return Ok(true);
        }

        if current == b'L' || (!self.stack.is_empty() && current == b'.') {
            if current == b'L' {
                self.stack.push(Vec::new());
            } else {
                self.top_mut()?.push(b'$');
            }
            self.pos += 1;

            let mut end = self.pos;
            while end < self.bytes.len() {
                let byte = self.bytes[end];
                if byte == b';' {
                    let name = self.pop_name()?;
                    out.insert(name);
                    self.pos = end + 1;
                    return Ok(true);
                }
                if byte == b'<' {
                    // Generic-argument application point: the erased name counts here,
                    // and stays on the stack for possible `.Inner` continuations.
                    out.insert(self.top_name()?);
                    self.pos = end + 1;
                    while self.current() != b'>' && self.parse_type(out)? {}
                    if self.current() == b'>' {
                        self.pos += 1;
                    }
                    if self.current() == b';' {
                        self.pos += 1;
                        self.pop_name()?;
                    }
                    return Ok(true);
                }
                // Nested types are flattened to the `$`-joined binary name.
                self.top_mut()?.push(if byte == b'.' { b'$' } else { byte });
                end += 1;
            }

            return Err(malformed_error!(
                "unterminated class type in signature: {}",
                self.input()
            ));
        }

        Err(malformed_error!(
            "cannot parse type in signature: {}",
            self.input()
        ))
    }
}

/// Add to `out` all non-primitive class names referenced by a descriptor or signature.
///
/// Accepts both plain descriptors (no generics) and generic signatures. Class names are
/// reported erased (no type arguments) and with nesting flattened to `$`. Primitive
/// codes, `V`, wildcards and type-variable references contribute nothing.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the string cannot be matched against the
/// signature grammar. Malformed signatures signal class-file corruption and are never
/// partially consumed.
pub fn collect_referenced_types(signature: &str, out: &mut HashSet<String>) -> Result<()> {
    let mut parser = SignatureParser::new(signature);

    // Optional leading block of formal type parameters: `<Ident : Bound (: Bound)*>...`.
    // Its bounds are ordinary types; the declarations themselves are discarded.
    if signature.starts_with('<') {
        while parser.current() != b'>' {
            parser.advance_past(b':')?;
            if parser.current() != b':' {
                parser.parse_type(out)?;
            }
            while parser.current() == b':' {
                parser.pos += 1;
                parser.parse_type(out)?;
            }
        }
        parser.pos += 1;
    }

    while !parser.at_end() {
        // Method signatures wrap parameters in parentheses and prefix each
        // throws-clause with '^'; all three are skipped as pure punctuation.
        if matches!(parser.current(), b'(' | b')' | b'^') {
            parser.pos += 1;
            continue;
        }
        parser.parse_type(out)?;
    }

    Ok(())
}

/// Return all non-primitive class names referenced by a descriptor or signature.
///
/// Set-returning convenience wrapper around [`collect_referenced_types`].
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the string cannot be matched against the
/// signature grammar.
pub fn referenced_types(signature: &str) -> Result<HashSet<String>> {
    let mut types = HashSet::new();
    collect_referenced_types(signature, &mut types)?;
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(signature: &str) -> HashSet<String> {
        referenced_types(signature).unwrap()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn inner_class_signature_with_generics() {
        let found = types(
            "Lcom/intellij/refactoring/changeSignature/ChangeSignatureDialogBase<TP;TM;TD;>.UpdateSignatureListener;",
        );
        assert_eq!(
            found,
            set(&[
                "com/intellij/refactoring/changeSignature/ChangeSignatureDialogBase",
                "com/intellij/refactoring/changeSignature/ChangeSignatureDialogBase$UpdateSignatureListener",
            ])
        );
    }

    #[test]
    fn generic_outer_with_inner() {
        assert_eq!(
            types("Lpkg/Outer<TP;TM;TD;>.Inner;"),
            set(&["pkg/Outer", "pkg/Outer$Inner"])
        );
    }

    #[test]
    fn plain_method_descriptor() {
        assert_eq!(types("(I)Ljava/lang/String;"), set(&["java/lang/String"]));
        assert_eq!(types("(IJZBSCFD)V"), set(&[]));
        assert_eq!(
            types("(Lpkg/A;[[Lpkg/B;I)[Lpkg/C;"),
            set(&["pkg/A", "pkg/B", "pkg/C"])
        );
    }

    #[test]
    fn erased_name_counted_once() {
        assert_eq!(types("Lpkg/Plain;"), set(&["pkg/Plain"]));
        assert_eq!(
            types("Lpkg/List<Lpkg/Item;>;"),
            set(&["pkg/List", "pkg/Item"])
        );
    }

    #[test]
    fn wildcards_variance_and_type_variables() {
        assert_eq!(types("Lpkg/List<*>;"), set(&["pkg/List"]));
        assert_eq!(
            types("Lpkg/Map<+Lpkg/A;-Lpkg/B;>;"),
            set(&["pkg/Map", "pkg/A", "pkg/B"])
        );
        assert_eq!(types("TT;"), set(&[]));
        assert_eq!(types("[TT;"), set(&[]));
    }

    #[test]
    fn formal_type_parameters_and_throws() {
        assert_eq!(
            types("<T:Ljava/lang/Object;:Lpkg/Cmp<TT;>;>(TT;)V^Lpkg/Boom;^TT;"),
            set(&["java/lang/Object", "pkg/Cmp", "pkg/Boom"])
        );
        // Interface-only bound (empty class bound).
        assert_eq!(
            types("<T::Lpkg/Marker;>(TT;)V"),
            set(&["pkg/Marker"])
        );
    }

    #[test]
    fn deep_nesting() {
        assert_eq!(
            types("Lpkg/A<Lpkg/X;>.B<Lpkg/Y;>.C;"),
            set(&["pkg/A", "pkg/X", "pkg/A$B", "pkg/Y", "pkg/A$B$C"])
        );
    }

    #[test]
    fn malformed_signatures_are_fatal() {
        assert!(matches!(
            referenced_types("Q"),
            Err(crate::Error::Malformed { .. })
        ));
        assert!(matches!(
            referenced_types("Lpkg/Unterminated"),
            Err(crate::Error::Malformed { .. })
        ));
        assert!(matches!(
            referenced_types("<T"),
            Err(crate::Error::Malformed { .. })
        ));
        assert!(matches!(
            referenced_types("(I)TT"),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn empty_signature_references_nothing() {
        assert_eq!(types(""), set(&[]));
    }
}
