//! Content stream tokenizer.
//!
//! Turns raw content stream bytes into a list of [`Operator`]s, each holding
//! the [`Operand`]s that preceded it. Comments are dropped and inline images
//! (`BI … ID … EI`) are skipped entirely since they carry no text.

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    /// Name without the leading `/`, with `#xx` escapes decoded.
    Name(String),
    /// Literal string `( … )` as raw bytes after escape processing.
    LiteralString(Vec<u8>),
    /// Hex string `< … >` as decoded bytes.
    HexString(Vec<u8>),
    Array(Vec<Operand>),
    Boolean(bool),
    Null,
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Bytes of a literal or hex string operand.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(b) | Operand::HexString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// An operator with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub operands: Vec<Operand>,
}

/// Tokenize a content stream.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays or
/// dictionaries and for malformed numbers.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    Lexer { input, pos: 0 }.run()
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn malformed(msg: impl Into<String>) -> BackendError {
    BackendError::Interpreter(msg.into())
}

/// A parsed token: either a value for the operand stack or a bare keyword.
enum Token {
    Value(Operand),
    Keyword(String),
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Operator>, BackendError> {
        let mut ops = Vec::new();
        let mut stack: Vec<Operand> = Vec::new();

        while let Some(token) = self.next_token()? {
            match token {
                Token::Value(v) => stack.push(v),
                Token::Keyword(kw) => match kw.as_str() {
                    "true" => stack.push(Operand::Boolean(true)),
                    "false" => stack.push(Operand::Boolean(false)),
                    "null" => stack.push(Operand::Null),
                    "BI" => {
                        self.skip_inline_image()?;
                        stack.clear();
                    }
                    _ => ops.push(Operator {
                        name: kw,
                        operands: std::mem::take(&mut stack),
                    }),
                },
            }
        }

        Ok(ops)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while let Some(c) = self.peek() {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            let token = match b {
                b'(' => Token::Value(Operand::LiteralString(self.literal_string()?)),
                b'<' if self.peek_at(1) == Some(b'<') => {
                    Token::Value(Operand::Dictionary(self.dictionary()?))
                }
                b'<' => Token::Value(Operand::HexString(self.hex_string()?)),
                b'[' => {
                    self.pos += 1;
                    Token::Value(Operand::Array(self.array()?))
                }
                b'/' => Token::Value(Operand::Name(self.name())),
                b'0'..=b'9' | b'+' | b'-' | b'.' => Token::Value(self.number()?),
                b if is_regular(b) => Token::Keyword(self.keyword()),
                _ => {
                    // stray delimiter such as ')' or ']' at top level
                    self.pos += 1;
                    continue;
                }
            };
            return Ok(Some(token));
        }
    }

    /// Parse one value inside an array or dictionary. Keywords other than
    /// the literals become names.
    fn value(&mut self) -> Result<Operand, BackendError> {
        match self.next_token()? {
            Some(Token::Value(v)) => Ok(v),
            Some(Token::Keyword(kw)) => Ok(match kw.as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                _ => Operand::Name(kw),
            }),
            None => Err(malformed("unexpected end of content stream")),
        }
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => {
                    let Some(esc) = self.peek() else { break };
                    self.pos += 1;
                    match esc {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'\r' => {
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut val = u32::from(esc - b'0');
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(d @ b'0'..=b'7') => {
                                        val = val * 8 + u32::from(d - b'0');
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push((val & 0xFF) as u8);
                        }
                        other => out.push(other),
                    }
                }
                _ => out.push(b),
            }
        }

        Err(malformed("unterminated literal string"))
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut nibbles = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(malformed("unterminated hex string"));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let v = hex_value(b)
                .ok_or_else(|| malformed(format!("invalid hex digit: {:?}", b as char)))?;
            nibbles.push(v);
        }
        if nibbles.len() % 2 != 0 {
            nibbles.push(0);
        }
        Ok(nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect())
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(malformed("unterminated array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.value()?),
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(malformed("unterminated dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.name();
                    let value = self.value()?;
                    entries.push((key, value));
                }
                _ => return Err(malformed("expected name key in dictionary")),
            }
        }
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    bytes.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            bytes.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        let digits = token.trim_start_matches(['+', '-']);
        if digits.is_empty() || digits == "." {
            return Err(malformed(format!("invalid number: {token}")));
        }
        if has_dot {
            token
                .parse::<f64>()
                .map(Operand::Real)
                .map_err(|_| malformed(format!("invalid real number: {token}")))
        } else {
            token
                .parse::<i64>()
                .map(Operand::Integer)
                .or_else(|_| token.parse::<f64>().map(Operand::Real))
                .map_err(|_| malformed(format!("invalid integer: {token}")))
        }
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip an inline image after `BI`: the parameter dictionary up to `ID`,
    /// then binary data up to an `EI` that follows whitespace.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        loop {
            match self.next_token()? {
                Some(Token::Keyword(kw)) if kw == "ID" => break,
                Some(_) => {}
                None => return Err(malformed("unterminated inline image (missing ID)")),
            }
        }
        // single whitespace byte separates ID from the data
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }

        let data_start = self.pos;
        while self.pos + 1 < self.input.len() {
            let preceded = self.pos == data_start || is_whitespace(self.input[self.pos - 1]);
            let followed = self.peek_at(2).is_none_or(|b| !is_regular(b));
            if preceded
                && followed
                && self.input[self.pos] == b'E'
                && self.input[self.pos + 1] == b'I'
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(malformed("unterminated inline image (missing EI)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(name: &str, operands: Vec<Operand>) -> Operator {
        Operator {
            name: name.to_string(),
            operands,
        }
    }

    #[test]
    fn empty_stream() {
        assert!(tokenize(b"").unwrap().is_empty());
        assert!(tokenize(b"  \n % just a comment\n").unwrap().is_empty());
    }

    #[test]
    fn simple_text_block() {
        let ops = tokenize(b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET").unwrap();
        assert_eq!(
            ops,
            vec![
                op("BT", vec![]),
                op(
                    "Tf",
                    vec![Operand::Name("F1".to_string()), Operand::Integer(12)]
                ),
                op("Td", vec![Operand::Integer(72), Operand::Integer(720)]),
                op("Tj", vec![Operand::LiteralString(b"Hello".to_vec())]),
                op("ET", vec![]),
            ]
        );
    }

    #[test]
    fn numbers() {
        let ops = tokenize(b"1 -2 +3 .5 -.25 4. cm").unwrap();
        assert_eq!(
            ops[0].operands,
            vec![
                Operand::Integer(1),
                Operand::Integer(-2),
                Operand::Integer(3),
                Operand::Real(0.5),
                Operand::Real(-0.25),
                Operand::Real(4.0),
            ]
        );
    }

    #[test]
    fn lone_sign_is_an_error() {
        assert!(tokenize(b"- Tj").is_err());
    }

    #[test]
    fn literal_string_escapes() {
        let ops = tokenize(br"(a\(b\)c\\d\n\101\7) Tj").unwrap();
        assert_eq!(
            ops[0].operands,
            vec![Operand::LiteralString(b"a(b)c\\d\nA\x07".to_vec())]
        );
    }

    #[test]
    fn literal_string_nesting_and_continuation() {
        let ops = tokenize(b"(outer (inner) done\\\nmore) Tj").unwrap();
        assert_eq!(
            ops[0].operands,
            vec![Operand::LiteralString(b"outer (inner) donemore".to_vec())]
        );
    }

    #[test]
    fn unterminated_literal_string() {
        assert!(tokenize(b"(never closed Tj").is_err());
    }

    #[test]
    fn hex_strings() {
        let ops = tokenize(b"<48 65 6C6C6F> Tj <ABC> Tj").unwrap();
        assert_eq!(ops[0].operands, vec![Operand::HexString(b"Hello".to_vec())]);
        assert_eq!(ops[1].operands, vec![Operand::HexString(vec![0xAB, 0xC0])]);
    }

    #[test]
    fn tj_array() {
        let ops = tokenize(b"[(AB) -200 (CD) 50.5] TJ").unwrap();
        assert_eq!(
            ops[0].operands,
            vec![Operand::Array(vec![
                Operand::LiteralString(b"AB".to_vec()),
                Operand::Integer(-200),
                Operand::LiteralString(b"CD".to_vec()),
                Operand::Real(50.5),
            ])]
        );
    }

    #[test]
    fn names_with_escapes() {
        let ops = tokenize(b"/F#231 12 Tf").unwrap();
        assert_eq!(ops[0].operands[0], Operand::Name("F#1".to_string()));
    }

    #[test]
    fn dictionary_operand() {
        let ops = tokenize(b"/Span <</MCID 3 /Lang (en)>> BDC EMC").unwrap();
        assert_eq!(ops[0].name, "BDC");
        assert_eq!(
            ops[0].operands[1],
            Operand::Dictionary(vec![
                ("MCID".to_string(), Operand::Integer(3)),
                ("Lang".to_string(), Operand::LiteralString(b"en".to_vec())),
            ])
        );
        assert_eq!(ops[1].name, "EMC");
    }

    #[test]
    fn quote_operators() {
        let ops = tokenize(b"(a) ' 1 2 (b) \" T*").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["'", "\"", "T*"]);
        assert_eq!(ops[1].operands.len(), 3);
    }

    #[test]
    fn booleans_and_null() {
        let ops = tokenize(b"true false null op").unwrap();
        assert_eq!(
            ops[0].operands,
            vec![Operand::Boolean(true), Operand::Boolean(false), Operand::Null]
        );
    }

    #[test]
    fn inline_image_is_skipped() {
        let ops =
            tokenize(b"q BI /W 2 /H 1 /BPC 8 /CS /G ID \x00\xFF EI Q BT (x) Tj ET").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["q", "Q", "BT", "Tj", "ET"]);
    }

    #[test]
    fn inline_image_missing_ei() {
        assert!(tokenize(b"BI /W 1 ID \x00\x01").is_err());
    }

    #[test]
    fn operand_accessors() {
        assert_eq!(Operand::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Operand::Real(1.5).as_f64(), Some(1.5));
        assert_eq!(Operand::Name("x".into()).as_f64(), None);
        assert_eq!(
            Operand::HexString(vec![1, 2]).as_bytes(),
            Some(&[1u8, 2][..])
        );
        assert_eq!(Operand::Name("F1".into()).as_name(), Some("F1"));
    }
}
