//! Question extraction from quiz source text.
//!
//! Quiz pages embed their questions as JavaScript object literals:
//!
//! ```text
//! { id: 1, question: "...", options: [ { text: "...", personality: "..." }, ... ] }
//! ```
//!
//! Rather than matching that shape with patterns, the scanner parses a small
//! object-literal grammar at every `{` it meets and keeps whatever question
//! records the parsed value contains:
//!
//! ```text
//! value  := string | number | ident | array | object
//! object := '{' ( key ':' value ( ',' key ':' value )* ','? )? '}'
//! array  := '[' ( value ( ',' value )* ','? )? ']'
//! key    := ident | string
//! ```
//!
//! Anything that does not fit the grammar (markup, CSS, function bodies) is
//! skipped one character at a time. Key order, quoted keys, extra keys,
//! trailing commas, comments and escaped quotes inside strings are all
//! accepted. String escapes follow JavaScript (`\xHH`, `\uXXXX`, `\u{...}`
//! and surrogate pairs); a malformed escape is kept as written so the
//! surrounding record survives.

use std::path::Path;

use tracing::{debug, info};

use super::{Question, QuizOption};
use crate::error::LoadError;

/// Nesting limit for a single literal
const MAX_DEPTH: usize = 64;

/// Read and parse a quiz source file.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is missing, unreadable, or not UTF-8.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    let questions = parse(&text);
    info!(path = %path.display(), questions = questions.len(), "quiz loaded");
    Ok(questions)
}

/// Extract every question record from `text`, in document order.
pub fn parse(text: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('{') {
        let start = pos + offset;
        let mut cursor = Cursor::new(text, start);
        match cursor.object(0) {
            Some(value) => {
                collect_questions(&value, &mut questions);
                pos = cursor.pos;
            }
            None => pos = start + 1,
        }
    }

    debug!(count = questions.len(), "question records extracted");
    questions
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Num(String),
    Ident(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Field lookup; a repeated key resolves to its last occurrence.
    fn field<'v>(fields: &'v [(String, Value)], key: &str) -> Option<&'v Value> {
        fields.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn collect_questions(value: &Value, out: &mut Vec<Question>) {
    match value {
        Value::Object(fields) => match as_question(fields) {
            Some(question) => out.push(question),
            None => fields.iter().for_each(|(_, v)| collect_questions(v, out)),
        },
        Value::Array(items) => items.iter().for_each(|v| collect_questions(v, out)),
        _ => {}
    }
}

fn as_question(fields: &[(String, Value)]) -> Option<Question> {
    let id = match Value::field(fields, "id")? {
        Value::Num(raw) => raw.parse::<u32>().ok()?,
        _ => return None,
    };
    let prompt = Value::field(fields, "question")?.as_str()?;
    let Value::Array(items) = Value::field(fields, "options")? else {
        return None;
    };

    let options = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(option) => as_option(option),
            _ => None,
        })
        .collect::<Vec<_>>();

    if options.len() != items.len() {
        debug!(id, skipped = items.len() - options.len(), "malformed options skipped");
    }

    Some(Question::new(id, prompt, options))
}

fn as_option(fields: &[(String, Value)]) -> Option<QuizOption> {
    let text = Value::field(fields, "text")?.as_str()?;
    let personality = Value::field(fields, "personality")?.as_str()?;
    if personality.is_empty() {
        return None;
    }
    Some(QuizOption::new(text, personality))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                let end = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += end;
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                match body.find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    fn value(&mut self, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        self.skip_trivia();
        match self.peek()? {
            '{' => self.object(depth + 1),
            '[' => self.array(depth + 1),
            '"' | '\'' | '`' => self.string().map(Value::Str),
            c if c == '-' || c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => self.ident().map(Value::Ident),
            _ => None,
        }
    }

    fn object(&mut self, depth: usize) -> Option<Value> {
        if !self.eat('{') {
            return None;
        }
        let mut fields = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Some(Value::Object(fields));
            }
            let key = match self.peek()? {
                '"' | '\'' => self.string()?,
                c if is_ident_start(c) => self.ident()?,
                _ => return None,
            };
            self.skip_trivia();
            if !self.eat(':') {
                return None;
            }
            let value = self.value(depth)?;
            fields.push((key, value));

            self.skip_trivia();
            if self.eat('}') {
                return Some(Value::Object(fields));
            }
            if !self.eat(',') {
                return None;
            }
        }
    }

    fn array(&mut self, depth: usize) -> Option<Value> {
        if !self.eat('[') {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(']') {
                return Some(Value::Array(items));
            }
            items.push(self.value(depth)?);

            self.skip_trivia();
            if self.eat(']') {
                return Some(Value::Array(items));
            }
            if !self.eat(',') {
                return None;
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    '0' => out.push('\0'),
                    'u' => match self.unicode_escape() {
                        Some((c, len)) => {
                            out.push(c);
                            self.pos += len;
                        }
                        None => {
                            debug!(offset = self.pos, "malformed \\u escape kept verbatim");
                            out.push_str("\\u");
                        }
                    },
                    'x' => match hex_prefix(self.rest(), 2).and_then(char::from_u32) {
                        Some(c) => {
                            out.push(c);
                            self.pos += 2;
                        }
                        None => out.push_str("\\x"),
                    },
                    '\n' => {}
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    /// Decode the body of a `\u` escape without consuming it.
    ///
    /// Accepts `XXXX` and `{X...}`. A high surrogate followed by `\uDC00`-`\uDFFF`
    /// combines into one char; an unpaired surrogate decodes to U+FFFD. Returns
    /// the char and the number of bytes it spans, or `None` if the body is not
    /// hex.
    fn unicode_escape(&self) -> Option<(char, usize)> {
        let rest = self.rest();
        if let Some(braced) = rest.strip_prefix('{') {
            let end = braced.find('}')?;
            let c = hex_prefix(braced, end).and_then(char::from_u32)?;
            return Some((c, end + 2));
        }

        let high = hex_prefix(rest, 4)?;
        if !(0xD800..0xDC00).contains(&high) {
            let c = char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER);
            return Some((c, 4));
        }
        let low = rest[4..]
            .strip_prefix("\\u")
            .and_then(|r| hex_prefix(r, 4))
            .filter(|low| (0xDC00..0xE000).contains(low));
        match low.and_then(|low| char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))) {
            Some(c) => Some((c, 10)),
            None => Some((char::REPLACEMENT_CHARACTER, 4)),
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        self.eat('-');
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return None;
        }
        Some(Value::Num(self.src[start..self.pos].to_string()))
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        while self
            .peek()
            .is_some_and(|c| is_ident_start(c) || c.is_ascii_digit())
        {
            self.bump();
        }
        Some(self.src[start..self.pos].to_string())
    }
}

/// Value of the first `len` bytes of `s` when they are all hex digits.
fn hex_prefix(s: &str, len: usize) -> Option<u32> {
    let digits = s.get(..len)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<html>
<style>
  .card { color: red; padding: 4px; }
</style>
<script>
const questions = [
    {
        id: 1,
        question: "Face à un projet, vous...",
        options: [
            { text: "Planifiez", personality: "Stratège" },
            { text: "Improvisez", personality: "Créatif" },
            { text: "Organisez", personality: "Organisateur" },
            { text: "Discutez", personality: "Communicant" }
        ]
    },
    {
        id: 2,
        question: "Le week-end, vous...",
        options: [
            { text: "Lisez", personality: "Mentor" },
            { text: "Voyagez", personality: "Explorateur" },
        ]
    }
];
function pick(q) { return q.options[0]; }
</script>
</html>
"#;

    #[test]
    fn test_parse_embedded_questions() {
        let questions = parse(SAMPLE);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[0].question, "Face à un projet, vous...");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].options[1], QuizOption::new("Improvisez", "Créatif"));
        assert_eq!(questions[1].id, 2);
        assert_eq!(questions[1].options.len(), 2);
    }

    #[test]
    fn test_parse_escaped_quotes_and_newlines() {
        let text = r#"{ id: 3, question: "Say \"hi\"\nthen?", options: [
            { text: 'It\'s fine', personality: "Leader" }
        ] }"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Say \"hi\"\nthen?");
        assert_eq!(questions[0].options[0].text, "It's fine");
    }

    #[test]
    fn test_parse_json_shape_with_extra_keys() {
        let text = r#"{"quiz": {"questions": [
            {"options": [{"personality": "Mentor", "text": "A", "weight": 2}],
             "category": "work", "question": "Q?", "id": 10}
        ]}}"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 10);
        assert_eq!(questions[0].options[0].personality, "Mentor");
    }

    #[test]
    fn test_parse_comments_are_skipped() {
        let text = r#"{ id: 4, // first
            question: "Q", /* block
            comment */ options: [ { text: "A", personality: "Réaliste" } ] }"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options[0].personality, "Réaliste");
    }

    #[test]
    fn test_parse_skips_malformed_options() {
        let text = r#"{ id: 5, question: "Q", options: [
            { text: "A", personality: "Mentor" },
            { text: "B" },
            { text: "C", personality: "" },
            "loose"
        ] }"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 1);
    }

    #[test]
    fn test_parse_rejects_records_without_integer_id() {
        let text = r#"
            { id: "1", question: "Q", options: [] }
            { id: 2.5, question: "Q", options: [] }
            { id: -1, question: "Q", options: [] }
            { question: "Q", options: [] }
            { id: 6, question: "Q", options: [] }
        "#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 6);
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_parse_recovers_inside_non_literal_blocks() {
        let text = r#"
            const quiz = {
                title: "T",
                render() { return 1; },
                questions: [ { id: 8, question: "Q", options: [ { text: "A", personality: "Leader" } ] } ]
            };
        "#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 8);
    }

    #[test]
    fn test_parse_unicode_escapes() {
        let text = r#"{ id: 9, question: "Créatif?", options: [ { text: "\u{1F600}", personality: "Créatif" } ] }"#;

        let questions = parse(text);

        assert_eq!(questions[0].question, "Créatif?");
        assert_eq!(questions[0].options[0].text, "\u{1F600}");
        assert_eq!(questions[0].options[0].personality, "Créatif");
    }

    #[test]
    fn test_parse_surrogate_pair_escape() {
        let text = r#"
            { id: 1, question: "Fun \ud83d\ude00?", options: [ { text: "A", personality: "Créatif" } ] }
            { id: 2, question: "Q", options: [ { text: "B", personality: "Mentor" } ] }
        "#;

        let questions = parse(text);

        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(questions[0].question, "Fun \u{1F600}?");
    }

    #[test]
    fn test_parse_unpaired_surrogate_becomes_replacement_char() {
        let text = r#"{ id: 1, question: "a\ud83db\udc00", options: [] }"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn test_parse_malformed_unicode_escape_is_kept_verbatim() {
        let text = r#"
            { id: 3, question: "Save to C:\users?", options: [ { text: "\u{zz}", personality: "Leader" } ] }
            { id: 4, question: "Q", options: [] }
        "#;

        let questions = parse(text);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Save to C:\\users?");
        assert_eq!(questions[0].options[0].text, "\\u{zz}");
    }

    #[test]
    fn test_parse_hex_escapes() {
        let text = r#"{ id: 5, question: "\x41\x42 \xZZ", options: [] }"#;

        let questions = parse(text);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "AB \\xZZ");
    }

    #[test]
    fn test_parse_broken_record_does_not_swallow_neighbours() {
        let text = r#"
            { id: 1, question: "Q1", options: [ { text: "A", personality: "Mentor" } ] }
            { id: 2, question: "Q2", options: [ { text: "B" personality: "Leader" } ] }
            { id: 3, question: "Q3", options: [ { text: "C", personality: "Réaliste" } ] }
        "#;

        let questions = parse(text);

        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_parse_empty_and_unstructured_text() {
        assert!(parse("").is_empty());
        assert!(parse("no braces at all").is_empty());
        assert!(parse("{{{{ unterminated \"").is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/definitely/not/here/quiz.html").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_load_rejects_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.html");
        std::fs::write(&path, [0xff, 0xfe, 0x7b, 0x00]).unwrap();

        let err = load(&path).unwrap_err();

        assert!(matches!(err, LoadError::NotUtf8 { .. }));
    }
}
