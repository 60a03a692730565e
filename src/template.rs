//! `$name` / `${name}` placeholder templates. `$$` is a literal dollar sign.

use std::collections::HashMap;

pub type Bindings = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(String),
}

/// 1-based position of a `$` that does not start a valid placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPlaceholder {
    pub line: usize,
    pub column: usize,
}

/// A placeholder with no binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self, InvalidPlaceholder> {
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chunk_start = 0;
        let mut i = 0;

        while let Some(offset) = text[i..].find('$') {
            let dollar = i + offset;
            literal.push_str(&text[chunk_start..dollar]);
            let rest = &bytes[dollar + 1..];

            let name = match rest.first() {
                Some(b'$') => {
                    literal.push('$');
                    i = dollar + 2;
                    None
                }
                Some(b'{') => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 || rest.get(1 + len) != Some(&b'}') {
                        return Err(position(text, dollar));
                    }
                    i = dollar + 3 + len;
                    Some(&text[dollar + 2..dollar + 2 + len])
                }
                Some(_) => {
                    let len = ident_len(rest);
                    if len == 0 {
                        return Err(position(text, dollar));
                    }
                    i = dollar + 1 + len;
                    Some(&text[dollar + 1..dollar + 1 + len])
                }
                None => return Err(position(text, dollar)),
            };

            if let Some(name) = name {
                if !literal.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name.to_string()));
            }
            chunk_start = i;
        }

        literal.push_str(&text[chunk_start..]);
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, bindings: &Bindings) -> Result<String, UnboundName> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => match bindings.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(UnboundName(name.clone())),
                },
            }
        }
        Ok(out)
    }
}

/// Length of a `[A-Za-z_][A-Za-z0-9_]*` run at the start of `bytes`.
fn ident_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}

fn position(text: &str, offset: usize) -> InvalidPlaceholder {
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    InvalidPlaceholder {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
    }
}
