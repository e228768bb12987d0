use smol_str::SmolStr;

use crate::base::Span;

/// A terminal of the parse tree: identifier, literal or operator text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: SmolStr,
    pub span: Option<Span>,
}

impl Token {
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            span: None,
        }
    }

    /// Attach the span reported by the parser.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.span = Some(Span::point(line, column));
        self
    }

    /// Identifier text with the raw-identifier `#` prefix removed.
    pub fn ident(&self) -> SmolStr {
        match self.text.strip_prefix('#') {
            Some(stripped) => SmolStr::new(stripped),
            None => self.text.clone(),
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::new(text)
    }
}

/// A dotted package name such as `ohos.util`.
#[derive(Debug, Clone, PartialEq)]
pub struct PkgName {
    pub parts: Vec<Token>,
    pub span: Option<Span>,
}

impl PkgName {
    pub fn new(dotted: &str) -> Self {
        Self {
            parts: dotted.split('.').map(Token::new).collect(),
            span: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.span = Some(Span::point(line, column));
        self
    }

    /// The dotted form, raw-identifier prefixes removed.
    pub fn dotted(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.ident())
            .collect::<Vec<_>>()
            .join(".")
    }
}
