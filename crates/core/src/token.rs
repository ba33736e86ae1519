use argspec_diagnostics::Span;

/// Stable identity of a token within one token stream.
///
/// Results are keyed by `TokenId` rather than by token position or value,
/// so callers can attribute them back to whatever node produced the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

/// Classification of a command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// The command word (e.g., `grep`).
    Command(String),
    /// An option spelling (e.g., `-n`, `--name`).
    Option(String),
    /// A value: an option argument or a positional argument.
    Argument(String),
    /// A gap between tokens. Its absence between two tokens means they
    /// were adjacent in the source (e.g., `--name=bob`).
    Whitespace,
}

/// A token with its identity and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Stable identity.
    pub id: TokenId,
    /// What the token is.
    pub kind: TokenKind,
    /// Byte span in the source line.
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(id: TokenId, kind: TokenKind, span: Span) -> Self {
        Self { id, kind, span }
    }

    /// The token's text, if it carries any.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Command(s) | TokenKind::Option(s) | TokenKind::Argument(s) => Some(s),
            TokenKind::Whitespace => None,
        }
    }
}

/// Builds a source line and its token stream side by side.
///
/// Ids are assigned in push order and spans follow the concatenated text,
/// so the result looks exactly like the output of a tokenizer.
///
/// ```
/// use argspec_core::LineBuilder;
///
/// let (line, tokens) = LineBuilder::new()
///     .command("grep")
///     .space()
///     .option("-n")
///     .space()
///     .argument("bob")
///     .build();
/// assert_eq!(line, "grep -n bob");
/// assert_eq!(tokens.len(), 5);
/// ```
#[derive(Debug, Default)]
pub struct LineBuilder {
    text: String,
    tokens: Vec<Token>,
}

impl LineBuilder {
    /// Start an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, kind: TokenKind, text: &str) -> Self {
        let start = self.text.len();
        self.text.push_str(text);
        let id = TokenId(self.tokens.len());
        self.tokens
            .push(Token::new(id, kind, Span::new(start, self.text.len())));
        self
    }

    /// Append a command word.
    pub fn command(self, name: &str) -> Self {
        self.push(TokenKind::Command(name.to_string()), name)
    }

    /// Append an option spelling.
    pub fn option(self, name: &str) -> Self {
        self.push(TokenKind::Option(name.to_string()), name)
    }

    /// Append an argument value.
    pub fn argument(self, text: &str) -> Self {
        self.push(TokenKind::Argument(text.to_string()), text)
    }

    /// Append a single space.
    pub fn space(self) -> Self {
        self.push(TokenKind::Whitespace, " ")
    }

    /// Append raw text with no token (e.g., an `=` joining an option to
    /// its value). Advances spans without emitting whitespace.
    pub fn glue(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Finish, returning the source line and its tokens.
    pub fn build(self) -> (String, Vec<Token>) {
        (self.text, self.tokens)
    }

    /// Finish, returning only the tokens.
    pub fn tokens(self) -> Vec<Token> {
        self.tokens
    }
}
