//! Token Definitions for the Forge Language Family
//!
//! This crate provides the shared token and source-location definitions used
//! by the Forge, Suflae, and Cake parsers. Tokens are produced by an external
//! lexer; the parsers only consume them.

use std::fmt;
use std::sync::Arc;

/// Token produced by the lexer and consumed by the parser.
///
/// Stores the token kind, original source text, and position. The text is kept
/// in an `Arc<str>` so buffering and lookahead can clone tokens cheaply.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token classification for parser decision making
    pub kind: TokenKind,
    /// Original source text for precise reconstruction
    pub text: Arc<str>,
    /// 1-based source line
    pub line: u32,
    /// 1-based source column
    pub column: u32,
    /// Starting byte position for error reporting and location tracking
    pub position: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>, line: u32, column: u32, position: usize) -> Self {
        Token { kind, text: text.into(), line, column, position }
    }

    /// Build the source location of this token within `file`.
    pub fn location(&self, file: &Arc<str>) -> SourceLocation {
        SourceLocation {
            file: Arc::clone(file),
            line: self.line,
            column: self.column,
            position: self.position,
        }
    }
}

/// A position within a named source file. Attached to every AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Name of the file the node was parsed from
    pub file: Arc<str>,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    /// Byte offset from the start of the file
    pub position: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32, position: usize) -> Self {
        SourceLocation { file: file.into(), line, column, position }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Token classification for the Forge language family.
///
/// One closed set shared by all three dialects. Legacy Cake spellings
/// (`recipe`, `chimera`, `step`, `display`) have their own tags; the dialect
/// drivers decide which tags they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Declaration keywords =====
    /// Namespace declaration: `namespace A.B`
    Namespace,
    /// Module import: `import A.B as C`
    Import,
    /// Type alias: `define X as Y`
    Define,
    /// Scoped alias: `using A.B as C`
    Using,
    /// Compile-time constant: `preset N: s32 = 3`
    Preset,
    /// Mutable variable declaration: `var x`
    Var,
    /// Immutable variable declaration: `let x`
    Let,
    /// Routine declaration: `routine f(...)`
    Routine,
    /// Heap reference type: `entity Circle`
    Entity,
    /// Stack value type: `record Point`
    Record,
    /// Singleton type: `resident Registry`
    Resident,
    /// Integer-valued enumeration: `choice Color`
    Choice,
    /// Tagged union: `variant Shape`
    Variant,
    /// Tagged union with mutable payloads: `mutant Buffer`
    Mutant,
    /// Interface declaration: `protocol Drawable`
    Protocol,
    /// FFI declaration: `imported routine puts(...)`
    Imported,

    // ===== Legacy Cake spellings =====
    /// Legacy spelling of `routine`
    Recipe,
    /// Legacy spelling of the `mutant` variant kind
    Chimera,
    /// Legacy range step keyword (`to ... step ...`)
    Step,
    /// Legacy output sugar: `display(...)`
    Display,

    // ===== Control-flow keywords =====
    If,
    Elseif,
    Else,
    /// Negated conditional: `unless cond`
    Unless,
    While,
    /// Infinite loop: `loop { }`
    Loop,
    For,
    In,
    /// Pattern-matching block: `when x { ... }`
    When,
    Return,
    Break,
    Continue,
    Throw,
    /// Absent return from a failable routine
    Absent,
    /// No-op statement
    Pass,
    /// Inline conditional separator: `if c then a else b`
    Then,

    // ===== Scoped-access keywords =====
    /// `viewing e as h { }`
    Viewing,
    /// `hijacking e as h { }`
    Hijacking,
    /// `inspecting h from e { }`
    Inspecting,
    /// `seizing h from e { }`
    Seizing,
    /// `danger! { }`
    Danger,
    /// `mayhem! { }`
    Mayhem,
    As,
    From,

    // ===== Word operators =====
    And,
    Or,
    Not,
    /// Type test / pattern head: `x is Circle`
    Is,
    /// Negated type test
    IsNot,
    /// Protocol conformance test
    Follows,
    NotFollows,
    NotIn,
    NotFrom,
    /// Ascending range: `a to b`
    To,
    /// Descending range: `a downto b`
    Downto,
    /// Range step: `a to b by s`
    By,
    /// Functional record update: `p with (x: 1)`
    With,

    // ===== Generic / constraint keywords =====
    /// Modern constraint clause: `requires T follows P`
    Requires,
    /// Legacy constraint clause spelling
    Where,
    /// Self value in method context
    Me,
    /// Self type in protocol/method context
    MyType,

    // ===== Visibility modifiers =====
    Public,
    Internal,
    /// Alias of `internal` in the legacy dialect
    Module,
    Private,
    Family,
    /// Alias of `family` in the brace dialect
    Protected,
    Common,
    Global,
    External,

    // ===== Value keywords =====
    True,
    False,
    /// The absence value for failable results
    None,
    /// Pre-tokenized `@intrinsic` attribute
    IntrinsicAttr,
    /// Embedded native code: `native("...")`
    Native,

    // ===== Arithmetic operators =====
    /// `+`
    Plus,
    /// Wrapping add: `+%`
    PlusPercent,
    /// Saturating add: `+^`
    PlusCaret,
    /// Checked add: `+!`
    PlusBang,
    /// `-`
    Minus,
    MinusPercent,
    MinusCaret,
    MinusBang,
    /// `*`
    Star,
    StarPercent,
    StarCaret,
    StarBang,
    /// `/`
    Slash,
    /// Integer division: `//`
    SlashSlash,
    /// `%`
    Percent,
    /// `**`
    Power,
    PowerPercent,
    PowerCaret,
    PowerBang,

    // ===== Shift operators =====
    /// `<<`
    LeftShift,
    /// `>>` (also split by the parser when closing nested generics)
    RightShift,
    /// Logical shift: `<<<`
    LeftShiftLogical,
    /// Logical shift: `>>>`
    RightShiftLogical,
    /// Checked shift: `<<|`
    LeftShiftChecked,
    /// Checked shift: `>>|`
    RightShiftChecked,

    // ===== Comparison operators =====
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// Three-way comparison: `<=>`
    Spaceship,

    // ===== Bitwise operators =====
    Ampersand,
    VerticalBar,
    Caret,
    Tilde,

    // ===== Coalescing =====
    /// None-coalescing: `??`
    QuestionQuestion,

    // ===== Assignment operators =====
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    SlashSlashAssign,
    PercentAssign,
    PowerAssign,
    AmpersandAssign,
    VerticalBarAssign,
    CaretAssign,
    LeftShiftAssign,
    RightShiftAssign,
    QuestionQuestionAssign,

    // ===== Punctuation =====
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Colon,
    /// `->` return-type marker
    Arrow,
    /// `=>` when-clause separator
    FatArrow,
    Question,
    /// `!` failable marker / scoped-access suffix
    Bang,
    /// `_` wildcard
    Underscore,
    /// Variadic marker in FFI declarations: `...`
    Ellipsis,
    /// Attribute head: `@`
    At,

    // ===== Untyped numeric literals =====
    IntegerLiteral,
    FloatLiteral,

    // ===== Typed integer literals =====
    U8Literal,
    U16Literal,
    U32Literal,
    U64Literal,
    /// Pointer-sized unsigned literal (`_uaddr` suffix)
    UAddrLiteral,
    S8Literal,
    S16Literal,
    S32Literal,
    S64Literal,
    /// Pointer-sized signed literal (`_saddr` suffix)
    SAddrLiteral,

    // ===== Typed float / decimal literals =====
    F16Literal,
    F32Literal,
    F64Literal,
    D64Literal,
    D128Literal,

    // ===== Other literals =====
    /// Single byte: `b'A'`
    ByteLiteral,
    /// Unicode scalar: `'A'`
    LetterLiteral,
    /// UTF-8 text: `"..."`
    TextLiteral,
    /// Raw text (no escapes)
    RawTextLiteral,
    /// Formatted text with interpolation holes
    FormattedTextLiteral,
    /// Explicit 8-bit encoded text
    Text8Literal,
    /// Explicit 16-bit encoded text
    Text16Literal,
    /// Memory size with unit suffix: `4_KiB`
    MemorySizeLiteral,
    /// Duration with unit suffix: `250_ms`
    DurationLiteral,

    // ===== Identifiers =====
    /// Lower-case-led identifier
    Identifier,
    /// Upper-case-led type identifier
    TypeIdentifier,

    // ===== Synthetic whitespace structure =====
    Newline,
    Indent,
    Dedent,

    // ===== Special =====
    Eof,
    Unknown,
}

impl TokenKind {
    /// Whether this kind is a literal token (numeric, text, byte, letter,
    /// memory-size, or duration).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::U8Literal
                | TokenKind::U16Literal
                | TokenKind::U32Literal
                | TokenKind::U64Literal
                | TokenKind::UAddrLiteral
                | TokenKind::S8Literal
                | TokenKind::S16Literal
                | TokenKind::S32Literal
                | TokenKind::S64Literal
                | TokenKind::SAddrLiteral
                | TokenKind::F16Literal
                | TokenKind::F32Literal
                | TokenKind::F64Literal
                | TokenKind::D64Literal
                | TokenKind::D128Literal
                | TokenKind::ByteLiteral
                | TokenKind::LetterLiteral
                | TokenKind::TextLiteral
                | TokenKind::RawTextLiteral
                | TokenKind::FormattedTextLiteral
                | TokenKind::Text8Literal
                | TokenKind::Text16Literal
                | TokenKind::MemorySizeLiteral
                | TokenKind::DurationLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
        )
    }

    /// Whether this kind is one of the synthetic whitespace-structure tokens.
    pub fn is_synthetic(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
    }

    /// Whether this kind is a visibility modifier keyword.
    pub fn is_visibility(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Internal
                | TokenKind::Module
                | TokenKind::Private
                | TokenKind::Family
                | TokenKind::Protected
                | TokenKind::Common
                | TokenKind::Global
                | TokenKind::External
        )
    }

    /// Whether a token of this kind can begin a declaration. Used by error
    /// recovery to find the next safe parse point.
    pub fn starts_declaration(self) -> bool {
        matches!(
            self,
            TokenKind::Namespace
                | TokenKind::Import
                | TokenKind::Define
                | TokenKind::Using
                | TokenKind::Preset
                | TokenKind::Var
                | TokenKind::Let
                | TokenKind::Routine
                | TokenKind::Recipe
                | TokenKind::Entity
                | TokenKind::Record
                | TokenKind::Resident
                | TokenKind::Choice
                | TokenKind::Variant
                | TokenKind::Mutant
                | TokenKind::Chimera
                | TokenKind::Protocol
                | TokenKind::Imported
        ) || self.is_visibility()
    }

    /// Whether a token of this kind can begin a control-flow statement. Used
    /// together with [`starts_declaration`](Self::starts_declaration) by error
    /// recovery.
    pub fn starts_control_flow(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Unless
                | TokenKind::While
                | TokenKind::Loop
                | TokenKind::For
                | TokenKind::When
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Throw
                | TokenKind::Absent
                | TokenKind::Pass
        )
    }
}
