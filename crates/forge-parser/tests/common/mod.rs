//! Test-support tokenizer.
//!
//! The production lexer is an external collaborator; integration tests build
//! their token vectors through this minimal tokenizer instead of writing
//! token literals by hand. It covers exactly the surface the tests exercise:
//! keywords, operators (longest match), literals with type suffixes, and
//! synthetic `Newline` / `Indent` / `Dedent` emission for the indentation
//! dialects.

#![allow(dead_code)]

use forge_token::{Token, TokenKind};

/// Tokenize brace-dialect (Forge) source: newlines only, no indent tracking.
pub fn forge_tokens(source: &str) -> Vec<Token> {
    lex(source, false)
}

/// Tokenize indentation-dialect (Suflae/Cake) source: leading-space changes
/// become `Indent`/`Dedent`.
pub fn indent_tokens(source: &str) -> Vec<Token> {
    lex(source, true)
}

fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "namespace" => TokenKind::Namespace,
        "import" => TokenKind::Import,
        "define" => TokenKind::Define,
        "using" => TokenKind::Using,
        "preset" => TokenKind::Preset,
        "var" => TokenKind::Var,
        "let" => TokenKind::Let,
        "routine" => TokenKind::Routine,
        "entity" => TokenKind::Entity,
        "record" => TokenKind::Record,
        "resident" => TokenKind::Resident,
        "choice" => TokenKind::Choice,
        "variant" => TokenKind::Variant,
        "mutant" => TokenKind::Mutant,
        "protocol" => TokenKind::Protocol,
        "imported" => TokenKind::Imported,
        "recipe" => TokenKind::Recipe,
        "chimera" => TokenKind::Chimera,
        "step" => TokenKind::Step,
        "display" => TokenKind::Display,
        "if" => TokenKind::If,
        "elseif" => TokenKind::Elseif,
        "else" => TokenKind::Else,
        "unless" => TokenKind::Unless,
        "while" => TokenKind::While,
        "loop" => TokenKind::Loop,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "when" => TokenKind::When,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "throw" => TokenKind::Throw,
        "absent" => TokenKind::Absent,
        "pass" => TokenKind::Pass,
        "then" => TokenKind::Then,
        "viewing" => TokenKind::Viewing,
        "hijacking" => TokenKind::Hijacking,
        "inspecting" => TokenKind::Inspecting,
        "seizing" => TokenKind::Seizing,
        "danger" => TokenKind::Danger,
        "mayhem" => TokenKind::Mayhem,
        "as" => TokenKind::As,
        "from" => TokenKind::From,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "is" => TokenKind::Is,
        "isnot" => TokenKind::IsNot,
        "follows" => TokenKind::Follows,
        "notfollows" => TokenKind::NotFollows,
        "notin" => TokenKind::NotIn,
        "notfrom" => TokenKind::NotFrom,
        "to" => TokenKind::To,
        "downto" => TokenKind::Downto,
        "by" => TokenKind::By,
        "with" => TokenKind::With,
        "requires" => TokenKind::Requires,
        "where" => TokenKind::Where,
        "me" | "Me" => TokenKind::Me,
        "MyType" => TokenKind::MyType,
        "Routine" => TokenKind::Routine,
        "public" => TokenKind::Public,
        "internal" => TokenKind::Internal,
        "module" => TokenKind::Module,
        "private" => TokenKind::Private,
        "family" => TokenKind::Family,
        "protected" => TokenKind::Protected,
        "common" => TokenKind::Common,
        "global" => TokenKind::Global,
        "external" => TokenKind::External,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "none" => TokenKind::None,
        "native" => TokenKind::Native,
        _ => return None,
    };
    Some(kind)
}

const OPERATORS: &[(&str, TokenKind)] = &[
    // 3+ characters first: longest match wins.
    ("<<=", TokenKind::LeftShiftAssign),
    (">>=", TokenKind::RightShiftAssign),
    ("**=", TokenKind::PowerAssign),
    ("//=", TokenKind::SlashSlashAssign),
    ("??=", TokenKind::QuestionQuestionAssign),
    ("<=>", TokenKind::Spaceship),
    ("<<<", TokenKind::LeftShiftLogical),
    (">>>", TokenKind::RightShiftLogical),
    ("<<|", TokenKind::LeftShiftChecked),
    (">>|", TokenKind::RightShiftChecked),
    ("...", TokenKind::Ellipsis),
    ("**%", TokenKind::PowerPercent),
    ("**^", TokenKind::PowerCaret),
    ("**!", TokenKind::PowerBang),
    ("+%", TokenKind::PlusPercent),
    ("+^", TokenKind::PlusCaret),
    ("+!", TokenKind::PlusBang),
    ("-%", TokenKind::MinusPercent),
    ("-^", TokenKind::MinusCaret),
    ("-!", TokenKind::MinusBang),
    ("*%", TokenKind::StarPercent),
    ("*^", TokenKind::StarCaret),
    ("*!", TokenKind::StarBang),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
    ("%=", TokenKind::PercentAssign),
    ("&=", TokenKind::AmpersandAssign),
    ("|=", TokenKind::VerticalBarAssign),
    ("^=", TokenKind::CaretAssign),
    ("<<", TokenKind::LeftShift),
    (">>", TokenKind::RightShift),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::NotEqual),
    ("??", TokenKind::QuestionQuestion),
    ("=>", TokenKind::FatArrow),
    ("->", TokenKind::Arrow),
    ("//", TokenKind::SlashSlash),
    ("**", TokenKind::Power),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("=", TokenKind::Assign),
    ("!", TokenKind::Bang),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::VerticalBar),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
];

const INT_SUFFIXES: &[(&str, TokenKind)] = &[
    ("u8", TokenKind::U8Literal),
    ("u16", TokenKind::U16Literal),
    ("u32", TokenKind::U32Literal),
    ("u64", TokenKind::U64Literal),
    ("uaddr", TokenKind::UAddrLiteral),
    ("s8", TokenKind::S8Literal),
    ("s16", TokenKind::S16Literal),
    ("s32", TokenKind::S32Literal),
    ("s64", TokenKind::S64Literal),
    ("saddr", TokenKind::SAddrLiteral),
    ("f16", TokenKind::F16Literal),
    ("f32", TokenKind::F32Literal),
    ("f64", TokenKind::F64Literal),
    ("d64", TokenKind::D64Literal),
    ("d128", TokenKind::D128Literal),
];

const MEMORY_UNITS: &[&str] = &["B", "KB", "KiB", "MB", "MiB", "GB", "GiB", "TB", "TiB"];
const DURATION_UNITS: &[&str] = &["ns", "us", "ms", "s", "min", "h"];

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

impl Lexer {
    fn push(&mut self, kind: TokenKind, text: String, line: u32, column: u32, position: usize) {
        self.tokens.push(Token::new(kind, text, line, column, position));
    }
}

fn lex(source: &str, indent_mode: bool) -> Vec<Token> {
    let mut lx = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
    };
    let mut indents: Vec<usize> = vec![0];
    let mut at_line_start = true;

    while lx.pos < lx.chars.len() {
        if at_line_start {
            let mut scan = lx.pos;
            let mut width = 0;
            while scan < lx.chars.len() && lx.chars[scan] == ' ' {
                scan += 1;
                width += 1;
            }
            // Blank and comment-only lines do not affect indentation.
            if scan < lx.chars.len() && (lx.chars[scan] == '\n' || lx.chars[scan] == '#') {
                while scan < lx.chars.len() && lx.chars[scan] != '\n' {
                    scan += 1;
                }
                lx.pos = scan + 1;
                lx.line += 1;
                lx.column = 1;
                continue;
            }
            if scan >= lx.chars.len() {
                break;
            }
            if indent_mode {
                let top = indents.last().copied().unwrap_or(0);
                if width > top {
                    indents.push(width);
                    lx.tokens.push(Token::new(TokenKind::Indent, "", lx.line, 1, lx.pos));
                } else {
                    while width < indents.last().copied().unwrap_or(0) {
                        indents.pop();
                        lx.tokens.push(Token::new(TokenKind::Dedent, "", lx.line, 1, lx.pos));
                    }
                }
            }
            lx.pos = scan;
            lx.column = (width + 1) as u32;
            at_line_start = false;
            continue;
        }

        let c = lx.chars[lx.pos];
        if c == '\n' {
            lx.tokens.push(Token::new(TokenKind::Newline, "\n", lx.line, lx.column, lx.pos));
            lx.pos += 1;
            lx.line += 1;
            lx.column = 1;
            at_line_start = true;
            continue;
        }
        if c == ' ' || c == '\t' || c == '\r' {
            lx.pos += 1;
            lx.column += 1;
            continue;
        }
        if c == '#' {
            while lx.pos < lx.chars.len() && lx.chars[lx.pos] != '\n' {
                lx.pos += 1;
                lx.column += 1;
            }
            continue;
        }

        if lex_string_like(&mut lx) {
            continue;
        }
        if c.is_ascii_digit() {
            lex_number(&mut lx);
            continue;
        }
        if c == '@' {
            lex_at(&mut lx);
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            lex_word(&mut lx);
            continue;
        }
        lex_operator(&mut lx);
    }

    if lx.tokens.last().map(|t| t.kind != TokenKind::Newline).unwrap_or(false) {
        lx.tokens.push(Token::new(TokenKind::Newline, "\n", lx.line, lx.column, lx.pos));
    }
    if indent_mode {
        while indents.len() > 1 {
            indents.pop();
            lx.tokens.push(Token::new(TokenKind::Dedent, "", lx.line, 1, lx.pos));
        }
    }
    lx.tokens.push(Token::new(TokenKind::Eof, "", lx.line, lx.column, lx.pos));
    lx.tokens
}

/// Text, byte, and letter literals, including the `r`/`f`/`t8`/`t16`
/// prefixes. Returns false when the cursor is not on one.
fn lex_string_like(lx: &mut Lexer) -> bool {
    let (line, column, start) = (lx.line, lx.column, lx.pos);
    let rest: String = lx.chars[lx.pos..].iter().take(4).collect();

    let (prefix_len, kind, quote) = if rest.starts_with('"') {
        (0, TokenKind::TextLiteral, '"')
    } else if rest.starts_with("r\"") {
        (1, TokenKind::RawTextLiteral, '"')
    } else if rest.starts_with("f\"") {
        (1, TokenKind::FormattedTextLiteral, '"')
    } else if rest.starts_with("t8\"") {
        (2, TokenKind::Text8Literal, '"')
    } else if rest.starts_with("t16\"") {
        (3, TokenKind::Text16Literal, '"')
    } else if rest.starts_with("b'") {
        (1, TokenKind::ByteLiteral, '\'')
    } else if rest.starts_with('\'') {
        (0, TokenKind::LetterLiteral, '\'')
    } else {
        return false;
    };

    let mut end = lx.pos + prefix_len + 1;
    let raw = kind == TokenKind::RawTextLiteral;
    while end < lx.chars.len() {
        let c = lx.chars[end];
        if c == '\\' && !raw {
            end += 2;
            continue;
        }
        if c == quote {
            end += 1;
            break;
        }
        end += 1;
    }
    let text: String = lx.chars[lx.pos..end].iter().collect();
    lx.column += (end - lx.pos) as u32;
    lx.pos = end;
    lx.push(kind, text, line, column, start);
    true
}

fn lex_number(lx: &mut Lexer) {
    let (line, column, start) = (lx.line, lx.column, lx.pos);
    let mut end = lx.pos;
    while end < lx.chars.len() {
        let c = lx.chars[end];
        if c.is_ascii_alphanumeric() || c == '_' {
            end += 1;
            continue;
        }
        // A dot continues the number only when a digit follows.
        if c == '.'
            && end + 1 < lx.chars.len()
            && lx.chars[end + 1].is_ascii_digit()
            && !lx.chars[lx.pos..end].contains(&'.')
        {
            end += 1;
            continue;
        }
        break;
    }
    let text: String = lx.chars[lx.pos..end].iter().collect();

    // The type suffix is whatever follows the last underscore, or for
    // compact forms (`42u8`, `2.5f32`) the run from the first alphabetic
    // character. Radix prefixes only take underscore-separated suffixes.
    let has_radix_prefix = text.starts_with("0x")
        || text.starts_with("0X")
        || text.starts_with("0b")
        || text.starts_with("0B");
    let suffix: String = if let Some(tail) = text.rsplit('_').next().filter(|tail| {
        text.contains('_') && tail.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
    }) {
        tail.to_string()
    } else if !has_radix_prefix {
        match text.find(|c: char| c.is_ascii_alphabetic()) {
            Some(i) => text[i..].to_string(),
            Option::None => String::new(),
        }
    } else {
        String::new()
    };
    let kind = INT_SUFFIXES
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, k)| *k)
        .or_else(|| {
            if MEMORY_UNITS.contains(&suffix.as_str()) {
                Some(TokenKind::MemorySizeLiteral)
            } else if DURATION_UNITS.contains(&suffix.as_str()) {
                Some(TokenKind::DurationLiteral)
            } else {
                Option::None
            }
        })
        .unwrap_or(if text.contains('.') {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        });

    lx.column += (end - lx.pos) as u32;
    lx.pos = end;
    lx.push(kind, text, line, column, start);
}

fn lex_at(lx: &mut Lexer) {
    let (line, column, start) = (lx.line, lx.column, lx.pos);
    let word: String = lx.chars[lx.pos + 1..]
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
        .collect();
    if word == "intrinsic" {
        let len = 1 + word.len();
        lx.column += len as u32;
        lx.pos += len;
        lx.push(TokenKind::IntrinsicAttr, "@intrinsic".to_string(), line, column, start);
    } else {
        lx.column += 1;
        lx.pos += 1;
        lx.push(TokenKind::At, "@".to_string(), line, column, start);
    }
}

fn lex_word(lx: &mut Lexer) {
    let (line, column, start) = (lx.line, lx.column, lx.pos);
    let mut end = lx.pos;
    while end < lx.chars.len() {
        let c = lx.chars[end];
        if c.is_ascii_alphanumeric() || c == '_' {
            end += 1;
        } else {
            break;
        }
    }
    let text: String = lx.chars[lx.pos..end].iter().collect();
    let kind = if text == "_" {
        TokenKind::Underscore
    } else if let Some(kind) = keyword(&text) {
        kind
    } else if text.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false) {
        TokenKind::TypeIdentifier
    } else {
        TokenKind::Identifier
    };
    lx.column += (end - lx.pos) as u32;
    lx.pos = end;
    lx.push(kind, text, line, column, start);
}

fn lex_operator(lx: &mut Lexer) {
    let (line, column, start) = (lx.line, lx.column, lx.pos);
    for (spelling, kind) in OPERATORS {
        let len = spelling.chars().count();
        if lx.pos + len <= lx.chars.len() {
            let candidate: String = lx.chars[lx.pos..lx.pos + len].iter().collect();
            if candidate == *spelling {
                lx.column += len as u32;
                lx.pos += len;
                lx.push(*kind, candidate, line, column, start);
                return;
            }
        }
    }
    // Unknown character: emit and advance so the scan always terminates.
    let text: String = lx.chars[lx.pos..lx.pos + 1].iter().collect();
    lx.column += 1;
    lx.pos += 1;
    lx.push(TokenKind::Unknown, text, line, column, start);
}
