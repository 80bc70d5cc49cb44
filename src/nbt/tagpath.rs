use std::fmt::Display;
use std::str::FromStr;

use chumsky::prelude::*;
use chumsky::text;

use thiserror::Error;

use crate::McResult;

/// A single step in a [TagPath].
/// Indices may be negative, in which case they count back from the end of a List.
#[derive(PartialEq, Eq,PartialOrd, Ord, Clone, Hash, Debug)]
pub enum TagPathPart {
    AtIndex(i64),
    AtKey(String),
}

macro_rules! tag_path_part_from_impl {
    ($valname:ident : $from_type:ty; AtKey($value:expr)) => {
        impl From<$from_type> for TagPathPart {
            fn from($valname: $from_type) -> Self {
                TagPathPart::AtKey($value)
            }
        }
    };
    ($($from_type:ty),+; Numeric) => {
        $(
            impl From<$from_type> for TagPathPart {
                fn from(value: $from_type) -> Self {
                    TagPathPart::AtIndex(value as i64)
                }
            }
        )+
    };
}

tag_path_part_from_impl!(value:&str; AtKey(value.to_owned()));
tag_path_part_from_impl!(value:String; AtKey(value));
tag_path_part_from_impl!(isize, usize, i64, i32, u32, i16, u16, i8, u8; Numeric);

#[derive(Debug, Error)]
pub enum TagPathError {
    #[error("Tag path could not be tokenized: {0:?}")]
    TokenizeError(Vec<Simple<char>>),
    #[error("Tag path could not be parsed: {0:?}")]
    ParseError(Vec<Simple<TagPathToken>>),
}

/// A path into an NBT tree, such as `Level.Sections[0].BlockStates`.
///
/// Keys are written bare when they are identifiers, and as quoted strings
/// inside brackets otherwise (`["odd key"]`). Integers in brackets are List
/// indices. The empty path refers to the root.
#[derive(PartialEq, Eq,PartialOrd, Ord, Clone, Hash, Debug, Default)]
pub struct TagPath(pub Vec<TagPathPart>);

impl TagPath {
    /// The empty path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn parse<S: AsRef<str>>(source: S) -> Result<Self, TagPathError> {
        let source = source.as_ref();
        if source.trim().is_empty() {
            return Ok(Self::root());
        }
        let tokens = TagPathToken::parse(source)
            .map_err(TagPathError::TokenizeError)?;
        let path = tag_path_parser().parse(tokens)
            .map_err(TagPathError::ParseError)?;
        Ok(Self(path))
    }

    pub fn parts(&self) -> &[TagPathPart] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the final part along with the parts leading up to it.
    pub fn split_last(&self) -> Option<(&TagPathPart, &[TagPathPart])> {
        self.0.split_last()
    }

    pub fn push<T: Into<TagPathPart>>(&mut self, part: T) {
        self.0.push(part.into());
    }

    pub fn join<T: Into<TagPathPart>>(&self, part: T) -> TagPath {
        let mut parts = self.0.clone();
        parts.push(part.into());
        TagPath(parts)
    }
}

impl FromStr for TagPath {
    type Err = TagPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagPath::parse(s)
    }
}

impl From<Vec<TagPathPart>> for TagPath {
    fn from(value: Vec<TagPathPart>) -> Self {
        TagPath(value)
    }
}

impl<T: Into<TagPathPart>> FromIterator<T> for TagPath {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        TagPath(iter.into_iter().map(T::into).collect())
    }
}

/// Anything that names a location in an NBT tree.
/// Strings are parsed with [TagPath::parse].
pub trait IntoTagPath {
    fn into_tag_path(self) -> McResult<TagPath>;
}

impl IntoTagPath for TagPath {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(self)
    }
}

impl IntoTagPath for &TagPath {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(self.clone())
    }
}

impl IntoTagPath for &str {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(TagPath::parse(self)?)
    }
}

impl IntoTagPath for &String {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(TagPath::parse(self)?)
    }
}

impl IntoTagPath for String {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(TagPath::parse(self)?)
    }
}

impl IntoTagPath for Vec<TagPathPart> {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(TagPath(self))
    }
}

impl IntoTagPath for &[TagPathPart] {
    fn into_tag_path(self) -> McResult<TagPath> {
        Ok(TagPath(self.to_vec()))
    }
}

#[derive(PartialEq, Eq,PartialOrd, Ord, Clone, Hash, Debug)]
pub enum TagPathToken {
    Dot,
    OpenBracket,
    CloseBracket,
    Integer(String),
    Identifier(String),
    StringLiteral(String),
}

// Each entry becomes a token parser function, and `parse` tries them in the
// order they are listed here:
//     name => { /* parser initialization */ }
macro_rules! token_parse_functions {
    ($($name:ident => $block:block)+) => {
        impl TagPathToken {
            $(
                pub fn $name() -> impl Parser<char, TagPathToken, Error = Simple<char>>
                $block
            )+

            pub fn parse<S: AsRef<str>>(source: S) -> Result<Vec<TagPathToken>, Vec<Simple<char>>> {
                choice((
                    $(
                        Self::$name(),
                    )+
                ))
                .padded() // each token may be padded with whitespace
                .repeated().at_least(1)
                .then_ignore(end()) // Force read until end.
                .collect::<Vec<TagPathToken>>()
                .parse(source.as_ref())
            }
        }
    };
}

token_parse_functions!{
    open_bracket => { just('[').to(TagPathToken::OpenBracket).labelled("Open Bracket") }
    dot => { just('.').to(TagPathToken::Dot).labelled("Dot") }
    close_bracket => { just(']').to(TagPathToken::CloseBracket).labelled("Close Bracket") }
    integer => {
        just::<char, _, Simple<char>>('-')
            .or_not()
            .chain::<char, _, _>(text::int(10))
            .collect::<String>()
            // An integer followed by identifier characters is an identifier.
            .then_ignore(choice((
                filter(|c: &char| {
                    !c.is_alphanumeric() && !['_', '+', '-'].contains(c)
                }),
                end().to('\0')
            )).rewind())
            .map(TagPathToken::Integer)
            .labelled("Integer")
    }
    identifier => {
        choice((
            filter(char::is_ascii_alphanumeric),
            one_of("+-_")
        ))
        .repeated().at_least(1)
        .collect::<String>()
        .map(TagPathToken::Identifier)
        .labelled("Identifier")
    }
    string_literal => {
        let escape = just::<_,_,Simple<char>>('\\').ignore_then(
            just('\\')
                .or(just('/'))
                .or(just('"'))
                .or(just('\'')) // Look carefully, this is -> '
                .or(just('b').to('\x08'))
                .or(just('f').to('\x0C'))
                .or(just('n').to('\n'))
                .or(just('r').to('\r'))
                .or(just('t').to('\t'))
        );
        choice::<_,Simple<char>>((
            just('"')
                .ignore_then(
                    none_of("\\\"").or(escape.clone()).repeated()
                )
                .then_ignore(just('"'))
                .collect::<String>(),
            just('\'')
                .ignore_then(
                    none_of("\\'").or(escape).repeated()
                )
                .then_ignore(just('\''))
                .collect::<String>(),
        ))
        .map(TagPathToken::StringLiteral)
        .labelled("String Literal")
    }
}

/// Returns a parser that takes [TagPathToken] as input and returns the parts of a [TagPath].
fn tag_path_parser() -> impl Parser<TagPathToken, Vec<TagPathPart>, Error = Simple<TagPathToken>> {
    let bracketed = just(TagPathToken::OpenBracket).ignore_then(
        filter(|token: &TagPathToken| matches!(token, TagPathToken::Integer(_) | TagPathToken::StringLiteral(_) | TagPathToken::Identifier(_)))
            .try_map(|token, span| {
                match token {
                    TagPathToken::Integer(digits) => {
                        digits.parse::<i64>()
                            .map(TagPathPart::AtIndex)
                            .map_err(|_| Simple::custom(span, "Failed to parse i64."))
                    },
                    TagPathToken::Identifier(ident) => Ok(TagPathPart::AtKey(ident)),
                    TagPathToken::StringLiteral(ident) => Ok(TagPathPart::AtKey(ident)),
                    _ => Err(Simple::custom(span, "Impossible failure.")),
                }
            })
    ).then_ignore(just(TagPathToken::CloseBracket));

    let ident = filter(|token: &TagPathToken| matches!(token, TagPathToken::Identifier(_)))
        .try_map(|token, span| {
            match token {
                TagPathToken::Identifier(ident) => Ok(TagPathPart::AtKey(ident)),
                _ => Err(Simple::custom(span, "Impossible failure.")),
            }
        });

    let dot = just(TagPathToken::Dot).ignore_then(ident.clone());

    let part = choice((
        bracketed,
        dot,
    ));

    choice((
        ident.chain(part.clone().repeated()).then_ignore(end()),
        part.repeated().then_ignore(end()),
    ))
}

/// Whether a key can be written without brackets and still parse back as a key.
fn is_bare_key(key: &str) -> bool {
    crate::nbt::format::is_identifier(key) && key.parse::<i64>().is_err()
}

impl Display for TagPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().enumerate().try_for_each(|(position, part)| {
            match part {
                TagPathPart::AtIndex(index) => write!(f, "[{index}]"),
                TagPathPart::AtKey(key) if is_bare_key(key) => {
                    if position > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")
                },
                TagPathPart::AtKey(key) => {
                    write!(f, "[\"")?;
                    crate::nbt::format::write_escaped_string(f, key)?;
                    write!(f, "\"]")
                },
            }
        })
    }
}
