//! Definition strings and the expected types they declare.
//!
//! A definition such as `<role:Role> [target:User|string]` is a sequence of
//! argument specifications: `<...>` for required arguments, `[...]` for
//! optional ones. Inside the delimiters, `|` separates alternatives of the
//! form `name[:type]`. A name wrapped in a pair of quotes (`"yes"`, `'no'`,
//! `` `x` ``) is a literal that the token must equal exactly.

use std::fmt;
use std::str::FromStr;

use super::DefinitionError;
use super::format::DEFAULT_QUOTES;

/// The closed set of types an alternative can expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Literal,
    String,
    Number,
    Boolean,
    Channel,
    Role,
    User,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Literal => "literal",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Channel => "Channel",
            TypeTag::Role => "Role",
            TypeTag::User => "User",
        }
    }

    /// Whether matching this type needs a lookup collaborator.
    pub fn is_entity(&self) -> bool {
        matches!(self, TypeTag::Channel | TypeTag::Role | TypeTag::User)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(TypeTag::Literal),
            "string" => Ok(TypeTag::String),
            "number" => Ok(TypeTag::Number),
            "boolean" => Ok(TypeTag::Boolean),
            "Channel" => Ok(TypeTag::Channel),
            "Role" => Ok(TypeTag::Role),
            "User" => Ok(TypeTag::User),
            _ => Err(()),
        }
    }
}

/// One alternative of an argument specification.
///
/// For [`TypeTag::Literal`] entries `name` holds the literal text to match
/// (quotes removed), not a parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedType {
    pub position: usize,
    pub name: String,
    pub tag: TypeTag,
}

/// A single argument specification: requiredness plus its alternatives, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub position: usize,
    pub required: bool,
    pub alternatives: Vec<ExpectedType>,
}

impl Argument {
    /// Name used in messages about this argument: the first alternative's.
    pub fn primary_name(&self) -> &str {
        self.alternatives
            .first()
            .map(|alt| alt.name.as_str())
            .unwrap_or_default()
    }

    pub fn accepts(&self, tag: TypeTag) -> bool {
        self.alternatives.iter().any(|alt| alt.tag == tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.alternatives.iter().map(|alt| alt.tag)
    }

    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.alternatives
            .iter()
            .filter(|alt| alt.tag == TypeTag::Literal)
            .map(|alt| alt.name.as_str())
    }

    /// Every expected type joined with "or", as shown in type-mismatch messages.
    pub fn expected_description(&self) -> String {
        self.tags()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// A parsed definition string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Definition {
    arguments: Vec<Argument>,
}

impl Definition {
    /// Parse the first `length` argument specifications of `text`.
    ///
    /// Text after the `length`-th specification is ignored.
    pub fn parse(text: &str, length: usize) -> Result<Self, DefinitionError> {
        let mut slicer = Slicer::new(text);
        let arguments = (0..length)
            .map(|position| slicer.next_argument(position))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { arguments })
    }

    /// Parse every argument specification in `text`.
    pub fn parse_all(text: &str) -> Result<Self, DefinitionError> {
        let mut slicer = Slicer::new(text);
        let mut arguments = Vec::new();
        while !slicer.is_exhausted() {
            arguments.push(slicer.next_argument(arguments.len())?);
        }
        Ok(Self { arguments })
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// All expected-type entries, position by position.
    pub fn expected_types(&self) -> impl Iterator<Item = &ExpectedType> {
        self.arguments.iter().flat_map(|arg| arg.alternatives.iter())
    }
}

/// Left-to-right cursor over the unconsumed part of a definition string.
struct Slicer<'a> {
    rest: &'a str,
    offset: usize,
}

impl<'a> Slicer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            offset: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.rest.is_empty()
    }

    fn next_argument(&mut self, position: usize) -> Result<Argument, DefinitionError> {
        let (required, close) = match self.rest.chars().next() {
            Some('<') => (true, '>'),
            Some('[') => (false, ']'),
            Some(found) => {
                return Err(DefinitionError::UnexpectedCharacter {
                    position: self.offset,
                    found,
                });
            }
            None => return Err(DefinitionError::MissingArgument(position)),
        };

        let Some(close_at) = self.rest.find(close) else {
            return Err(if required {
                DefinitionError::UnclosedBracket(self.offset)
            } else {
                DefinitionError::UnclosedSquareBracket(self.offset)
            });
        };

        let interior = &self.rest[1..close_at];
        let alternatives = split_alternatives(interior)
            .map(|alt| parse_alternative(position, alt))
            .collect::<Result<Vec<_>, _>>()?;

        self.advance(close_at + 1);
        // One separator between specifications.
        if self.rest.starts_with(char::is_whitespace) {
            let width = self.rest.chars().next().map_or(0, char::len_utf8);
            self.advance(width);
        }

        Ok(Argument {
            position,
            required,
            alternatives,
        })
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
        self.offset += bytes;
    }
}

/// Split on `|`, dropping at most one space on either side of each bar.
fn split_alternatives(interior: &str) -> impl Iterator<Item = &str> {
    let count = interior.split('|').count();
    interior.split('|').enumerate().map(move |(i, part)| {
        let part = if i > 0 {
            part.strip_prefix(' ').unwrap_or(part)
        } else {
            part
        };
        if i + 1 < count {
            part.strip_suffix(' ').unwrap_or(part)
        } else {
            part
        }
    })
}

fn parse_alternative(position: usize, alt: &str) -> Result<ExpectedType, DefinitionError> {
    let (name, explicit) = match alt.split_once(':') {
        Some((name, ty)) if !ty.is_empty() => (name, Some(ty)),
        Some((name, _)) => (name, None),
        None => (alt, None),
    };

    if name.is_empty() {
        return Err(DefinitionError::EmptyAlternative(position));
    }

    let literal_quote = literal_quote(name);
    let name = match literal_quote {
        Some(quote) => name.replace(quote, ""),
        None => name.to_string(),
    };

    let tag = match explicit {
        Some(ty) => ty.parse::<TypeTag>().map_err(|()| DefinitionError::UnknownType {
            index: position,
            name: ty.to_string(),
        })?,
        None if literal_quote.is_some() => TypeTag::Literal,
        None => TypeTag::String,
    };

    Ok(ExpectedType { position, name, tag })
}

/// The first quote character in `name`, if it occurs there at least twice.
fn literal_quote(name: &str) -> Option<char> {
    let quote = name.chars().find(|c| DEFAULT_QUOTES.contains(c))?;
    (name.matches(quote).count() >= 2).then_some(quote)
}
