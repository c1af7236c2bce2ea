#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("unclosed angle bracket at position {0}")]
    UnclosedBracket(usize),
    #[error("unclosed square bracket at position {0}")]
    UnclosedSquareBracket(usize),
    #[error("expected '<' or '[' at position {position}, found '{found}'")]
    UnexpectedCharacter { position: usize, found: char },
    #[error("definition has no specification for argument {0}")]
    MissingArgument(usize),
    #[error("empty alternative in argument {0}")]
    EmptyAlternative(usize),
    #[error("unknown type '{name}' in argument {index}")]
    UnknownType { index: usize, name: String },
}
