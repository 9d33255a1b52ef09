//! Parser for the FTS full-text search query language.
//!
//! Queries parse into a tagged [`AstNode`] tree for a downstream query
//! builder. The language supports:
//!
//! - **Terms and phrases**: `rust`, `"error handling"`, `=exact`, `~synonym`
//! - **Prefixes**: `+must`, `-never`, `|maybe`, `NOT x`, `!x`
//! - **Boolean operators**: `a AND b`, `a OR b`, `&&`, `||`, and an implicit
//!   connector chosen by [`Mode`]
//! - **Fields**: `title:guide`, `cm:name:report`, `@{uri}name:x`, `title:(a b)`
//! - **Suffixes**: `word~0.8` fuzziness, `"a b"~2` slop, `x^2.5` boost
//! - **Ranges**: `[1 TO 10]`, `<a TO b]`, `1..10`
//! - **Proximity**: `a * b`, `a *(5) b`
//! - **Templates**: `%title`, `%(title, cm:name)`
//!
//! [`Mode::Cmis`] restricts input to the CMIS `contains()` subset.
//!
//! # Example
//!
//! ```
//! use fts_query::{ParserConfig, parse};
//!
//! let ast = parse("title:guide (rust OR golang) -deprecated", &ParserConfig::default()).unwrap();
//! assert_eq!(ast.kind.name(), "CONJUNCTION");
//! assert_eq!(ast.children.len(), 3);
//! ```

#![warn(missing_docs)]

mod ast;
mod config;
mod error;
mod lexer;
mod parser;
mod token;

pub use ast::{AstKind, AstNode};
pub use config::{Mode, ParserConfig};
pub use error::{
    ErrorKind, LexError, MAX_NESTING_DEPTH, ParseError, Position, QueryError, QueryErrorKind,
};
pub use lexer::tokenize;
pub use parser::{Parser, parse, parse_tokens};
pub use token::{Cursor, Mark, Token, TokenKind};
