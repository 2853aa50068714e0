//! Field tag parsing
//!
//! A field's raw tag follows the struct-tag convention: space separated
//! `key:"value"` pairs with Go-style quoting. The value stored under the
//! configured key (default `autoTable`) is a comma separated option list:
//!
//! ```text
//! autoTable:"column:price,type:DECIMAL(10,2),default:0,index:idx_price" json:"price"
//! ```
//!
//! Commas inside parentheses do not split options.

use autotable_core::{EngineError, EngineResult};

/// Default struct tag key holding the option list
pub const DEFAULT_TAG_KEY: &str = "autoTable";

const TAG_DEFAULT: &str = "default";
const TAG_PRIMARY_KEY: &str = "pk";
const TAG_AUTO_INCREMENT: &str = "autoincrement";
const TAG_INDEX: &str = "index";
const TAG_UNIQUE: &str = "unique";
const TAG_COLUMN: &str = "column";
const TAG_TYPE: &str = "type";
const TAG_NULL: &str = "null";
const TAG_EXTRA: &str = "extra";
const TAG_IGNORE: &str = "-";

// ============================================================================
// TagOption
// ============================================================================

/// A single option of the option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOption {
    /// `default:<value>`; a bare `default` carries no value
    Default(Option<String>),
    /// `pk`
    PrimaryKey,
    /// `autoincrement`
    AutoIncrement,
    /// `index[:<name>]`
    Index(Option<String>),
    /// `unique[:<name>]`
    Unique(Option<String>),
    /// `column:<name>`
    Column(String),
    /// `type:<column type>`
    Type(String),
    /// `null`
    Null,
    /// `extra:<clause>`
    Extra(String),
    /// `-`
    Ignore,
}

impl TagOption {
    /// Parse one option token
    pub fn parse(token: &str) -> EngineResult<Self> {
        let (name, value) = match token.split_once(':') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        let required = |value: Option<String>| {
            value.ok_or_else(|| EngineError::MissingTagParameter(name.to_string()))
        };

        let option = match name {
            TAG_DEFAULT => TagOption::Default(value),
            TAG_PRIMARY_KEY => TagOption::PrimaryKey,
            TAG_AUTO_INCREMENT => TagOption::AutoIncrement,
            TAG_INDEX => TagOption::Index(value),
            TAG_UNIQUE => TagOption::Unique(value),
            TAG_COLUMN => TagOption::Column(required(value)?),
            TAG_TYPE => TagOption::Type(required(value)?),
            TAG_NULL => TagOption::Null,
            TAG_EXTRA => TagOption::Extra(required(value)?),
            TAG_IGNORE => TagOption::Ignore,
            _ => return Err(EngineError::UnknownTagOption(token.to_string())),
        };
        Ok(option)
    }
}

// ============================================================================
// TagOptions
// ============================================================================

/// All options of one field, folded together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    pub default: Option<String>,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Index names; an empty name asks for a generated one
    pub indexes: Vec<String>,
    /// Unique index names; an empty name asks for a generated one
    pub uniques: Vec<String>,
    pub column: Option<String>,
    pub column_type: Option<String>,
    pub nullable: bool,
    pub extra: Option<String>,
    pub ignore: bool,
}

impl TagOptions {
    /// Parse a comma separated option list
    pub fn parse(options: &str) -> EngineResult<Self> {
        let mut parsed = Self::default();
        for token in split_options(options) {
            parsed.apply(TagOption::parse(token)?);
        }
        Ok(parsed)
    }

    /// Extract the option list stored under `key` in a raw tag and parse it.
    ///
    /// A missing tag or a tag without `key` yields empty options.
    pub fn from_tag(raw: Option<&str>, key: &str) -> EngineResult<Self> {
        match raw {
            Some(raw) => match lookup(raw, key)? {
                Some(options) => Self::parse(&options),
                None => Ok(Self::default()),
            },
            None => Ok(Self::default()),
        }
    }

    fn apply(&mut self, option: TagOption) {
        match option {
            TagOption::Default(value) => {
                if value.is_some() {
                    self.default = value;
                }
            }
            TagOption::PrimaryKey => self.primary_key = true,
            TagOption::AutoIncrement => self.auto_increment = true,
            TagOption::Index(name) => self.indexes.push(name.unwrap_or_default()),
            TagOption::Unique(name) => self.uniques.push(name.unwrap_or_default()),
            TagOption::Column(name) => self.column = Some(name),
            TagOption::Type(name) => self.column_type = Some(name),
            TagOption::Null => self.nullable = true,
            TagOption::Extra(clause) => self.extra = Some(clause),
            TagOption::Ignore => self.ignore = true,
        }
    }
}

// ============================================================================
// Splitting and lookup
// ============================================================================

/// Split an option list on commas that are not inside parentheses.
///
/// Tokens are trimmed and empty tokens are dropped.
pub fn split_options(options: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in options.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(&options[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&options[start..]);

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Look up the value stored under `key` in a struct tag.
///
/// Returns `Ok(None)` when the key is absent and an error when the tag does
/// not follow the `key:"value"` convention.
pub fn lookup(raw: &str, key: &str) -> EngineResult<Option<String>> {
    let mut rest = raw;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return Ok(None);
        }

        let name_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_end == 0 || !rest[name_end..].starts_with(":\"") {
            return Err(EngineError::malformed_tag(
                raw,
                "expected key:\"value\" pairs",
            ));
        }
        let name = &rest[..name_end];
        let quoted = &rest[name_end + 1..];

        let (value, consumed) = unquote(quoted).map_err(|msg| EngineError::malformed_tag(raw, msg))?;
        if name == key {
            return Ok(Some(value));
        }
        rest = &quoted[consumed..];
    }
}

/// Decode a double-quoted string at the start of `quoted`.
///
/// Returns the decoded value and the number of bytes consumed.
fn unquote(quoted: &str) -> Result<(String, usize), &'static str> {
    let mut value = String::new();
    let mut chars = quoted.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, i + 1)),
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some(_) => return Err("unsupported escape sequence"),
                None => return Err("unterminated quoted value"),
            },
            c => value.push(c),
        }
    }

    Err("unterminated quoted value")
}

// ============================================================================
// Tests
// ============================================================================
