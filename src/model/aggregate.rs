use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::model::DataType;

/// Characters that start a member path suffix in a parameter path.
pub const MEMBER_SEPARATORS: [char; 2] = ['.', '['];

/// One subscript of an array element selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subscript {
    Index(usize),
    /// Any element. Produced by member search when it descends into an
    /// array; never produced by the parser.
    Any,
}

/// A field selector, optionally followed by array subscripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathElement {
    pub name: Option<String>,
    pub index: Vec<Subscript>,
}

impl PathElement {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            index: Vec::new(),
        }
    }
}

/// Path to a member inside an aggregate or array valued parameter,
/// e.g. `.position.x` or `.samples[3].value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AggregatePath(pub Vec<PathElement>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PathSyntaxError(pub String);

impl AggregatePath {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// Name of the last field selector, if any.
    pub fn last_name(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|el| el.name.as_deref())
    }

    /// Position of the member path suffix in a parameter path: the first
    /// `.` or `[` after the last `/`.
    pub fn find_separator(path: &str) -> Option<usize> {
        let start = path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
        path[start..]
            .find(&MEMBER_SEPARATORS[..])
            .map(|idx| idx + start)
    }

    /// Parse a suffix such as `.a.b[3][2].c` or `[1].x`.
    pub fn parse(suffix: &str) -> Result<Self, PathSyntaxError> {
        let mut elements = Vec::new();
        let mut chars = suffix.chars().peekable();

        if !matches!(chars.peek(), Some('.') | Some('[')) {
            return Err(PathSyntaxError(format!(
                "member path must start with '.' or '[': {}",
                suffix
            )));
        }

        // A leading '[' subscripts the parameter value itself.
        let mut first = true;
        while chars.peek().is_some() {
            let mut element = PathElement {
                name: None,
                index: Vec::new(),
            };

            if chars.peek() == Some(&'.') {
                chars.next();
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    if c == ']' || c == '/' {
                        return Err(PathSyntaxError(format!(
                            "unexpected '{}' in member path {}",
                            c, suffix
                        )));
                    }
                    name.push(c);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(PathSyntaxError(format!(
                        "empty member name in {}",
                        suffix
                    )));
                }
                element.name = Some(name);
            } else if !first {
                return Err(PathSyntaxError(format!(
                    "expected '.' in member path {}",
                    suffix
                )));
            }

            while chars.peek() == Some(&'[') {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(c) if c.is_ascii_digit() => digits.push(c),
                        Some(c) => {
                            return Err(PathSyntaxError(format!(
                                "invalid array index character '{}' in {}",
                                c, suffix
                            )))
                        }
                        None => {
                            return Err(PathSyntaxError(format!(
                                "unterminated array index in {}",
                                suffix
                            )))
                        }
                    }
                }
                let index = digits.parse::<usize>().map_err(|_| {
                    PathSyntaxError(format!("invalid array index in {}", suffix))
                })?;
                element.index.push(Subscript::Index(index));
            }

            elements.push(element);
            first = false;
        }

        Ok(Self(elements))
    }

    /// True if every selector of the path exists in `data_type`: named
    /// fields must be members of an aggregate and subscripts must match
    /// the rank of an array.
    pub fn verify(&self, data_type: &DataType) -> bool {
        let mut current = data_type;
        for element in &self.0 {
            if let Some(name) = &element.name {
                match current.member(name) {
                    Some(member) => current = &member.data_type,
                    None => return false,
                }
            }
            if !element.index.is_empty() {
                match current {
                    DataType::Array {
                        dimensions,
                        element: item,
                    } if *dimensions == element.index.len() => current = item,
                    _ => return false,
                }
            }
        }
        true
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        for subscript in &self.index {
            match subscript {
                Subscript::Index(i) => write!(f, "[{}]", i)?,
                Subscript::Any => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for AggregatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            if element.name.is_some() {
                f.write_str(".")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl Serialize for AggregatePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
