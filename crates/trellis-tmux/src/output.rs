//! Decoding of `-F` formatted command output
//!
//! Commands such as `list-windows -F` print one line per object with the
//! requested format variables separated by a delimiter. A [`FormatStruct`]
//! names the variables it needs, builds the matching `-F` argument, and
//! decodes each output line back into a typed value.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot decode {variable} from {line:?}: {reason}")]
pub struct FormatError {
    pub line: String,
    pub variable: &'static str,
    pub reason: &'static str,
}

/// tmux format variables understood by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    SessionId,
    WindowId,
    WindowWidth,
    WindowHeight,
    WindowLayout,
    PaneId,
}

impl Variable {
    pub fn name(self) -> &'static str {
        match self {
            Variable::SessionId => "session_id",
            Variable::WindowId => "window_id",
            Variable::WindowWidth => "window_width",
            Variable::WindowHeight => "window_height",
            Variable::WindowLayout => "window_layout",
            Variable::PaneId => "pane_id",
        }
    }

    fn decode(self, field: &str) -> Result<Value, &'static str> {
        let id = |sigil: char| {
            field
                .strip_prefix(sigil)
                .ok_or("missing id sigil")?
                .parse()
                .map(Value::Id)
                .map_err(|_| "id is not a number")
        };

        match self {
            Variable::SessionId => id('$'),
            Variable::WindowId => id('@'),
            Variable::PaneId => id('%'),
            Variable::WindowWidth | Variable::WindowHeight => field
                .parse()
                .map(Value::Number)
                .map_err(|_| "not a number"),
            Variable::WindowLayout => Ok(Value::Text(field.to_string())),
        }
    }
}

/// A decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An object id with its sigil stripped
    Id(usize),
    Number(usize),
    Text(String),
}

impl Value {
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Id(n) | Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A record decoded from one line of `-F` output
pub trait FormatStruct: Sized {
    /// Variables in output order
    const VARIABLES: &'static [Variable];

    /// Field separator; the last variable takes the rest of the line
    const DELIMITER: char = ' ';

    /// Build the record from one value per variable
    fn from_values(values: Vec<Value>) -> Option<Self>;

    /// The `-F` argument producing lines this type can decode
    fn format() -> String {
        Self::VARIABLES
            .iter()
            .map(|v| format!("#{{{}}}", v.name()))
            .collect::<Vec<_>>()
            .join(&Self::DELIMITER.to_string())
    }

    fn parse(line: &str) -> Result<Self, FormatError> {
        let error = |variable: &'static str, reason| FormatError {
            line: line.to_string(),
            variable,
            reason,
        };

        let mut rest = line;
        let mut values = Vec::with_capacity(Self::VARIABLES.len());
        for (i, variable) in Self::VARIABLES.iter().enumerate() {
            let last = i + 1 == Self::VARIABLES.len();
            let field = if last {
                std::mem::take(&mut rest)
            } else {
                let (field, tail) = rest
                    .split_once(Self::DELIMITER)
                    .ok_or_else(|| error(variable.name(), "missing field"))?;
                rest = tail;
                field
            };
            values.push(
                variable
                    .decode(field)
                    .map_err(|reason| error(variable.name(), reason))?,
            );
        }

        Self::from_values(values).ok_or_else(|| error("record", "field types do not match"))
    }
}

/// One line of the Viewer's `list-windows` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub session_id: usize,
    pub window_id: usize,
    pub width: usize,
    pub height: usize,
    /// `window_layout` including its checksum prefix
    pub layout: String,
}

impl FormatStruct for WindowRecord {
    const VARIABLES: &'static [Variable] = &[
        Variable::SessionId,
        Variable::WindowId,
        Variable::WindowWidth,
        Variable::WindowHeight,
        Variable::WindowLayout,
    ];

    fn from_values(values: Vec<Value>) -> Option<Self> {
        let mut values = values.into_iter();
        Some(Self {
            session_id: values.next()?.as_usize()?,
            window_id: values.next()?.as_usize()?,
            width: values.next()?.as_usize()?,
            height: values.next()?.as_usize()?,
            layout: values.next()?.into_text()?,
        })
    }
}
