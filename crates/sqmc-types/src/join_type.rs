//! Join types

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// Keyword text rendered before ` join `
    pub const fn sql_text(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left outer",
            Self::Right => "right outer",
            Self::Full => "full outer",
            Self::Cross => "cross",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_text())
    }
}
