//! Pipeline stages of a conversation turn.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// A named checkpoint in a turn's processing pipeline.
///
/// Ordered as the turn advances: input received, enriched by middleware,
/// output produced, context stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Input,
    Middleware,
    Output,
    Store,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Input, Stage::Middleware, Stage::Output, Stage::Store];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "INPUT",
            Stage::Middleware => "MIDDLEWARE",
            Stage::Output => "OUTPUT",
            Stage::Store => "STORE",
        }
    }

    /// The earlier stage whose checks this stage runs first, if any.
    ///
    /// Only MIDDLEWARE composes an earlier stage; OUTPUT and STORE are
    /// checked on their own fields.
    pub fn prerequisite(&self) -> Option<Stage> {
        match self {
            Stage::Middleware => Some(Stage::Input),
            Stage::Input | Stage::Output | Stage::Store => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStage { stage: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_literal() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase_literals() {
        for literal in ["FOO", "input", "", "STORE "] {
            let err = literal.parse::<Stage>().unwrap_err();
            assert_eq!(err.kind(), "INVALID_STAGE");
        }
    }

    #[test]
    fn only_middleware_has_a_prerequisite() {
        assert_eq!(Stage::Middleware.prerequisite(), Some(Stage::Input));
        assert_eq!(Stage::Input.prerequisite(), None);
        assert_eq!(Stage::Output.prerequisite(), None);
        assert_eq!(Stage::Store.prerequisite(), None);
    }

    #[test]
    fn stages_are_ordered_along_the_turn() {
        assert!(Stage::Input < Stage::Middleware);
        assert!(Stage::Output < Stage::Store);
    }
}
