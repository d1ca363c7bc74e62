//! Errors of the greedy facility location.
//!
//! Two families: configuration errors (the problem is not well posed, some cost is missing or invalid)
//! and invariant violations (the greedy loop cannot make progress). None of them is recoverable inside
//! the algorithm, they are returned to the caller as is.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlpError {
    #[error("no facility given")]
    NoFacility,
    #[error("no client given")]
    NoClient,
    #[error("missing opening cost for facility {facility}")]
    MissingOpeningCost { facility: String },
    #[error("missing connection cost for client {client} and facility {facility}")]
    MissingConnectionCost { client: String, facility: String },
    #[error("{what} : expected {expected} values, got {got}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        got: usize,
    },
    /// a cost must be finite and non negative
    #[error("invalid cost {value} for {what}")]
    InvalidCost { what: String, value: String },
    #[error("no candidate facility at round {round} while {nb_unserved} clients are unserved")]
    NoCandidate { round: usize, nb_unserved: usize },
    #[error("round {round} exceeds bound {bound}, {nb_unserved} clients still unserved")]
    RoundBound {
        round: usize,
        bound: usize,
        nb_unserved: usize,
    },
} // end of FlpError

impl FlpError {
    /// true if the error comes from the cost data given to the solver
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FlpError::NoFacility
                | FlpError::NoClient
                | FlpError::MissingOpeningCost { .. }
                | FlpError::MissingConnectionCost { .. }
                | FlpError::ShapeMismatch { .. }
                | FlpError::InvalidCost { .. }
        )
    }

    /// true if the greedy loop itself got stuck
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            FlpError::NoCandidate { .. } | FlpError::RoundBound { .. }
        )
    }

    pub(crate) fn missing_opening<F: std::fmt::Debug>(facility: F) -> Self {
        FlpError::MissingOpeningCost {
            facility: format!("{:?}", facility),
        }
    }

    pub(crate) fn missing_connection<C: std::fmt::Debug, F: std::fmt::Debug>(
        client: C,
        facility: F,
    ) -> Self {
        FlpError::MissingConnectionCost {
            client: format!("{:?}", client),
            facility: format!("{:?}", facility),
        }
    }
} // end of impl FlpError

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn error_classes() {
        let err = FlpError::missing_connection(3u32, 4u32);
        assert!(err.is_configuration());
        assert!(!err.is_invariant_violation());
        assert_eq!(
            err.to_string(),
            "missing connection cost for client 3 and facility 4"
        );
        //
        let err = FlpError::NoCandidate {
            round: 2,
            nb_unserved: 5,
        };
        assert!(err.is_invariant_violation());
        assert!(!err.is_configuration());
    }
} // end of mod tests
