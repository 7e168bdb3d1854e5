// Procedure Kind

use serde::{Deserialize, Serialize};

/// Advisory classification of a procedure.
///
/// Queries are side-effect free and safe to retry; mutations may change
/// store state. The router checks that a call's declared kind matches the
/// procedure it targets, but runs both kinds the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }

    /// Queries can be re-sent after a transport failure without changing state.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, ProcedureKind::Query)
    }
}

impl std::fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_value(ProcedureKind::Query).unwrap(), "query");
        assert_eq!(
            serde_json::from_value::<ProcedureKind>(serde_json::json!("mutation")).unwrap(),
            ProcedureKind::Mutation
        );
        assert!(serde_json::from_value::<ProcedureKind>(serde_json::json!("subscription")).is_err());
    }

    #[test]
    fn test_only_queries_are_idempotent() {
        assert!(ProcedureKind::Query.is_idempotent());
        assert!(!ProcedureKind::Mutation.is_idempotent());
    }
}
