//! Non-fatal authoring problems found during export

use thiserror::Error;

/// What went wrong with a node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IssueKind {
    #[error("bone '{bone}' has a child-of constraint without a target")]
    MissingBoneTarget { bone: String },

    #[error("bone '{bone}' targets unknown node '{target}'")]
    UnresolvedBoneTarget { bone: String, target: String },

    #[error("constraint {side} references unknown node '{target}'")]
    UnresolvedConstraintTarget { side: &'static str, target: String },

    #[error("{reason}")]
    MalformedTransform { reason: String },
}

/// An issue attached to the scene node it was found on
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{node}: {kind}")]
pub struct ExportIssue {
    pub node: String,
    #[source]
    pub kind: IssueKind,
}

impl ExportIssue {
    pub fn new(node: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            node: node.into(),
            kind,
        }
    }
}

/// Receiver for issues reported during export
pub trait ErrorSink {
    fn report(&mut self, issue: ExportIssue);
}

impl ErrorSink for Vec<ExportIssue> {
    fn report(&mut self, issue: ExportIssue) {
        self.push(issue);
    }
}

/// Logs each issue as a warning and keeps a count
#[derive(Debug, Default)]
pub struct TracingSink {
    reported: usize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of issues reported so far
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl ErrorSink for TracingSink {
    fn report(&mut self, issue: ExportIssue) {
        self.reported += 1;
        tracing::warn!(node = %issue.node, "{}", issue.kind);
    }
}

/// Forwards to two sinks
pub struct Tee<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: ErrorSink + ?Sized, B: ErrorSink + ?Sized> ErrorSink for Tee<'_, A, B> {
    fn report(&mut self, issue: ExportIssue) {
        self.first.report(issue.clone());
        self.second.report(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ExportIssue::new(
            "Rig",
            IssueKind::UnresolvedBoneTarget {
                bone: "hand.L".to_string(),
                target: "Sword".to_string(),
            },
        );
        assert_eq!(issue.to_string(), "Rig: bone 'hand.L' targets unknown node 'Sword'");
    }

    #[test]
    fn test_tee_reports_to_both() {
        let mut collected = Vec::new();
        let mut logged = TracingSink::new();
        let mut tee = Tee {
            first: &mut collected,
            second: &mut logged,
        };
        tee.report(ExportIssue::new(
            "C",
            IssueKind::MalformedTransform {
                reason: "zero-length X axis".to_string(),
            },
        ));

        assert_eq!(collected.len(), 1);
        assert_eq!(logged.reported(), 1);
    }
}
