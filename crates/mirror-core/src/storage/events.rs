//! Events the remote-storage SDK delivers to its listeners.

use serde::{Deserialize, Serialize};

use super::types::{ApiError, RemoteNode, RequestKind, TransferInfo};

/// A typed callback from the SDK.
///
/// Produced only by the SDK's callback context and consumed only by the
/// listener attached to the client that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    /// A request finished, successfully when `error` is `None`.
    RequestFinished {
        kind: RequestKind,
        /// Resolved node for `GetPublicNode` requests.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        public_node: Option<RemoteNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ApiError>,
    },

    /// A request hit a temporary error.
    RequestTemporaryError { error: ApiError },

    /// Progress of an active transfer.
    TransferProgress { transfer: TransferInfo },

    /// A transfer reached its end, successfully when `error` is `None`.
    TransferFinished {
        transfer: TransferInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ApiError>,
    },

    /// A transfer hit a temporary error in the given state.
    TransferTemporaryError {
        transfer: TransferInfo,
        error: ApiError,
    },
}

impl TransferEvent {
    /// Successful completion of a request.
    #[must_use]
    pub const fn request_ok(kind: RequestKind) -> Self {
        Self::RequestFinished {
            kind,
            public_node: None,
            error: None,
        }
    }

    /// Failed completion of a request.
    #[must_use]
    pub const fn request_failed(kind: RequestKind, error: ApiError) -> Self {
        Self::RequestFinished {
            kind,
            public_node: None,
            error: Some(error),
        }
    }

    /// Successful public-node resolution.
    #[must_use]
    pub const fn public_node_resolved(node: RemoteNode) -> Self {
        Self::RequestFinished {
            kind: RequestKind::GetPublicNode,
            public_node: Some(node),
            error: None,
        }
    }

    /// Short name of the variant, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RequestFinished { .. } => "request_finished",
            Self::RequestTemporaryError { .. } => "request_temporary_error",
            Self::TransferProgress { .. } => "transfer_progress",
            Self::TransferFinished { .. } => "transfer_finished",
            Self::TransferTemporaryError { .. } => "transfer_temporary_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = TransferEvent::request_failed(RequestKind::Login, ApiError::new(-26, "2FA"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"request_finished""#));
        assert!(json.contains("2FA"));
        assert!(!json.contains("public_node"));
    }

    #[test]
    fn test_public_node_helper_sets_kind() {
        let event = TransferEvent::public_node_resolved(RemoteNode::file(7, "a.bin"));
        match event {
            TransferEvent::RequestFinished {
                kind, public_node, ..
            } => {
                assert_eq!(kind, RequestKind::GetPublicNode);
                assert_eq!(public_node.map(|n| n.handle), Some(7));
            }
            other => panic!("unexpected event {}", other.name()),
        }
    }
}
