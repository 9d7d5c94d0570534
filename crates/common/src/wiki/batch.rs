use std::future::Future;

use serde::{Deserialize, Serialize};

use super::error::WikiError;
use super::tree_ops::SubtreeReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOpKind {
    Delete,
    Copy,
    Move,
}

/// One slot of a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOperation {
    #[serde(rename = "operation")]
    pub kind: BatchOpKind,
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    #[serde(default)]
    pub is_directory: bool,
}

impl BatchOperation {
    pub fn delete(source: impl Into<String>, is_directory: bool) -> Self {
        Self {
            kind: BatchOpKind::Delete,
            source_path: source.into(),
            destination_path: None,
            is_directory,
        }
    }

    pub fn copy(source: impl Into<String>, destination: impl Into<String>, is_directory: bool) -> Self {
        Self {
            kind: BatchOpKind::Copy,
            source_path: source.into(),
            destination_path: Some(destination.into()),
            is_directory,
        }
    }

    pub fn mv(source: impl Into<String>, destination: impl Into<String>, is_directory: bool) -> Self {
        Self {
            kind: BatchOpKind::Move,
            source_path: source.into(),
            destination_path: Some(destination.into()),
            is_directory,
        }
    }

    /// Every non-empty path this slot names.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source_path.as_str())
            .chain(self.destination_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    /// Copy and move need a destination; delete must not have one.
    pub fn destination(&self) -> Result<Option<&str>, WikiError> {
        match (self.kind, self.destination_path.as_deref()) {
            (BatchOpKind::Delete, None) => Ok(None),
            (BatchOpKind::Delete, Some(_)) => Err(WikiError::validation(
                "delete does not take a destination path",
            )),
            (_, Some(dst)) if !dst.is_empty() => Ok(Some(dst)),
            (_, _) => Err(WikiError::validation(format!(
                "{:?} requires a destination path",
                self.kind
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub operation: BatchOperation,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// True only if every slot succeeded
    pub success: bool,
    pub total_operations: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<BatchResult>,
}

impl BatchReport {
    pub fn from_results(results: Vec<BatchResult>) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = results.len() - success_count;
        Self {
            success: failure_count == 0,
            total_operations: results.len(),
            success_count,
            failure_count,
            results,
        }
    }
}

/// Run `operations` in order through `apply`. A failing slot, including one
/// whose subtree report is incomplete, is recorded and does not stop later
/// slots.
pub async fn run_batch<F, Fut>(operations: Vec<BatchOperation>, mut apply: F) -> BatchReport
where
    F: FnMut(BatchOperation) -> Fut,
    Fut: Future<Output = Result<SubtreeReport, WikiError>>,
{
    let mut results = Vec::with_capacity(operations.len());

    for operation in operations {
        let outcome = apply(operation.clone())
            .await
            .and_then(SubtreeReport::into_result);

        let result = match outcome {
            Ok(_) => BatchResult {
                operation,
                success: true,
                error: None,
            },
            Err(e) => {
                tracing::debug!(?operation, error = %e, "batch slot failed");
                BatchResult {
                    operation,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    BatchReport::from_results(results)
}
