//! Capabilities injected into the batch driver

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;

use super::types::{DispatchOutcome, ExecutionError, WorkItem};
use super::worker_pool::PoolEvent;

/// Performs the external call for one work item
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, item: &WorkItem) -> Result<Value, ExecutionError>;
}

#[async_trait]
impl<F, Fut> RequestExecutor for F
where
    F: Fn(WorkItem) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ExecutionError>> + Send,
{
    async fn execute(&self, item: &WorkItem) -> Result<Value, ExecutionError> {
        (self)(item.clone()).await
    }
}

/// Projects a raw success payload down to the persisted fields.
///
/// Must not fail: missing fields map to `null`.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, raw: &Value) -> Value;
}

impl<F> FieldExtractor for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn extract(&self, raw: &Value) -> Value {
        (self)(raw)
    }
}

/// Persists the executor payload unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughExtractor;

impl FieldExtractor for PassThroughExtractor {
    fn extract(&self, raw: &Value) -> Value {
        raw.clone()
    }
}

/// Keeps a fixed list of fields, addressed by dotted path (`"address.city"`)
#[derive(Debug, Clone, Default)]
pub struct FieldProjection {
    fields: Vec<String>,
}

impl FieldProjection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
        path.split('.').try_fold(raw, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

impl FieldExtractor for FieldProjection {
    fn extract(&self, raw: &Value) -> Value {
        let projected: Map<String, Value> = self
            .fields
            .iter()
            .map(|path| {
                let value = Self::lookup(raw, path).cloned().unwrap_or(Value::Null);
                (path.clone(), value)
            })
            .collect();
        Value::Object(projected)
    }
}

/// A backend that settles a whole dispatch unit
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Settle every item; never fails and never drops an item
    async fn dispatch(&self, items: Vec<WorkItem>) -> DispatchOutcome;

    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Pool-level events raised since the last call
    fn take_events(&self) -> Vec<PoolEvent> {
        Vec::new()
    }
}
