use crate::component::InstanceId;
use host::HostError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Host(#[from] HostError),
    /// `None` when a component node was never bound to an instance.
    #[error("component instance {0:?} is not live")]
    MissingInstance(Option<InstanceId>),
    #[error("component `{0}` has neither a render function nor a setup that returns one")]
    MissingRender(Arc<str>),
    #[error("mounted {0} node has no host node")]
    MissingElement(&'static str),
    #[error("teleport needs a host node in its `to` prop")]
    MissingTeleportTarget,
    #[error("fragment and teleport children must be nodes, not text")]
    TextInFragment,
    #[error("job queue still busy after {0} jobs")]
    FlushLimitExceeded(usize),
}
