//! Public entry point.
//!
//! A [`Renderer`] owns the host adapter, the component instance arena and the
//! job queue every component effect schedules into. The previously rendered
//! tree of each container is tracked here, keyed by the container handle.

use crate::component::{ComponentInstance, InstanceId, Owner};
use crate::config::RendererConfig;
use crate::diff::DiffStrategy;
use crate::error::RenderError;
use crate::vnode::VNode;
use core_types::NodeHandle;
use host::HostAdapter;
use reactive::JobQueue;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::rc::Rc;

pub struct Renderer<H: HostAdapter> {
    pub(crate) host: H,
    pub(crate) instances: SlotMap<InstanceId, ComponentInstance>,
    pub(crate) queue: Rc<JobQueue>,
    roots: HashMap<NodeHandle, VNode>,
    pub(crate) config: RendererConfig,
    /// Tree being patched right now; new instances record it as their owner.
    pub(crate) current_owner: Option<Owner>,
}

impl<H: HostAdapter> Renderer<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RendererConfig::default())
    }

    pub fn with_config(host: H, config: RendererConfig) -> Self {
        Self {
            host,
            instances: SlotMap::with_key(),
            queue: Rc::new(JobQueue::new()),
            roots: HashMap::new(),
            config,
            current_owner: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn set_diff_strategy(&mut self, strategy: DiffStrategy) {
        self.config.diff_strategy = strategy;
    }

    /// Tree last rendered into `container`.
    pub fn root_vnode(&self, container: NodeHandle) -> Option<&VNode> {
        self.roots.get(&container)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn has_pending_jobs(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Mount, update, or (with `None`) unmount the tree rendered into
    /// `container`.
    ///
    /// On error the host tree is left as far as the failing operation got, and
    /// the container's tracked tree is dropped.
    pub fn render(&mut self, vnode: Option<VNode>, container: NodeHandle) -> Result<(), RenderError> {
        let outer = self.current_owner.replace(Owner::Root(container));
        let result = self.render_root(vnode, container);
        self.current_owner = outer;
        result?;
        if self.config.flush_on_render {
            self.flush_jobs()?;
        }
        Ok(())
    }

    fn render_root(&mut self, vnode: Option<VNode>, container: NodeHandle) -> Result<(), RenderError> {
        let previous = self.roots.remove(&container);
        match vnode {
            Some(mut vnode) => {
                self.patch(previous.as_ref(), &mut vnode, container, None)?;
                self.roots.insert(container, vnode);
            }
            None => {
                if let Some(previous) = previous {
                    self.unmount(&previous, container)?;
                }
            }
        }
        Ok(())
    }

    /// Run queued component updates until the queue is empty.
    ///
    /// Jobs enqueued while flushing run in the same flush. Each update mounts
    /// before the host node that follows the instance at the moment it runs.
    /// Returns the number of jobs run.
    pub fn flush_jobs(&mut self) -> Result<usize, RenderError> {
        let mut ran = 0;
        while let Some(job) = self.queue.pop() {
            let id = InstanceId::from_job(job);
            if !self.instances.contains_key(id) {
                log::trace!(target: "vdom.component", "skip job for freed instance {id:?}");
                continue;
            }
            if ran >= self.config.max_flush_jobs {
                self.queue.clear();
                log::warn!(target: "vdom.component", "flush stopped after {ran} jobs");
                return Err(RenderError::FlushLimitExceeded(ran));
            }
            let anchor = self.resolve_anchor(id);
            self.run_component(id, anchor)?;
            ran += 1;
        }
        Ok(ran)
    }
}

impl<H: HostAdapter + std::fmt::Debug> std::fmt::Debug for Renderer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("host", &self.host)
            .field("instances", &self.instances.len())
            .field("roots", &self.roots.len())
            .field("config", &self.config)
            .finish()
    }
}
