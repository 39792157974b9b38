//! Component descriptors, instances, and the instance manager.
//!
//! Instances live in an arena owned by the renderer and are addressed by
//! [`InstanceId`]. Virtual nodes carry the id, never the instance, so teardown
//! is a plain arena removal.

use crate::context::{ContextParts, Emitter, PropsView, RenderContext, SetupContext};
use crate::error::RenderError;
use crate::keep_alive::KeepAliveState;
use crate::renderer::Renderer;
use crate::vnode::{Children, Slots, VNode, VNodeKind};
use core_types::{JobId, NodeHandle, PropMap, Value};
use host::HostAdapter;
use reactive::{Effect, Reactive, Scheduler, register_effect};
use slotmap::{Key as _, KeyData};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

slotmap::new_key_type! {
    /// Stable handle of one component instance.
    pub struct InstanceId;
}

impl InstanceId {
    pub(crate) fn job(self) -> JobId {
        JobId(self.data().as_ffi())
    }

    pub(crate) fn from_job(job: JobId) -> Self {
        InstanceId::from(KeyData::from_ffi(job.0))
    }
}

pub type RenderFn = Rc<dyn Fn(&RenderContext) -> VNode>;
pub type Hook = Rc<dyn Fn(&RenderContext)>;
pub type Method = Rc<dyn Fn(&RenderContext, &[Value]) -> Value>;
pub type SetupFn = Rc<dyn Fn(&PropsView, &mut SetupContext) -> SetupResult>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecyclePhase {
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    Activated,
    Deactivated,
    Unmounted,
}

/// What `setup` hands back.
pub enum SetupResult {
    /// Becomes the render function.
    Render(RenderFn),
    /// Extra bindings, resolved after state and props.
    State(PropMap),
    Empty,
}

impl SetupResult {
    pub fn render(f: impl Fn(&RenderContext) -> VNode + 'static) -> Self {
        SetupResult::Render(Rc::new(f))
    }
}

/// Whose virtual tree holds an instance's node: the tree rendered into a
/// container, or another instance's sub-tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Owner {
    Root(NodeHandle),
    Instance(InstanceId),
}

/// Where an instance's node sits inside its owner's tree.
enum Placement {
    /// Followed by this host node, or last in a host parent.
    Before(Option<NodeHandle>),
    /// Last in the owner's own flow; the owner's position decides.
    OwnerEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    User,
    /// Renders its default slot natively and caches the child instance.
    KeepAlive,
}

pub struct ComponentDef {
    name: Arc<str>,
    kind: ComponentKind,
    props: Vec<Arc<str>>,
    data: Option<Rc<dyn Fn() -> PropMap>>,
    methods: BTreeMap<Arc<str>, Method>,
    setup: Option<SetupFn>,
    render: Option<RenderFn>,
    before_create: Option<Rc<dyn Fn()>>,
    hooks: BTreeMap<LifecyclePhase, Hook>,
}

/// Component descriptor. Two descriptors are the same type only when they are
/// the same allocation.
#[derive(Clone)]
pub struct Component(Rc<ComponentDef>);

impl Component {
    pub fn builder(name: &str) -> ComponentBuilder {
        ComponentBuilder {
            def: ComponentDef {
                name: Arc::from(name),
                kind: ComponentKind::User,
                props: Vec::new(),
                data: None,
                methods: BTreeMap::new(),
                setup: None,
                render: None,
                before_create: None,
                hooks: BTreeMap::new(),
            },
        }
    }

    pub fn keep_alive() -> Self {
        let mut builder = Self::builder("keep-alive");
        builder.def.kind = ComponentKind::KeepAlive;
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.0.kind
    }

    pub fn is_keep_alive(&self) -> bool {
        self.0.kind == ComponentKind::KeepAlive
    }

    pub fn declares_prop(&self, key: &str) -> bool {
        self.0.props.iter().any(|p| &**p == key)
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.0.name)
    }
}

pub struct ComponentBuilder {
    def: ComponentDef,
}

impl ComponentBuilder {
    /// Declare a prop. Undeclared keys become attrs unless they start with `on`.
    pub fn prop(mut self, name: &str) -> Self {
        self.def.props.push(Arc::from(name));
        self
    }

    pub fn data(mut self, f: impl Fn() -> PropMap + 'static) -> Self {
        self.def.data = Some(Rc::new(f));
        self
    }

    pub fn method(
        mut self,
        name: &str,
        f: impl Fn(&RenderContext, &[Value]) -> Value + 'static,
    ) -> Self {
        self.def.methods.insert(Arc::from(name), Rc::new(f));
        self
    }

    pub fn setup(
        mut self,
        f: impl Fn(&PropsView, &mut SetupContext) -> SetupResult + 'static,
    ) -> Self {
        self.def.setup = Some(Rc::new(f));
        self
    }

    pub fn render(mut self, f: impl Fn(&RenderContext) -> VNode + 'static) -> Self {
        self.def.render = Some(Rc::new(f));
        self
    }

    /// Runs once, after `setup` and before `created`.
    pub fn before_create(mut self, f: impl Fn() + 'static) -> Self {
        self.def.before_create = Some(Rc::new(f));
        self
    }

    pub fn hook(mut self, phase: LifecyclePhase, f: impl Fn(&RenderContext) + 'static) -> Self {
        self.def.hooks.insert(phase, Rc::new(f));
        self
    }

    pub fn build(self) -> Component {
        Component(Rc::new(self.def))
    }
}

/// Durable state behind one mounted component node.
pub struct ComponentInstance {
    pub(crate) def: Component,
    pub(crate) ctx: RenderContext,
    pub(crate) render: Option<RenderFn>,
    pub(crate) hooks: BTreeMap<LifecyclePhase, Vec<Hook>>,
    pub(crate) sub_tree: Option<VNode>,
    pub(crate) is_mounted: bool,
    /// Host parent the sub-tree currently lives in.
    pub(crate) container: NodeHandle,
    pub(crate) owner: Owner,
    pub(crate) effect: Rc<Effect>,
    pub(crate) keep_alive: Option<KeepAliveState>,
}

impl ComponentInstance {
    pub fn component(&self) -> &Component {
        &self.def
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn state(&self) -> &Reactive<Value> {
        self.ctx.state()
    }

    pub fn props(&self) -> &Reactive<Value> {
        self.ctx.props()
    }

    pub fn attrs(&self) -> PropMap {
        self.ctx.attrs()
    }

    pub fn sub_tree(&self) -> Option<&VNode> {
        self.sub_tree.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted
    }

    pub fn container(&self) -> NodeHandle {
        self.container
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("component", &self.def)
            .field("is_mounted", &self.is_mounted)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

/// Split raw node props into `(props, attrs)`.
///
/// Declared keys and `on*` handler keys are props; everything else is an attr.
pub(crate) fn resolve_props(def: &Component, raw: &PropMap) -> (PropMap, PropMap) {
    raw.iter()
        .map(|(k, v)| (Arc::clone(k), v.clone()))
        .partition(|(key, _)| def.declares_prop(key) || key.starts_with("on"))
}

/// Shallow comparison: key count, then value equality per key.
pub(crate) fn props_changed(prev: &PropMap, next: &PropMap) -> bool {
    prev.len() != next.len() || next.iter().any(|(k, v)| prev.get(k) != Some(v))
}

impl<H: HostAdapter> Renderer<H> {
    pub(crate) fn mount_component(
        &mut self,
        def: Component,
        node: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        if node.keep_alive.kept_alive {
            if let Some(id) = node.component.filter(|id| self.instances.contains_key(*id)) {
                return self.activate(id, node, parent, anchor);
            }
        }

        let name: Arc<str> = Arc::clone(&def.0.name);
        let (props, attrs) = resolve_props(&def, &node.props);
        let slots = match &node.children {
            Children::Slots(slots) => slots.clone(),
            _ => Slots::new(),
        };
        let state = Reactive::from_map(def.0.data.as_ref().map(|f| f()).unwrap_or_default());
        let props = Reactive::from_map(props);
        let emitter = Emitter::new(Arc::clone(&name), props.clone());

        let mut setup_ctx = SetupContext::new(attrs.clone(), slots.clone(), emitter.clone());
        let result = match &def.0.setup {
            Some(setup) => setup(&PropsView::new(props.clone()), &mut setup_ctx),
            None => SetupResult::Empty,
        };
        let (render, setup_state) = match result {
            SetupResult::Render(f) => {
                if def.0.render.is_some() {
                    log::warn!(
                        target: "vdom.component",
                        "{name}: setup returned a render function; `render` is ignored"
                    );
                }
                (Some(f), PropMap::new())
            }
            SetupResult::State(extra) => (def.0.render.clone(), extra),
            SetupResult::Empty => (def.0.render.clone(), PropMap::new()),
        };
        if render.is_none() && !def.is_keep_alive() {
            return Err(RenderError::MissingRender(name));
        }
        if let Some(before_create) = &def.0.before_create {
            before_create();
        }

        let ctx = RenderContext::new(ContextParts {
            name: Arc::clone(&name),
            state,
            props,
            setup_state: Reactive::from_map(setup_state),
            attrs,
            slots,
            methods: def.0.methods.clone(),
            emitter,
        });
        let mut hooks: BTreeMap<LifecyclePhase, Vec<Hook>> = BTreeMap::new();
        for (phase, hook) in &def.0.hooks {
            hooks.entry(*phase).or_default().push(Rc::clone(hook));
        }
        for (phase, hook) in setup_ctx.into_hooks() {
            hooks.entry(phase).or_default().push(hook);
        }
        let keep_alive = if def.is_keep_alive() {
            Some(KeepAliveState::new(
                self.host.create_node(&self.config.storage_tag)?,
            ))
        } else {
            None
        };

        let owner = self.current_owner.unwrap_or(Owner::Root(parent));
        let scheduler: Rc<dyn Scheduler> = self.queue.clone();
        let id = self.instances.insert_with_key(|id| {
            let effect = register_effect(id.job(), scheduler);
            ctx.state().subscribe(&effect);
            ctx.props().subscribe(&effect);
            ctx.setup_state().subscribe(&effect);
            ComponentInstance {
                def: def.clone(),
                ctx: ctx.clone(),
                render,
                hooks,
                sub_tree: None,
                is_mounted: false,
                container: parent,
                owner,
                effect,
                keep_alive,
            }
        });
        node.component = Some(id);
        log::debug!(target: "vdom.component", "mount {name} {id:?} into {parent}");

        self.fire(id, LifecyclePhase::Created);
        self.run_component(id, anchor)?;
        node.el = self.instance_host(id);

        if node.keep_alive.should_keep_alive {
            if let Some(owner) = node.keep_alive.owner {
                self.remember_kept_alive(owner, &def, id);
            }
        }
        Ok(())
    }

    /// Same-type update: keep the instance, push new props and slots into it.
    ///
    /// When that schedules the instance, it re-renders right here, while
    /// `anchor` still names the host node that follows it.
    pub(crate) fn patch_component(
        &mut self,
        old: &VNode,
        new: &mut VNode,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let id = old.component.ok_or(RenderError::MissingInstance(None))?;
        new.component = Some(id);
        let instance = self
            .instances
            .get_mut(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        instance.container = parent;

        if props_changed(&old.props, &new.props) {
            self.update_instance_props(id, &new.props)?;
        }
        if let Children::Slots(slots) = &new.children {
            let instance = self
                .instances
                .get(id)
                .ok_or(RenderError::MissingInstance(Some(id)))?;
            instance.ctx.replace_slots(slots.clone());
            instance.effect.trigger();
        }
        self.rerender_pending(id, anchor)?;
        new.el = self.instance_host(id);
        Ok(())
    }

    /// Run the instance's queued update now instead of at the next flush.
    pub(crate) fn rerender_pending(
        &mut self,
        id: InstanceId,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        if self.queue.cancel(id.job()) {
            self.run_component(id, anchor)?;
        }
        Ok(())
    }

    /// Write re-resolved props onto the instance. Only changed keys notify.
    pub(crate) fn update_instance_props(
        &mut self,
        id: InstanceId,
        raw: &PropMap,
    ) -> Result<(), RenderError> {
        let instance = self
            .instances
            .get(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        let (next, attrs) = resolve_props(&instance.def, raw);
        let props = instance.ctx.props();
        for (key, value) in &next {
            props.set(Arc::clone(key), value.clone());
        }
        for key in props.keys() {
            if !next.contains_key(&key) {
                props.remove(&key);
            }
        }
        instance.ctx.replace_attrs(attrs);
        log::trace!(target: "vdom.component", "props updated for {id:?}");
        Ok(())
    }

    /// The effect body: render, then mount or patch the sub-tree before `anchor`.
    pub(crate) fn run_component(
        &mut self,
        id: InstanceId,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let outer = self.current_owner.replace(Owner::Instance(id));
        let result = self.render_instance(id, anchor);
        self.current_owner = outer;
        result
    }

    fn render_instance(
        &mut self,
        id: InstanceId,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let instance = self
            .instances
            .get(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        let ctx = instance.ctx.clone();
        let render = instance.render.clone();
        let mounted = instance.is_mounted;
        let container = instance.container;
        let native_keep_alive = instance.keep_alive.is_some();

        let mut tree = if native_keep_alive {
            self.render_keep_alive(id)?
        } else {
            let render = render.ok_or_else(|| RenderError::MissingRender(Arc::from(ctx.name())))?;
            render(&ctx)
        };

        if !mounted {
            self.fire(id, LifecyclePhase::BeforeMount);
            self.patch(None, &mut tree, container, anchor)?;
            let instance = self
                .instances
                .get_mut(id)
                .ok_or(RenderError::MissingInstance(Some(id)))?;
            instance.sub_tree = Some(tree);
            instance.is_mounted = true;
            self.fire(id, LifecyclePhase::Mounted);
            return Ok(());
        }

        self.fire(id, LifecyclePhase::BeforeUpdate);
        let previous = self
            .instances
            .get_mut(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?
            .sub_tree
            .take();
        log::debug!(target: "vdom.component", "update {} {id:?}", ctx.name());
        self.patch(previous.as_ref(), &mut tree, container, anchor)?;
        if let Some(instance) = self.instances.get_mut(id) {
            instance.sub_tree = Some(tree);
        }
        self.fire(id, LifecyclePhase::Updated);
        Ok(())
    }

    /// Run every callback registered for `phase`, descriptor hook first.
    pub(crate) fn fire(&self, id: InstanceId, phase: LifecyclePhase) {
        let Some(instance) = self.instances.get(id) else {
            return;
        };
        let Some(hooks) = instance.hooks.get(&phase) else {
            return;
        };
        for hook in hooks {
            hook(&instance.ctx);
        }
    }

    /// Host node that currently follows the instance's sub-tree, read off the
    /// owner's tree. Only valid while no tree is mid-patch, as during a flush.
    ///
    /// An instance not found in its owner's tree (parked by a keep-alive) gets
    /// `None`.
    pub(crate) fn resolve_anchor(&self, id: InstanceId) -> Option<NodeHandle> {
        let owner = self.instances.get(id)?.owner;
        let tree = match owner {
            Owner::Root(container) => self.root_vnode(container)?,
            Owner::Instance(parent) => self.instances.get(parent)?.sub_tree.as_ref()?,
        };
        match self.locate(std::slice::from_ref(tree), id, None, true)? {
            Placement::Before(anchor) => anchor,
            Placement::OwnerEnd => match owner {
                Owner::Root(_) => None,
                Owner::Instance(parent) => self.resolve_anchor(parent),
            },
        }
    }

    /// Search `nodes` for the component node of `id`. `after` is the host node
    /// following `nodes`; `in_owner_flow` is false below an element or teleport.
    fn locate(
        &self,
        nodes: &[VNode],
        id: InstanceId,
        mut after: Option<NodeHandle>,
        in_owner_flow: bool,
    ) -> Option<Placement> {
        for node in nodes.iter().rev() {
            let hit = match &node.kind {
                VNodeKind::Component(_) if node.component == Some(id) => {
                    Some(match after {
                        None if in_owner_flow => Placement::OwnerEnd,
                        anchor => Placement::Before(anchor),
                    })
                }
                VNodeKind::Fragment => self.locate(node.child_nodes(), id, after, in_owner_flow),
                VNodeKind::Element(_) | VNodeKind::Teleport => {
                    self.locate(node.child_nodes(), id, None, false)
                }
                _ => None,
            };
            if hit.is_some() {
                return hit;
            }
            after = self.first_host(node).or(after);
        }
        None
    }

    /// First host node of the instance's current sub-tree.
    pub(crate) fn instance_host(&self, id: InstanceId) -> Option<NodeHandle> {
        let tree = self.instances.get(id)?.sub_tree.as_ref()?;
        self.first_host(tree)
    }

    /// Move an instance's whole sub-tree, keeping its recorded container current.
    pub(crate) fn move_instance(
        &mut self,
        id: InstanceId,
        parent: NodeHandle,
        anchor: Option<NodeHandle>,
    ) -> Result<(), RenderError> {
        let instance = self
            .instances
            .get_mut(id)
            .ok_or(RenderError::MissingInstance(Some(id)))?;
        instance.container = parent;
        let tree = instance.sub_tree.take();
        let result = match &tree {
            Some(tree) => self.move_vnode(tree, parent, anchor),
            None => Ok(()),
        };
        if let Some(instance) = self.instances.get_mut(id) {
            instance.sub_tree = tree;
        }
        result
    }
}
