//! What a component sees of itself: the setup context and the render context.

use crate::component::{Hook, LifecyclePhase, Method};
use crate::vnode::{Slots, VNode};
use core_types::{PropMap, Value};
use reactive::Reactive;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Reserved render-context keys, resolved after every user binding.
pub const SLOTS_KEY: &str = "$slots";
pub const ATTRS_KEY: &str = "$attrs";

/// Where a render-context key resolved.
#[derive(Clone)]
pub enum Binding {
    State(Value),
    Prop(Value),
    Setup(Value),
    Method(Method),
    /// Names of the slots the parent passed.
    Slots(Vec<Arc<str>>),
    Attrs(PropMap),
}

impl Binding {
    /// The value behind a data binding; methods and reserved keys read as `Null`.
    pub fn value(&self) -> Value {
        match self {
            Binding::State(v) | Binding::Prop(v) | Binding::Setup(v) => v.clone(),
            Binding::Method(_) | Binding::Slots(_) | Binding::Attrs(_) => Value::Null,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::State(v) => f.debug_tuple("State").field(v).finish(),
            Binding::Prop(v) => f.debug_tuple("Prop").field(v).finish(),
            Binding::Setup(v) => f.debug_tuple("Setup").field(v).finish(),
            Binding::Method(_) => f.write_str("Method(..)"),
            Binding::Slots(names) => f.debug_tuple("Slots").field(names).finish(),
            Binding::Attrs(attrs) => f.debug_tuple("Attrs").field(attrs).finish(),
        }
    }
}

/// Invokes `on<Event>` handlers found in a component's resolved props.
#[derive(Clone, Debug)]
pub struct Emitter {
    component: Arc<str>,
    props: Reactive<Value>,
}

impl Emitter {
    pub(crate) fn new(component: Arc<str>, props: Reactive<Value>) -> Self {
        Self { component, props }
    }

    /// Returns whether a handler ran. A missing handler is logged, not an error.
    pub fn emit(&self, event: &str, args: &[Value]) -> bool {
        let key = handler_key(event);
        match self.props.get(&key) {
            Some(Value::Handler(handler)) => {
                handler.call(args);
                true
            }
            _ => {
                log::warn!(
                    target: "vdom.component",
                    "{}: emit `{event}` has no `{key}` handler",
                    self.component
                );
                false
            }
        }
    }
}

/// `click` -> `onClick`.
pub fn handler_key(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

/// Read-only view of resolved props, handed to `setup`.
#[derive(Clone, Debug)]
pub struct PropsView {
    props: Reactive<Value>,
}

impl PropsView {
    pub(crate) fn new(props: Reactive<Value>) -> Self {
        Self { props }
    }

    pub fn get(&self, key: &str) -> Value {
        self.props.get(key).unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.props.contains(key)
    }

    pub fn keys(&self) -> Vec<Arc<str>> {
        self.props.keys()
    }
}

/// Context passed to a component's `setup`.
///
/// Lifecycle callbacks registered here attach to the instance being set up and
/// run after the descriptor's own hook for the same phase.
pub struct SetupContext {
    attrs: PropMap,
    slots: Slots,
    emitter: Emitter,
    hooks: Vec<(LifecyclePhase, Hook)>,
}

impl SetupContext {
    pub(crate) fn new(attrs: PropMap, slots: Slots, emitter: Emitter) -> Self {
        Self {
            attrs,
            slots,
            emitter,
            hooks: Vec::new(),
        }
    }

    pub fn attrs(&self) -> &PropMap {
        &self.attrs
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn emit(&self, event: &str, args: &[Value]) -> bool {
        self.emitter.emit(event, args)
    }

    /// A clonable emitter for closures that outlive `setup`.
    pub fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }

    pub fn on(&mut self, phase: LifecyclePhase, f: impl Fn(&RenderContext) + 'static) {
        self.hooks.push((phase, Rc::new(f)));
    }

    pub fn on_created(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Created, f);
    }

    pub fn on_before_mount(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::BeforeMount, f);
    }

    pub fn on_mounted(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Mounted, f);
    }

    pub fn on_before_update(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::BeforeUpdate, f);
    }

    pub fn on_updated(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Updated, f);
    }

    pub fn on_activated(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Activated, f);
    }

    pub fn on_deactivated(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Deactivated, f);
    }

    pub fn on_unmounted(&mut self, f: impl Fn(&RenderContext) + 'static) {
        self.on(LifecyclePhase::Unmounted, f);
    }

    pub(crate) fn into_hooks(self) -> Vec<(LifecyclePhase, Hook)> {
        self.hooks
    }
}

pub(crate) struct ContextParts {
    pub name: Arc<str>,
    pub state: Reactive<Value>,
    pub props: Reactive<Value>,
    pub setup_state: Reactive<Value>,
    pub attrs: PropMap,
    pub slots: Slots,
    pub methods: BTreeMap<Arc<str>, Method>,
    pub emitter: Emitter,
}

/// Resolved view over one instance, built once after `setup` returns.
///
/// Lookup priority: local state, props, setup result, methods, then the
/// reserved `$slots` / `$attrs` keys.
#[derive(Clone)]
pub struct RenderContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    name: Arc<str>,
    state: Reactive<Value>,
    props: Reactive<Value>,
    setup_state: Reactive<Value>,
    attrs: RefCell<PropMap>,
    slots: RefCell<Slots>,
    methods: BTreeMap<Arc<str>, Method>,
    emitter: Emitter,
}

impl RenderContext {
    pub(crate) fn new(parts: ContextParts) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                name: parts.name,
                state: parts.state,
                props: parts.props,
                setup_state: parts.setup_state,
                attrs: RefCell::new(parts.attrs),
                slots: RefCell::new(parts.slots),
                methods: parts.methods,
                emitter: parts.emitter,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn lookup(&self, key: &str) -> Option<Binding> {
        let inner = &self.inner;
        if let Some(v) = inner.state.get(key) {
            return Some(Binding::State(v));
        }
        if let Some(v) = inner.props.get(key) {
            return Some(Binding::Prop(v));
        }
        if let Some(v) = inner.setup_state.get(key) {
            return Some(Binding::Setup(v));
        }
        if let Some(method) = inner.methods.get(key) {
            return Some(Binding::Method(Rc::clone(method)));
        }
        match key {
            SLOTS_KEY => Some(Binding::Slots(
                inner.slots.borrow().keys().cloned().collect(),
            )),
            ATTRS_KEY => Some(Binding::Attrs(inner.attrs.borrow().clone())),
            _ => None,
        }
    }

    /// Read a data binding. A miss is logged and reads as `Null`.
    pub fn get(&self, key: &str) -> Value {
        match self.lookup(key) {
            Some(binding) => binding.value(),
            None => {
                log::warn!(target: "vdom.component", "{}: `{key}` is not defined", self.inner.name);
                Value::Null
            }
        }
    }

    /// Write local state or a setup-result entry. Returns whether the write landed.
    ///
    /// Props are owned by the parent and refuse writes.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let inner = &self.inner;
        if inner.state.contains(key) {
            inner.state.set(key, value.into());
            return true;
        }
        if inner.props.contains(key) {
            log::warn!(target: "vdom.component", "{}: prop `{key}` is read-only", inner.name);
            return false;
        }
        if inner.setup_state.contains(key) {
            inner.setup_state.set(key, value.into());
            return true;
        }
        log::warn!(target: "vdom.component", "{}: cannot set undefined `{key}`", inner.name);
        false
    }

    /// Invoke a bound method. An unknown method is logged and returns `Null`.
    pub fn call(&self, method: &str, args: &[Value]) -> Value {
        let Some(f) = self.inner.methods.get(method).cloned() else {
            log::warn!(target: "vdom.component", "{}: no method `{method}`", self.inner.name);
            return Value::Null;
        };
        f(self, args)
    }

    pub fn emit(&self, event: &str, args: &[Value]) -> bool {
        self.inner.emitter.emit(event, args)
    }

    /// Render the named slot. A missing slot renders nothing.
    pub fn slot(&self, name: &str) -> Vec<VNode> {
        let slot = self.inner.slots.borrow().get(name).cloned();
        slot.map(|s| s.render()).unwrap_or_default()
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.inner.slots.borrow().contains_key(name)
    }

    pub fn attrs(&self) -> PropMap {
        self.inner.attrs.borrow().clone()
    }

    pub fn state(&self) -> &Reactive<Value> {
        &self.inner.state
    }

    pub fn props(&self) -> &Reactive<Value> {
        &self.inner.props
    }

    pub fn setup_state(&self) -> &Reactive<Value> {
        &self.inner.setup_state
    }

    pub(crate) fn replace_slots(&self, slots: Slots) {
        *self.inner.slots.borrow_mut() = slots;
    }

    pub(crate) fn replace_attrs(&self, attrs: PropMap) {
        *self.inner.attrs.borrow_mut() = attrs;
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("name", &self.inner.name)
            .field("state", &self.inner.state)
            .field("props", &self.inner.props)
            .finish_non_exhaustive()
    }
}
