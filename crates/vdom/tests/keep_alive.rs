use core_types::{PropMap, Value};
use host::MemoryHost;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use vdom::{Component, LifecyclePhase, Renderer, VNode};

/// Hook calls in the order they fired, as `name:phase`.
type Events = Rc<RefCell<Vec<String>>>;

fn record(events: &Events, name: &str, phase: &str) -> impl Fn(&vdom::RenderContext) + 'static {
    let events = Rc::clone(events);
    let entry = format!("{name}:{phase}");
    move |_: &vdom::RenderContext| events.borrow_mut().push(entry.clone())
}

fn tab(name: &'static str, events: &Events) -> Component {
    Component::builder(name)
        .data(|| [(Arc::from("count"), Value::Int(0))].into_iter().collect::<PropMap>())
        .hook(LifecyclePhase::Mounted, record(events, name, "mounted"))
        .hook(LifecyclePhase::Activated, record(events, name, "activated"))
        .hook(LifecyclePhase::Deactivated, record(events, name, "deactivated"))
        .hook(LifecyclePhase::Unmounted, record(events, name, "unmounted"))
        .render(move |ctx| VNode::element("span").with_text(format!("{name}:{}", ctx.get("count"))))
        .build()
}

/// A switcher whose `tab` state picks which child the keep-alive shows.
fn switcher(a: Component, b: Component) -> Component {
    Component::builder("Switcher")
        .data(|| [(Arc::from("tab"), Value::from("a"))].into_iter().collect::<PropMap>())
        .render(move |ctx| {
            let child = if ctx.get("tab") == Value::from("a") { &a } else { &b };
            VNode::element("main").with_children([VNode::keep_alive(VNode::component(child))])
        })
        .build()
}

fn count(events: &Events, key: &str) -> usize {
    events.borrow().iter().filter(|e| *e == key).count()
}

fn drain(events: &Events) -> Vec<String> {
    std::mem::take(&mut *events.borrow_mut())
}

#[test]
fn switching_away_and_back_preserves_the_instance() {
    let events: Events = Rc::default();
    let a = tab("A", &events);
    let b = tab("B", &events);
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::new(host);
    r.render(Some(VNode::component(&switcher(a, b))), root).unwrap();
    let main = r.host().children(root)[0];
    let outer = r.root_vnode(root).and_then(|n| n.component).unwrap();
    let outer_ctx = r.instance(outer).unwrap().context().clone();

    let a_host = r.host().children(main)[0];
    let a_id = r
        .instance(outer)
        .and_then(|i| i.sub_tree())
        .map(|main| main.child_nodes()[0].component.unwrap())
        .and_then(|keep_alive| r.instance(keep_alive))
        .and_then(|ka| ka.sub_tree())
        .and_then(|child| child.component)
        .unwrap();
    r.instance(a_id).unwrap().context().set("count", 5);
    r.flush_jobs().unwrap();
    assert_eq!(r.host().child_texts(main), vec!["A:5"]);
    assert_eq!(drain(&events), vec!["A:mounted"]);

    outer_ctx.set("tab", "b");
    r.flush_jobs().unwrap();
    assert_eq!(r.host().child_texts(main), vec!["B:0"]);
    assert_eq!(drain(&events), vec!["A:deactivated", "B:mounted"]);
    assert!(r.instance(a_id).is_some());
    assert!(r.host().contains(a_host));

    outer_ctx.set("tab", "a");
    r.flush_jobs().unwrap();
    assert_eq!(r.host().child_texts(main), vec!["A:5"]);
    assert_eq!(r.host().children(main), &[a_host]);
    assert_eq!(drain(&events), vec!["B:deactivated", "A:activated"]);
    assert_eq!(r.instance(a_id).unwrap().state().get("count"), Some(Value::Int(5)));

    r.render(None, root).unwrap();
    assert_eq!(drain(&events), vec!["A:unmounted", "B:unmounted"]);
    assert_eq!(r.instance_count(), 0);
    assert!(r.host().children(root).is_empty());
}

#[test]
fn reactivated_instance_deactivates_before_it_activates() {
    let events: Events = Rc::default();
    let a = tab("A", &events);
    let b = tab("B", &events);
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::new(host);
    r.render(Some(VNode::component(&switcher(a, b))), root).unwrap();
    let outer = r.root_vnode(root).and_then(|n| n.component).unwrap();
    let outer_ctx = r.instance(outer).unwrap().context().clone();
    for tab in ["b", "a", "b", "a"] {
        outer_ctx.set("tab", tab);
        r.flush_jobs().unwrap();
    }

    let a_events: Vec<String> = events
        .borrow()
        .iter()
        .filter(|e| e.starts_with("A:"))
        .cloned()
        .collect();
    assert_eq!(
        a_events,
        vec!["A:mounted", "A:deactivated", "A:activated", "A:deactivated", "A:activated"]
    );
    assert_eq!(count(&events, "B:mounted"), 1);
    assert_eq!(count(&events, "A:unmounted") + count(&events, "B:unmounted"), 0);
}

#[test]
fn non_component_child_passes_through() {
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::new(host);
    r.render(Some(VNode::keep_alive(VNode::element("p").with_text("plain"))), root)
        .unwrap();
    assert_eq!(r.host().child_texts(root), vec!["plain"]);
    r.render(None, root).unwrap();
    assert!(r.host().children(root).is_empty());
    assert_eq!(r.instance_count(), 0);
}

#[test]
fn empty_keep_alive_renders_nothing() {
    let mut host = MemoryHost::new();
    let root = host.create_container("div");
    let mut r = Renderer::new(host);
    r.render(Some(VNode::component(&Component::keep_alive())), root)
        .unwrap();
    assert!(r.host().children(root).is_empty());
    assert_eq!(r.instance_count(), 1);
}
