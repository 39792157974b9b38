use core_types::{Handler, PropMap, Value};
use host::MemoryHost;
use mimalloc::MiMalloc;
use std::sync::Arc;
use vdom::{Component, DiffStrategy, RenderError, Renderer, RendererConfig, VNode};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn todo_list() -> Component {
    let item = Component::builder("TodoItem")
        .prop("label")
        .render(|ctx| VNode::element("li").with_text(ctx.get("label").to_string()))
        .build();
    Component::builder("TodoList")
        .data(|| {
            let items = Value::from("write,review,ship");
            [(Arc::from("items"), items)].into_iter().collect::<PropMap>()
        })
        .render(move |ctx| {
            let items = ctx.get("items").to_string();
            VNode::element("ul").with_children(items.split(',').filter(|s| !s.is_empty()).map(
                |label| {
                    VNode::component(&item)
                        .with_key(label)
                        .with_prop("label", label)
                },
            ))
        })
        .build()
}

fn print_tree(title: &str, renderer: &Renderer<MemoryHost>, root: core_types::NodeHandle) {
    println!("== {title}");
    for line in renderer.host().snapshot(root) {
        println!("{line}");
    }
}

fn main() -> Result<(), RenderError> {
    let mut host = MemoryHost::new();
    let root = host.create_container("body");
    let mut renderer = Renderer::with_config(host, RendererConfig::with_strategy(DiffStrategy::Fast));

    let list = todo_list();
    renderer.render(Some(VNode::component(&list)), root)?;
    print_tree("mounted", &renderer, root);

    let Some(id) = renderer.root_vnode(root).and_then(|node| node.component) else {
        return Ok(());
    };
    if let Some(instance) = renderer.instance(id) {
        instance.context().set("items", "ship,write,test,review");
    }
    let jobs = renderer.flush_jobs()?;
    let moves = renderer.host().count(host::HostOpKind::Move);
    print_tree(&format!("reordered ({jobs} job, {moves} moves)"), &renderer, root);

    let clicked = Handler::new(|args| println!("clicked with {args:?}"));
    renderer.render(
        Some(VNode::element("button").with_prop("onClick", clicked).with_text("done")),
        root,
    )?;
    let button = renderer.host().children(root)[0];
    renderer.host().dispatch(button, "click", &[Value::Int(1)])?;
    print_tree("replaced", &renderer, root);

    renderer.render(None, root)?;
    println!("instances left: {}", renderer.instance_count());
    Ok(())
}
