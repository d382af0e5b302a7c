use std::{
    sync::{Arc, Mutex, mpsc},
    thread,
    time::Duration,
};

use myopie::{Page, Renderer, Value, render::Options};

use crate::helpers::{container_page, find, mount, text};

fn value_div(data: &Value) -> String {
    format!("<div>{}</div>", data.text_at("value"))
}

// ===== RENDER =====

#[test]
fn test_render_without_mount_returns_false() {
    let page = Page::parse("<p>no container</p>");
    let renderer = Renderer::new(
        page.clone(),
        "#nonexistent",
        |_| "<div>content</div>".into(),
        Value::object(),
        Options::immediate(),
    )
    .unwrap();
    assert!(!renderer.render());
    assert!(!renderer.is_initialized());
    assert_eq!(page.html(), "<p>no container</p>");
}

#[test]
fn test_mount_may_appear_later() {
    let page = Page::parse("<main></main>");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "late"}));
    assert!(!renderer.render());

    {
        let mut doc = page.lock();
        let main = doc.child_at(doc.root(), 0).unwrap();
        let container = doc.create_element("div");
        doc.set_attribute(container, "id", "container");
        doc.append(main, container);
    }

    assert!(renderer.render());
    assert!(renderer.is_initialized());
    assert_eq!(text(&page, "#container").as_deref(), Some("late"));
}

#[test]
fn test_unchanged_markup_leaves_page_alone() {
    let page = container_page("");
    let renderer = mount(&page, |_: &Value| "<div>static</div>".into(), serde_json::json!({}));
    assert!(renderer.render());
    let first = find(&page, "#container div").unwrap();

    // Outside edits survive a memoized render
    page.lock().set_attribute(first, "title", "edited");
    assert!(renderer.render());
    assert_eq!(find(&page, "#container div"), Some(first));
    assert_eq!(page.lock().get_attribute(first, "title"), Some("edited"));
}

#[test]
fn test_set_without_render_defers_page_update() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "initial"}));
    renderer.render();

    assert!(renderer.set("value", "updated", false).unwrap());
    assert_eq!(text(&page, "#container").as_deref(), Some("initial"));
    assert!(renderer.previous().is_some());

    renderer.render();
    assert_eq!(text(&page, "#container").as_deref(), Some("updated"));
    assert!(renderer.previous().is_none());
}

#[test]
fn test_set_errors_leave_data_alone() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": 42}));
    let err = renderer.set("value/deeper/key", "test", true).unwrap_err();
    assert!(err.is_not_navigable());
    assert_eq!(renderer.get("value"), Some(Value::from(42)));
    assert!(!renderer.is_initialized());
}

#[test]
fn test_unset_renders() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "gone"}));
    renderer.render();
    assert!(renderer.unset("value", true).unwrap());
    assert_eq!(renderer.get("value"), None);
    assert_eq!(page.html(), r#"<div id="container"><div></div></div>"#);
}

// ===== HOOKS =====

type Log = Arc<Mutex<Vec<String>>>;

fn logging_renderer(page: &Page, log: &Log) -> Renderer {
    let renderer = mount(page, value_div, serde_json::json!({"value": "initial"}));
    let entry = |log: &Log, stage: &'static str| {
        let log = log.clone();
        let page = page.clone();
        move |current: &Value, previous: Option<&Value>| {
            log.lock().unwrap().push(format!(
                "{stage}: current={} previous={} page={}",
                current.text_at("value"),
                previous.map(|p| p.text_at("value")).unwrap_or_default(),
                page.html()
            ));
        }
    };
    let init_pre = entry(log, "init-pre");
    renderer.hooks_init_add_pre(move |current| init_pre(current, None));
    let init_post = entry(log, "init-post");
    renderer.hooks_init_add_post(move |current| init_post(current, None));
    renderer.hooks_render_add_pre(entry(log, "render-pre"));
    renderer.hooks_render_add_post(entry(log, "render-post"));
    renderer
}

#[test]
fn test_hook_order_and_arguments() {
    let page = container_page("");
    let log = Log::default();
    let renderer = logging_renderer(&page, &log);

    renderer.render();
    renderer.set("value", "updated", true).unwrap();

    let empty = r#"<div id="container"></div>"#;
    let initial = r#"<div id="container"><div>initial</div></div>"#;
    let updated = r#"<div id="container"><div>updated</div></div>"#;
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            format!("init-pre: current=initial previous= page={empty}"),
            format!("init-post: current=initial previous= page={initial}"),
            format!("render-pre: current=updated previous=initial page={initial}"),
            format!("render-post: current=updated previous=initial page={updated}"),
        ]
    );
}

#[test]
fn test_init_hooks_fire_once() {
    let page = container_page("");
    let log = Log::default();
    let renderer = logging_renderer(&page, &log);

    renderer.render();
    renderer.render();
    renderer.set("value", "a", true).unwrap();
    renderer.set("value", "b", true).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|l| l.starts_with("init-")).count(), 2);
    assert_eq!(log.iter().filter(|l| l.starts_with("render-pre")).count(), 2);
}

#[test]
fn test_render_hooks_skip_memoized_renders() {
    let page = container_page("");
    let log = Log::default();
    let renderer = logging_renderer(&page, &log);

    renderer.render();
    // A change the template does not show produces identical markup
    renderer.set("hidden", true, true).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_previous_spans_batched_writes() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "v0"}));
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    renderer.hooks_render_add_pre(move |_, previous| {
        *sink.lock().unwrap() = previous.map(|p| p.text_at("value"));
    });

    renderer.render();
    renderer.set("value", "v1", false).unwrap();
    renderer.set("value", "v2", false).unwrap();
    renderer.render();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("v0"));
}

#[test]
fn test_hooks_may_read_the_renderer() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "a"}));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (reader, sink) = (renderer.clone(), seen.clone());
    renderer.hooks_init_add_post(move |_| {
        sink.lock().unwrap().push(reader.get("value"));
    });

    // Render on another thread so a hang fails the test instead of the run
    let (done, finished) = mpsc::channel();
    let worker = renderer.clone();
    thread::spawn(move || done.send(worker.render()));
    assert_eq!(finished.recv_timeout(Duration::from_secs(5)), Ok(true));
    assert_eq!(*seen.lock().unwrap(), vec![Some(Value::from("a"))]);
}

#[test]
fn test_hook_writes_render_again() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "a"}));
    let writer = renderer.clone();
    renderer.hooks_init_add_post(move |_| {
        writer.set("value", "b", true).unwrap();
    });
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    renderer.hooks_render_add_pre(move |_, previous| {
        *sink.lock().unwrap() = previous.map(|p| p.text_at("value"));
    });

    assert!(renderer.render());
    assert_eq!(text(&page, "#container").as_deref(), Some("b"));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("a"));
    assert_eq!(renderer.previous(), None);
}

// ===== DESTROY =====

#[test]
fn test_destroyed_renderer_keeps_data_but_stops_rendering() {
    let page = container_page("");
    let renderer = mount(&page, value_div, serde_json::json!({"value": "a"}));
    renderer.render();
    renderer.destroy();
    renderer.destroy();

    assert!(renderer.is_destroyed());
    assert!(renderer.set("value", "b", true).unwrap());
    assert_eq!(renderer.get("value"), Some(Value::from("b")));
    assert_eq!(text(&page, "#container").as_deref(), Some("a"));
}
