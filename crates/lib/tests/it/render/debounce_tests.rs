use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use myopie::{Renderer, Value, render::Options};

use crate::helpers::{container_page, mount_with, text};

fn content(data: &Value) -> String {
    format!("<div>{}</div>", data.text_at("content"))
}

fn debounced(ms: u64) -> (myopie::Page, Renderer, Arc<AtomicUsize>) {
    let page = container_page("");
    let renderer = mount_with(
        &page,
        content,
        serde_json::json!({"content": "initial"}),
        Options::default().with_debounce_ms(ms),
    );
    renderer.render();
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = renders.clone();
    renderer.hooks_render_add_post(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (page, renderer, renders)
}

#[tokio::test(start_paused = true)]
async fn test_render_is_deferred() {
    let (page, renderer, renders) = debounced(50);

    renderer.set("content", "updated", true).unwrap();
    assert!(renderer.is_render_pending());
    assert_eq!(text(&page, "#container").as_deref(), Some("initial"));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(text(&page, "#container").as_deref(), Some("updated"));
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert!(!renderer.is_render_pending());
}

#[tokio::test(start_paused = true)]
async fn test_burst_coalesces_into_one_render() {
    let (page, renderer, renders) = debounced(50);

    renderer.set("content", "first", true).unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;
    renderer.set("content", "second", true).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    // The first timer would have fired by now
    assert_eq!(text(&page, "#container").as_deref(), Some("initial"));

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(text(&page, "#container").as_deref(), Some("second"));
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_render_cancels_pending_one() {
    let (page, renderer, renders) = debounced(50);

    renderer.set("content", "now", true).unwrap();
    assert!(renderer.render());
    assert_eq!(text(&page, "#container").as_deref(), Some("now"));
    assert!(!renderer.is_render_pending());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_renders_synchronously() {
    let (page, renderer, _) = debounced(0);
    renderer.set("content", "updated", false).unwrap();
    renderer.render_debounce();
    assert_eq!(text(&page, "#container").as_deref(), Some("updated"));
}

#[tokio::test(start_paused = true)]
async fn test_destroy_cancels_pending_render() {
    let (page, renderer, renders) = debounced(50);

    renderer.set("content", "never", true).unwrap();
    renderer.destroy();
    assert!(!renderer.is_render_pending());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(text(&page, "#container").as_deref(), Some("initial"));
    assert_eq!(renders.load(Ordering::SeqCst), 0);

    renderer.render_debounce();
    assert!(!renderer.is_render_pending());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_renderer_cancels_pending_render() {
    let (page, renderer, renders) = debounced(50);

    renderer.set("content", "never", true).unwrap();
    drop(renderer);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(text(&page, "#container").as_deref(), Some("initial"));
    assert_eq!(renders.load(Ordering::SeqCst), 0);
}

#[test]
fn test_debounce_without_runtime_renders_now() {
    let (page, renderer, _) = debounced(50);
    renderer.set("content", "updated", true).unwrap();
    assert_eq!(text(&page, "#container").as_deref(), Some("updated"));
}
