use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use myopie::{
    Page, Renderer, Value,
    dom::{Listener, NodeId, Selector, listener},
    render::Options,
};

// ==========================
// PAGE FACTORIES
// ==========================

/// A page whose body is a single `#container` holding `inner`.
pub fn container_page(inner: &str) -> Page {
    Page::parse(&format!(r#"<div id="container">{inner}</div>"#))
}

/// A renderer on `#container` that renders synchronously.
pub fn mount(
    page: &Page,
    template: impl Fn(&Value) -> String + Send + Sync + 'static,
    data: serde_json::Value,
) -> Renderer {
    mount_with(page, template, data, Options::immediate())
}

pub fn mount_with(
    page: &Page,
    template: impl Fn(&Value) -> String + Send + Sync + 'static,
    data: serde_json::Value,
    options: Options,
) -> Renderer {
    Renderer::new(page.clone(), "#container", template, data, options)
        .expect("Failed to create renderer")
}

// ==========================
// LOOKUPS
// ==========================

pub fn find(page: &Page, selector: &str) -> Option<NodeId> {
    page.query_selector(selector).expect("Invalid selector")
}

pub fn find_all(page: &Page, selector: &str) -> Vec<NodeId> {
    let selector = Selector::parse(selector).expect("Invalid selector");
    page.lock().query_selector_all(&selector)
}

/// Text content of the first match, or `None` without a match.
pub fn text(page: &Page, selector: &str) -> Option<String> {
    let node = find(page, selector)?;
    Some(page.lock().text_content(node))
}

pub fn attr(page: &Page, selector: &str, name: &str) -> Option<String> {
    let node = find(page, selector)?;
    page.lock().get_attribute(node, name).map(str::to_string)
}

/// Number of children (text included) of the first match.
pub fn child_count(page: &Page, selector: &str) -> usize {
    find(page, selector).map_or(0, |node| page.lock().child_count(node))
}

// ==========================
// LISTENERS
// ==========================

/// A listener that counts its invocations.
pub fn counting_listener() -> (Listener, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let listener = listener(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (listener, count)
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
