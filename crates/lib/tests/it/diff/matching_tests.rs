use myopie::Value;

use crate::helpers::{attr, container_page, find, find_all, mount, text};

fn fixed(markup: &'static str) -> impl Fn(&Value) -> String + Send + Sync + 'static {
    move |_| markup.to_string()
}

// ===== KEYED MATCHING =====

#[test]
fn test_match_by_id_over_first_candidate() {
    let page = container_page(r#"<div>generic</div><div id="target">correct</div>"#);
    let target = find(&page, "#target").unwrap();
    let renderer = mount(&page, fixed(r#"<div id="target">correct</div>"#), serde_json::json!({}));
    renderer.render();

    let divs = find_all(&page, "#container div");
    assert_eq!(divs, vec![target]);
    let stats = renderer.last_patch().unwrap();
    assert_eq!(stats.moved, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.inserted, 0);
}

#[test]
fn test_match_by_key_attribute_over_first_candidate() {
    let page = container_page(r#"<div>generic</div><div data-myopie-id="target">old</div>"#);
    let target = find(&page, "[data-myopie-id=target]").unwrap();
    let renderer = mount(
        &page,
        fixed(r#"<div data-myopie-id="target">updated</div>"#),
        serde_json::json!({}),
    );
    renderer.render();

    assert_eq!(find_all(&page, "#container div"), vec![target]);
    assert_eq!(text(&page, "#container div").as_deref(), Some("updated"));
    assert_eq!(
        attr(&page, "#container div", "data-myopie-id").as_deref(),
        Some("target")
    );
}

#[test]
fn test_reordered_keys_keep_identity() {
    let page = container_page("");
    let renderer = mount(
        &page,
        |data: &Value| {
            data.get_path("order")
                .and_then(Value::as_list)
                .unwrap_or_default()
                .iter()
                .map(|key| format!(r#"<li data-myopie-id="{key}">{key}</li>"#))
                .collect()
        },
        serde_json::json!({"order": ["a", "b", "c"]}),
    );
    renderer.render();
    let before: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|key| find(&page, &format!("[data-myopie-id={key}]")).unwrap())
        .collect();

    renderer
        .set("order", Value::from(serde_json::json!(["c", "a", "b"])), true)
        .unwrap();

    let after = find_all(&page, "#container li");
    assert_eq!(after, vec![before[2], before[0], before[1]]);
    assert_eq!(text(&page, "#container").as_deref(), Some("cab"));
    assert_eq!(renderer.last_patch().unwrap().inserted, 0);
}

// ===== COMPARATORS =====

#[test]
fn test_input_matched_by_type_and_name() {
    let page = container_page(r#"<input type="text" name="username">"#);
    let input = find(&page, "input").unwrap();
    let renderer = mount(
        &page,
        fixed(r#"<input type="text" name="username" data-matched="true">"#),
        serde_json::json!({}),
    );
    renderer.render();
    assert_eq!(find(&page, "#container input"), Some(input));
    assert_eq!(attr(&page, "#container input", "data-matched").as_deref(), Some("true"));
}

#[test]
fn test_input_with_other_name_is_replaced() {
    let page = container_page(r#"<input type="text" name="email">"#);
    let input = find(&page, "input").unwrap();
    let renderer = mount(&page, fixed(r#"<input type="text" name="username">"#), serde_json::json!({}));
    renderer.render();
    assert_ne!(find(&page, "#container input"), Some(input));
    assert_eq!(attr(&page, "#container input", "name").as_deref(), Some("username"));
}

#[test]
fn test_link_matched_by_href() {
    let page = container_page(r#"<link rel="stylesheet" href="http://localhost/style.css">"#);
    let renderer = mount(
        &page,
        fixed(r#"<link rel="stylesheet" href="http://localhost/style.css" data-matched="true">"#),
        serde_json::json!({}),
    );
    renderer.render();
    assert_eq!(attr(&page, "#container link", "data-matched").as_deref(), Some("true"));
    assert_eq!(
        attr(&page, "#container link", "href").as_deref(),
        Some("http://localhost/style.css")
    );
}

#[test]
fn test_anchor_matched_by_href() {
    let page = container_page(
        r#"<a href="http://localhost/other">Other</a><a href="http://localhost/target">Target</a>"#,
    );
    let target = find(&page, r#"a[href="http://localhost/target"]"#).unwrap();
    let renderer = mount(&page, fixed(r#"<a href="http://localhost/target">Updated</a>"#), serde_json::json!({}));
    renderer.render();

    assert_eq!(find_all(&page, "#container a"), vec![target]);
    assert_eq!(text(&page, "#container a").as_deref(), Some("Updated"));
}

#[test]
fn test_img_matched_by_src() {
    let page = container_page(r#"<img src="http://localhost/image.png">"#);
    let img = find(&page, "img").unwrap();
    let renderer = mount(
        &page,
        fixed(r#"<img src="http://localhost/image.png" alt="updated">"#),
        serde_json::json!({}),
    );
    renderer.render();
    assert_eq!(find(&page, "#container img"), Some(img));
    assert_eq!(attr(&page, "#container img", "alt").as_deref(), Some("updated"));
}

#[test]
fn test_script_matched_by_src() {
    let page = container_page(r#"<script src="http://localhost/app.js"></script>"#);
    let script = find(&page, "script").unwrap();
    let renderer = mount(
        &page,
        fixed(r#"<script src="http://localhost/app.js" data-matched="true"></script>"#),
        serde_json::json!({}),
    );
    renderer.render();
    assert_eq!(find(&page, "#container script"), Some(script));
    assert_eq!(attr(&page, "#container script", "data-matched").as_deref(), Some("true"));
}

// ===== FALLBACK HEURISTICS =====

#[test]
fn test_class_mismatch_replaces_node() {
    let page = container_page(r#"<p class="a">x</p>"#);
    let original = find(&page, "p").unwrap();
    let renderer = mount(&page, fixed(r#"<p class="b">x</p>"#), serde_json::json!({}));
    renderer.render();
    assert_ne!(find(&page, "#container p"), Some(original));
    assert_eq!(find_all(&page, "#container p").len(), 1);
}

#[test]
fn test_data_attribute_mismatch_replaces_node() {
    let page = container_page(r#"<p data-kind="a">x</p>"#);
    let original = find(&page, "p").unwrap();
    let renderer = mount(&page, fixed(r#"<p data-kind="b">x</p>"#), serde_json::json!({}));
    renderer.render();
    assert_ne!(find(&page, "#container p"), Some(original));
    assert_eq!(attr(&page, "#container p", "data-kind").as_deref(), Some("b"));
}
