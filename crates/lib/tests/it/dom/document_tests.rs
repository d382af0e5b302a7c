use myopie::{Document, dom::NodeKind};

// ===== PARSING AND SERIALIZATION =====

#[test]
fn test_parse_serialize_round_trip() {
    let markup = r#"<div class="wrapper"><span>a &amp; b</span><img src="x.png" alt=""><br>tail</div>"#;
    let doc = Document::parse(markup);
    assert_eq!(doc.inner_html(doc.root()), markup);
}

#[test]
fn test_parse_drops_comments_and_keeps_text() {
    let doc = Document::parse("<!-- note -->text<p>para</p>");
    let kids = doc.children(doc.root());
    assert_eq!(kids.len(), 2);
    assert_eq!(doc.kind(kids[0]), Some(NodeKind::Text));
    assert_eq!(doc.tag_name(kids[1]), Some("p"));
}

#[test]
fn test_script_text_is_not_escaped() {
    let doc = Document::parse("<script>if (a < b) {}</script>");
    assert_eq!(doc.inner_html(doc.root()), "<script>if (a < b) {}</script>");
}

// ===== TREE SURGERY =====

#[test]
fn test_build_tree_by_hand() {
    let mut doc = Document::new();
    let list = doc.create_element("UL");
    doc.append(doc.root(), list);
    for label in ["one", "two"] {
        let item = doc.create_element("li");
        doc.append_text(item, label);
        doc.append(list, item);
    }
    doc.set_attribute(list, "id", "menu");

    assert_eq!(
        doc.inner_html(doc.root()),
        r#"<ul id="menu"><li>one</li><li>two</li></ul>"#
    );
    assert_eq!(doc.child_element_count(list), 2);
    assert_eq!(doc.text_content(list), "onetwo");
}

#[test]
fn test_import_from_other_document() {
    let source = Document::parse(r#"<p class="a"><b>bold</b></p>"#);
    let mut target = Document::parse("<div></div>");
    let div = target.child_at(target.root(), 0).unwrap();

    let copy = target
        .import(&source, source.child_at(source.root(), 0).unwrap())
        .unwrap();
    assert!(!target.is_connected(copy));
    target.append(div, copy);

    assert!(target.is_connected(copy));
    assert_eq!(
        target.inner_html(target.root()),
        r#"<div><p class="a"><b>bold</b></p></div>"#
    );
    // The source is untouched
    assert_eq!(source.inner_html(source.root()), r#"<p class="a"><b>bold</b></p>"#);
}

#[test]
fn test_remove_subtree() {
    let mut doc = Document::parse("<div><p><span>x</span></p></div>");
    let div = doc.child_at(doc.root(), 0).unwrap();
    let p = doc.child_at(div, 0).unwrap();
    let span = doc.child_at(p, 0).unwrap();

    doc.remove(p);
    assert!(!doc.contains(p));
    assert!(!doc.contains(span));
    assert!(!doc.has_child_nodes(div));
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut doc = Document::parse("<div><b>a</b><i>b</i></div>");
    let div = doc.child_at(doc.root(), 0).unwrap();
    doc.set_text_content(div, "plain");
    assert_eq!(doc.child_count(div), 1);
    assert_eq!(doc.inner_html(div), "plain");
}

// ===== EQUALITY =====

#[test]
fn test_is_equal_node_across_documents() {
    let a = Document::parse(r#"<p id="x" class="y">t<b>u</b></p>"#);
    let b = Document::parse(r#"<p class="y" id="x">t<b>u</b></p>"#);
    let c = Document::parse(r#"<p class="y" id="x">t<b>v</b></p>"#);
    let pa = a.child_at(a.root(), 0).unwrap();
    let pb = b.child_at(b.root(), 0).unwrap();
    let pc = c.child_at(c.root(), 0).unwrap();

    assert!(a.is_equal_node(pa, &b, pb));
    assert!(!a.is_equal_node(pa, &c, pc));
}
