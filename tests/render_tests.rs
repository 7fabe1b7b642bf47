use ihjs::components::{div, heading, text, Attribute, Node, RenderOptions};

fn tag_of(html: &str) -> &str {
    let open = html.strip_prefix('<').unwrap();
    let end = open.find(|c: char| c == ' ' || c == '>').unwrap();
    &open[..end]
}

#[test]
fn test_every_variant_closes_with_its_opening_tag() {
    let nodes = vec![
        div(),
        Node::element("section").class_name("x"),
        text("t"),
        text("t").tag("p"),
        heading("h", 4),
    ];

    for node in nodes {
        let html = node.render();
        let tag = tag_of(&html);
        assert_eq!(tag, node.tag_name());
        assert!(
            html.ends_with(&format!("</{}>", tag)),
            "{html} does not close <{tag}>"
        );
    }
}

#[test]
fn test_end_to_end_example() {
    let page = Node::element("div")
        .class_name("a")
        .child(text("hello"));
    assert_eq!(page.render(), r#"<div class="a"><span>hello</span></div>"#);
}

#[test]
fn test_class_alias_on_every_variant() {
    for node in [div(), text("x"), heading("x", 1)] {
        let html = node.class_name("c").render();
        assert!(html.contains(r#" class="c""#));
        assert!(!html.contains("class_name"));
    }
}

#[test]
fn test_unset_attributes_leave_no_token() {
    let html = div()
        .attr_opt("title", None)
        .attribute(Attribute::new("data_state", None))
        .render();
    assert_eq!(html, "<div></div>");
}

#[test]
fn test_child_order_preserved() {
    let a = heading("A", 1);
    let b = div().child(text("B"));
    let c = text("C");
    let parent = div().children(vec![a.clone(), b.clone(), c.clone()]);

    assert_eq!(
        parent.render(),
        format!("<div>{}{}{}</div>", a.render(), b.render(), c.render())
    );
}

#[test]
fn test_text_and_heading_never_render_children() {
    let child = Node::element("strong").child(text("child"));

    let t = text("hi").child(child.clone()).render();
    assert!(t.contains("hi"));
    assert!(!t.contains(&child.render()));

    let h = heading("title", 2).child(child.clone()).render();
    assert_eq!(h, "<h2>title</h2>");
}

#[test]
fn test_heading_tag_derivation() {
    let html = heading("x", 3).render();
    assert!(html.starts_with("<h3"));
    assert!(html.ends_with("</h3>"));
}

#[test]
fn test_render_is_idempotent() {
    let tree = div()
        .class_name("outer")
        .attr("id", "root")
        .children(vec![
            heading("Title", 1).class_name("t"),
            div().children(vec![text("a"), text("b <c>")]),
        ]);

    let first = tree.render();
    let second = tree.render();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_escaping_can_be_disabled() {
    let tree = div().attr("title", "a&b").child(text("<em>x</em>"));

    assert_eq!(
        tree.render(),
        r#"<div title="a&amp;b"><span>&lt;em&gt;x&lt;/em&gt;</span></div>"#
    );
    assert_eq!(
        tree.render_with(&RenderOptions::verbatim()),
        r#"<div title="a&b"><span><em>x</em></span></div>"#
    );
}

#[test]
fn test_tree_can_be_shared_across_threads() {
    let tree = std::sync::Arc::new(div().children((0..10).map(|i| text(i.to_string()))));
    let expected = tree.render();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = tree.clone();
            std::thread::spawn(move || tree.render())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
