//! Property tests for rendering element descriptions.
//!
//! Run with: cargo test --test render_properties

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use spark_dom::{Document, Node, Renderer, h, reset_registry};

// =============================================================================
// STRATEGIES
// =============================================================================

fn tag_spec() -> impl Strategy<Value = (String, Option<String>, Vec<String>)> {
    (
        "[a-z][a-z0-9]{0,4}",
        option::of("[a-z][a-z0-9]{0,4}"),
        vec("[a-z][a-z0-9-]{0,4}", 0..4),
    )
}

fn spec_string(tag: &str, id: &Option<String>, classes: &[String]) -> String {
    let mut spec = tag.to_string();
    for class in classes {
        spec.push('.');
        spec.push_str(class);
    }
    if let Some(id) = id {
        spec.push('#');
        spec.push_str(id);
    }
    spec
}

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-zA-Z <>&]{0,8}".prop_map(Node::from),
        any::<i32>().prop_map(Node::from),
        any::<bool>().prop_map(Node::from),
        Just(Node::Empty),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        (
            tag_spec(),
            vec(("[a-z]{1,5}", "[a-z0-9 \"]{0,5}"), 0..3),
            vec(inner, 0..4),
        )
            .prop_map(|((tag, id, classes), attrs, children)| {
                let mut element = h(spec_string(&tag, &id, &classes));
                for (name, value) in attrs {
                    element = element.attr(name, value);
                }
                Node::from(element.children(children))
            })
    })
}

fn render_html(node: &Node) -> Option<String> {
    let renderer = Renderer::new(Document::new());
    let rendered = renderer.render(node).expect("generated description must render");
    rendered.map(|node| renderer.backend().to_html(node))
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_rendering_is_deterministic(node in tree()) {
        reset_registry();
        prop_assert_eq!(render_html(&node), render_html(&node));
    }

    #[test]
    fn prop_element_carries_parsed_spec((tag, id, classes) in tag_spec()) {
        let renderer = Renderer::new(Document::new());
        let spec = spec_string(&tag, &id, &classes);
        let node = renderer
            .render(&h(spec).into())
            .unwrap()
            .expect("elements always render");
        let doc = renderer.backend();

        let mut expected_classes: Vec<String> = Vec::new();
        for class in classes {
            if !expected_classes.contains(&class) {
                expected_classes.push(class);
            }
        }

        prop_assert_eq!(doc.tag_name(node), Some(tag));
        prop_assert_eq!(doc.attribute(node, "id"), id);
        prop_assert_eq!(doc.classes(node), expected_classes);
    }

    #[test]
    fn prop_children_keep_order(texts in vec("[a-z]{1,6}", 0..8)) {
        let renderer = Renderer::new(Document::new());
        let node = renderer
            .render(&h("ol").children(texts.iter().map(|t| h("li").child(t))).into())
            .unwrap()
            .unwrap();
        let doc = renderer.backend();

        let rendered: Vec<String> = doc
            .children(node)
            .into_iter()
            .map(|child| doc.text_content(child))
            .collect();
        prop_assert_eq!(rendered, texts);
    }
}
