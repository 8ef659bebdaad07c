use super::*;
use crate::attributes;
use css::{style_map, StyleMap};
use url::Url;

fn link_tree() -> Tree {
    let mut tree = Tree::new(NodeData::element(
        "div",
        attributes! {"data-test-id" => "root", "id" => "main"},
        StyleMap::new(),
    ));
    tree.append(
        0,
        NodeData::element(
            "a",
            attributes! {
                "href" => "b/c.html",
                "data-track" => "1",
            },
            StyleMap::new(),
        ),
    )
    .unwrap();
    tree.append(
        0,
        NodeData::element("a", attributes! {"href" => "https://other.com/x"}, StyleMap::new()),
    )
    .unwrap();
    tree.append(
        0,
        NodeData::element("a", attributes! {"href" => "javascript:void(0)"}, StyleMap::new()),
    )
    .unwrap();
    tree.append(
        0,
        NodeData::element("img", attributes! {"src" => "../logo.png"}, StyleMap::new()),
    )
    .unwrap();
    tree
}

fn attributes_of(tree: &Tree, id: NodeId) -> DOMAttributes {
    tree.node(id).unwrap().data.attributes().unwrap().clone()
}

#[test]
fn test_links_are_resolved() {
    let mut tree = link_tree();
    let options = AnnotateOptions {
        remove_data_attributes: false,
        base_url: Some(Url::parse("https://example.com/a/").unwrap()),
    };
    annotate(&mut tree, &options);
    assert_eq!(attributes_of(&tree, 1).get("href"), Some("https://example.com/a/b/c.html"));
    assert_eq!(attributes_of(&tree, 2).get("href"), Some("https://other.com/x"));
    assert_eq!(attributes_of(&tree, 3).get("href"), Some("javascript:void(0)"));
    assert_eq!(attributes_of(&tree, 4).get("src"), Some("https://example.com/logo.png"));
    // Untouched without the removal flag
    assert_eq!(attributes_of(&tree, 0).get("data-test-id"), Some("root"));
    assert_eq!(attributes_of(&tree, 1).get("data-track"), Some("1"));
}

#[test]
fn test_data_attributes_are_removed() {
    let mut tree = link_tree();
    let options = AnnotateOptions {
        remove_data_attributes: true,
        base_url: None,
    };
    annotate(&mut tree, &options);
    assert_eq!(attributes_of(&tree, 0), attributes! {"id" => "main"});
    assert_eq!(attributes_of(&tree, 1), attributes! {"href" => "b/c.html"});
}

#[test]
fn test_markup() {
    let mut tree = Tree::new(NodeData::element(
        "div",
        attributes! {"class" => "card big", "title" => "a \"quoted\" & title"},
        style_map! {"color" => "red"},
    ));
    let p = tree
        .append(0, NodeData::element("p", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();
    tree.append(p, NodeData::text("1 < 2 & 3")).unwrap();
    tree.append(0, NodeData::element("br", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();
    let before = tree
        .append(0, NodeData::pseudo_element("before", style_map! {"content" => "'x'"}))
        .unwrap();
    tree.append(before, NodeData::text("generated")).unwrap();

    assert_eq!(
        to_markup(&tree).unwrap(),
        r#"<div class="card big" title="a &quot;quoted&quot; &amp; title"><p>1 &lt; 2 &amp; 3</p><br></div>"#
    );

    tree.node_mut(0)
        .unwrap()
        .data
        .assign_class(Some("card".to_string()), style_map! {"color" => "red"});
    assert_eq!(
        to_markup(&tree).unwrap(),
        r#"<div class="card" title="a &quot;quoted&quot; &amp; title"><p>1 &lt; 2 &amp; 3</p><br></div>"#
    );
}
