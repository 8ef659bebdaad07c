use super::*;
use crate::capture::Capture;
use css::{style_map, StyleMap, StyleValue};
use html::{attributes, to_markup, DOMAttributes, NodeData, NodeId, TreeError};

fn element(tag: &str, attributes: DOMAttributes, style: StyleMap) -> NodeData {
    NodeData::element(tag, attributes, style)
}

fn class_of(tree: &Tree, id: NodeId) -> Option<String> {
    tree.node(id).unwrap().data.class_name().map(str::to_string)
}

fn colors() -> Options {
    Options {
        extract_colors: true,
        ..Default::default()
    }
}

#[test]
fn test_deduplicated_output_order() {
    let mut tree = Tree::new(element(
        "div",
        attributes! {"class" => "card"},
        style_map! {"display" => "flex"},
    ));
    let h1 = tree
        .append(
            0,
            element(
                "h1",
                attributes! {"class" => "title"},
                style_map! {"font-size" => "24", "color" => "rgb(255, 0, 0)"},
            ),
        )
        .unwrap();
    tree.append(h1, NodeData::text("Heading")).unwrap();
    let p = tree
        .append(
            0,
            element("p", attributes! {"class" => "body-text"}, style_map! {"font-size" => "14"}),
        )
        .unwrap();
    let span = tree
        .append(
            0,
            element(
                "span",
                attributes! {"class" => "title-alt"},
                style_map! {"color" => "rgb(255, 0, 0)", "font-size" => "24"},
            ),
        )
        .unwrap();
    let em = tree
        .append(0, element("em", DOMAttributes::empty(), StyleMap::new()))
        .unwrap();

    let conversion = convert(&mut tree, &colors(), &TypeStyle).unwrap();
    let expected = r##"import { style } from 'typestyle';
export const colors = {"red":"#ff0000"};
export const card = style({
    display: 'flex',
});
export const title = style({
    color: '#ff0000',
    fontSize: 24,
});
export const bodyText = style({
    fontSize: 14,
});"##;
    assert_eq!(conversion.stylesheet, expected);
    assert_eq!(class_of(&tree, 0).as_deref(), Some("card"));
    assert_eq!(class_of(&tree, h1).as_deref(), Some("title"));
    assert_eq!(class_of(&tree, span).as_deref(), Some("title"));
    assert_eq!(class_of(&tree, p).as_deref(), Some("bodyText"));
    assert_eq!(class_of(&tree, em), None);
    assert_eq!(conversion.symbols.len(), 3);
}

#[test]
fn test_nested_variants_take_part_in_dedup() {
    let hover = style_map! {"color" => "blue"};
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), StyleMap::new()));
    let a = tree
        .append(
            0,
            element(
                "a",
                attributes! {"class" => "link"},
                style_map! {"color" => "red"}.with_pseudo_state(":hover", hover.clone()),
            ),
        )
        .unwrap();
    let b = tree
        .append(
            0,
            element(
                "a",
                attributes! {"class" => "other"},
                style_map! {"color" => "red"}.with_pseudo_state(":hover", hover),
            ),
        )
        .unwrap();
    let c = tree
        .append(
            0,
            element("a", attributes! {"class" => "plain"}, style_map! {"color" => "red"}),
        )
        .unwrap();

    let conversion = convert(&mut tree, &Options::default(), &TypeStyle).unwrap();
    assert_eq!(class_of(&tree, a), class_of(&tree, b));
    assert_ne!(class_of(&tree, a), class_of(&tree, c));
    assert_eq!(conversion.stylesheet.matches("export const link =").count(), 1);
    assert!(!conversion.stylesheet.contains("export const other"));
    assert!(conversion.stylesheet.contains("export const plain ="));
    // The root has no style and no class
    assert_eq!(class_of(&tree, 0), None);
}

#[test]
fn test_pseudo_element_is_folded() {
    let mut tree = Tree::new(element(
        "div",
        attributes! {"class" => "icon"},
        style_map! {"position" => "relative"},
    ));
    let before = tree
        .append(
            0,
            NodeData::pseudo_element("before", style_map! {"content" => "\"x\"", "z-index" => "1"}),
        )
        .unwrap();
    tree.append(before, NodeData::text("x")).unwrap();

    let conversion = convert(&mut tree, &Options::default(), &TypeStyle).unwrap();
    let child = tree.node(before).unwrap().data.style().unwrap().clone();
    assert_eq!(
        child,
        style_map! {"content" => "\"x\"", "zIndex" => StyleValue::Number(1.0)}
    );
    let parent = tree.node(0).unwrap().data.style().unwrap();
    assert_eq!(parent.pseudo_elements["::before"], child);

    // The pseudo-element has a class of its own, but only the parent is printed
    assert_eq!(class_of(&tree, before).as_deref(), Some("beforeCls"));
    assert!(conversion.symbols.definition("beforeCls").is_some());
    assert!(!conversion.stylesheet.contains("beforeCls"));
    assert!(conversion.stylesheet.contains("'&::before': {"));
}

#[test]
fn test_empty_pseudo_element_still_folds() {
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), StyleMap::new()));
    tree.append(0, NodeData::pseudo_element("after", StyleMap::new()))
        .unwrap();
    let conversion = convert(&mut tree, &Options::default(), &Css).unwrap();
    let parent = tree.node(0).unwrap().data.style().unwrap();
    assert_eq!(parent.pseudo_elements["::after"], StyleMap::new());
    assert_eq!(class_of(&tree, 0).as_deref(), Some("divCls"));
    assert_eq!(conversion.stylesheet, ".divCls {\n}");
}

#[test]
fn test_colliding_names_get_suffixes() {
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), StyleMap::new()));
    for width in ["1", "2", "3"] {
        tree.append(
            0,
            element("button", attributes! {"class" => "btn"}, style_map! {"width" => width}),
        )
        .unwrap();
    }
    let conversion = convert(&mut tree, &Options::default(), &Css).unwrap();
    let classes: Vec<_> = (1..=3).map(|id| class_of(&tree, id).unwrap()).collect();
    assert_eq!(classes, vec!["btn", "btn0", "btn1"]);
    assert_eq!(
        conversion.stylesheet,
        ".btn {\n    width: 1px;\n}\n.btn0 {\n    width: 2px;\n}\n.btn1 {\n    width: 3px;\n}"
    );
}

#[test]
fn test_palette_first_name_wins() {
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), StyleMap::new()));
    let a = tree
        .append(0, element("p", DOMAttributes::empty(), style_map! {"color" => "rgb(255, 0, 0)"}))
        .unwrap();
    let b = tree
        .append(
            0,
            element("p", DOMAttributes::empty(), style_map! {"border-color" => "#FF0000"}),
        )
        .unwrap();
    let conversion = convert(&mut tree, &colors(), &TypeStyle).unwrap();
    let palette: Vec<_> = conversion.symbols.palette().iter().collect();
    assert_eq!(palette, vec![("red", "#ff0000")]);
    let style_of = |id| tree.node(id).unwrap().data.style().unwrap().clone();
    assert_eq!(style_of(a).get("color"), Some(&StyleValue::from("#ff0000")));
    assert_eq!(style_of(b).get("borderColor"), Some(&StyleValue::from("#FF0000")));
}

#[test]
fn test_colors_are_left_alone_unless_asked() {
    let mut tree = Tree::new(element(
        "div",
        DOMAttributes::empty(),
        style_map! {"color" => "rgb(255, 0, 0)"},
    ));
    let conversion = convert(&mut tree, &Options::default(), &TypeStyle).unwrap();
    assert!(conversion.symbols.palette().is_empty());
    assert!(!conversion.stylesheet.contains("colors"));
    assert!(conversion.stylesheet.contains("color: 'rgb(255, 0, 0)'"));
}

#[test]
fn test_empty_palette_is_not_printed() {
    let build = || {
        Tree::new(element(
            "div",
            DOMAttributes::empty(),
            style_map! {"margin" => "0"},
        ))
    };
    let typestyle = convert(&mut build(), &colors(), &TypeStyle).unwrap();
    assert!(typestyle.symbols.palette().is_empty());
    assert_eq!(
        typestyle.stylesheet,
        "import { style } from 'typestyle';\nexport const divCls = style({\n    margin: 0,\n});"
    );
    let plain = convert(&mut build(), &colors(), &Css).unwrap();
    assert_eq!(plain.stylesheet, ".divCls {\n    margin: 0;\n}");
}

#[test]
fn test_signed_zero_numbers_share_a_class() {
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), StyleMap::new()));
    let a = tree
        .append(0, element("p", DOMAttributes::empty(), style_map! {"margin" => 0.0}))
        .unwrap();
    let b = tree
        .append(0, element("p", DOMAttributes::empty(), style_map! {"margin" => -0.0}))
        .unwrap();
    let conversion = convert(&mut tree, &Options::default(), &Css).unwrap();
    assert_eq!(class_of(&tree, a).as_deref(), Some("pCls"));
    assert_eq!(class_of(&tree, b).as_deref(), Some("pCls"));
    assert_eq!(conversion.stylesheet, ".pCls {\n    margin: 0;\n}");
}

#[test]
fn test_attributes_are_annotated() {
    let mut tree = Tree::new(element(
        "nav",
        attributes! {"class" => "menu", "data-qa" => "nav"},
        style_map! {"display" => "block"},
    ));
    let link = tree
        .append(
            0,
            element("a", attributes! {"href" => "b/c.html", "data-id" => "7"}, StyleMap::new()),
        )
        .unwrap();
    tree.append(link, NodeData::text("Next")).unwrap();
    let options = Options {
        remove_data_attributes: true,
        base_url: Some(Url::parse("https://example.com/a/").unwrap()),
        ..Default::default()
    };
    convert(&mut tree, &options, &TypeStyle).unwrap();
    assert_eq!(
        to_markup(&tree).unwrap(),
        r#"<nav class="menu"><a href="https://example.com/a/b/c.html">Next</a></nav>"#
    );

    let mut kept = Tree::new(element(
        "nav",
        attributes! {"data-qa" => "nav"},
        StyleMap::new(),
    ));
    convert(&mut kept, &Options::default(), &TypeStyle).unwrap();
    assert_eq!(to_markup(&kept).unwrap(), r#"<nav data-qa="nav"></nav>"#);
}

#[test]
fn test_malformed_tree_produces_nothing() {
    let mut tree = Tree::new(element("div", DOMAttributes::empty(), style_map! {"color" => "red"}));
    let child = tree
        .append(0, element("p", DOMAttributes::empty(), style_map! {"color" => "red"}))
        .unwrap();
    tree.node_mut(child).unwrap().children.push(0);
    let result = convert(&mut tree, &colors(), &TypeStyle);
    assert!(matches!(result, Err(Error::Tree(TreeError::Revisited(0)))));
    assert_eq!(class_of(&tree, 0), None);
    assert_eq!(class_of(&tree, child), None);
}

#[test]
fn test_runs_are_independent() {
    let build = || {
        let mut tree = Tree::new(element("div", attributes! {"id" => "app"}, StyleMap::new()));
        tree.append(0, element("p", DOMAttributes::empty(), style_map! {"margin" => "0"}))
            .unwrap();
        tree
    };
    let first = convert(&mut build(), &colors(), &TypeStyle).unwrap();
    let second = convert(&mut build(), &colors(), &TypeStyle).unwrap();
    assert_eq!(first.stylesheet, second.stylesheet);
    assert!(second.stylesheet.contains("export const pCls ="));
    assert!(!second.stylesheet.contains("pCls0"));
}

#[test]
fn test_capture_end_to_end() {
    let input = r##"{
        "url": "https://example.com/a/",
        "removeDataAttributes": true,
        "extractColors": true,
        "root": 10,
        "nodes": [
            { "id": 10, "kind": "element", "tag": "div",
              "attributes": [["id", "promo-box"], ["data-track", "x"]],
              "style": { "background-color": "rgba(0, 0, 128, 1)", "padding": "8px" },
              "children": [11, 12] },
            { "id": 11, "kind": "element", "tag": "img",
              "attributes": [["src", "img/logo.png"]],
              "style": { "width": "32" } },
            { "id": 12, "kind": "pseudoElement", "pseudo": "after",
              "style": { "content": "\"\"", "color": "#fff" } }
        ]
    }"##;
    let (mut tree, options) = Capture::from_json(input).unwrap().build().unwrap();
    let conversion = convert(&mut tree, &options, &Css).unwrap();
    let expected = r#":root {
    --white: #fff;
    --navy: rgba(0, 0, 128, 1);
}
.promoBox {
    background-color: rgba(0, 0, 128, 1);
    padding: 8px;
}
.promoBox::after {
    color: #fff;
    content: "";
}
.imgCls {
    width: 32px;
}"#;
    assert_eq!(conversion.stylesheet, expected);
    assert_eq!(
        to_markup(&tree).unwrap(),
        r#"<div class="promoBox" id="promo-box"><img class="imgCls" src="https://example.com/a/img/logo.png"></div>"#
    );
}
