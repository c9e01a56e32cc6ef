mod common;

use common::{page, swatch, text, Logs, MockApi};
use design_tokens_core::{
    colors::extract_colors,
    config::{Config, Pages},
    generate,
    icons::extract_icons,
    session::{Session, SUBTREE_DEPTH},
    themes::write_colors,
    typography::extract_typography,
};
use serde_json::{json, Value};

fn document() -> Value {
    json!({
        "id": "0:0", "name": "Document", "type": "DOCUMENT",
        "children": [
            { "id": "1:0", "name": "Typography", "type": "CANVAS" },
            { "id": "2:0", "name": "Colors", "type": "CANVAS" },
            { "id": "3:0", "name": "Icons", "type": "CANVAS" }
        ]
    })
}

fn config() -> Config {
    Config {
        project_id: "file".to_string(),
        pages: Pages {
            typography: Some("Typography".to_string()),
            colors: Some("Colors".to_string()),
            icons: Some("Icons".to_string()),
        },
        ..Config::default()
    }
}

fn icons_entry(components: Value, component_sets: Value) -> Value {
    json!({
        "document": page("3:0", "Icons", json!([])),
        "components": components,
        "componentSets": component_sets,
    })
}

fn full_api() -> MockApi {
    MockApi {
        document: Some(document()),
        ..MockApi::default()
    }
    .with_node(
        "1:0",
        json!({ "document": page("1:0", "Typography", json!([
            text("Heading", 32.0),
            { "name": "frame", "type": "FRAME", "children": [text("Body", 16.0)] }
        ])) }),
    )
    .with_node(
        "2:0",
        json!({ "document": page("2:0", "Colors", json!([
            swatch("Primary/Main", [1.0, 0.0, 0.0], Some(1.0)),
            { "name": "Note", "type": "TEXT" },
            swatch("Gray", [0.5, 0.5, 0.5], None)
        ])) }),
    )
    .with_node(
        "3:0",
        icons_entry(
            json!({
                "c1": { "key": "k1", "name": "size=16, variant=outline", "componentSetId": "s1" },
                "c2": { "key": "k2", "name": "logo" }
            }),
            json!({ "s1": { "key": "ks1", "name": "arrow" } }),
        ),
    )
    .with_svg("c1", "<svg id=\"arrow\"/>")
    .with_svg("c2", "<svg id=\"logo\"/>")
}

#[tokio::test]
async fn generates_every_configured_token_kind() {
    let session = Session::new(full_api());
    let root = session.load_root().await.unwrap();

    let tokens = generate(&session, &root.document, &config()).await;

    let typography = tokens.typography.unwrap();
    assert_eq!(
        typography.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["Heading", "Body"]
    );
    assert_eq!(typography[1].line_height_px, 20.0);

    let colors = tokens.colors.unwrap();
    assert_eq!(colors.len(), 2);
    assert_eq!(colors[1].opacity, None);

    let icons = tokens.icons.unwrap();
    assert_eq!(icons["arrow-16-outline"], "<svg id=\"arrow\"/>");
    assert_eq!(icons["logo"], "<svg id=\"logo\"/>");
    assert_eq!(icons.len(), 2);
}

#[tokio::test]
async fn subtrees_are_loaded_deep() {
    let api = std::sync::Arc::new(full_api());
    let session = Session::from_arc(api.clone());
    session.load_subtree("1:0").await.unwrap();
    session.load_component_index("3:0").await.unwrap();

    assert_eq!(*api.node_depths.lock().unwrap(), vec![Some(SUBTREE_DEPTH), None]);
}

#[tokio::test]
async fn colors_flow_into_stylesheets() {
    let session = Session::new(full_api());
    let root = session.load_root().await.unwrap();
    let tokens = generate(&session, &root.document, &config()).await;

    let artifacts = write_colors(&tokens.colors.unwrap(), &config());
    assert_eq!(
        artifacts.stylesheets[0].content,
        ":root {\n  --color-gray: #808080;\n  --color-primary-main: rgba(255, 0, 0, 1);\n}\n"
    );
}

#[tokio::test]
async fn unconfigured_and_missing_pages_are_absent() {
    let api = MockApi {
        document: Some(document()),
        ..MockApi::default()
    };
    let session = Session::new(api);
    let root = session.load_root().await.unwrap();
    let config = Config {
        pages: Pages {
            typography: Some("Typography".to_string()),
            colors: None,
            icons: Some("Nowhere".to_string()),
        },
        ..config()
    };

    let tokens = generate(&session, &root.document, &config).await;

    assert!(tokens.typography.is_none());
    assert!(tokens.colors.is_none());
    assert!(tokens.icons.is_none());
}

#[tokio::test]
async fn failed_icon_downloads_are_skipped() {
    let mut api = full_api().with_node(
        "3:0",
        icons_entry(
            json!({
                "c1": { "name": "logo" },
                "c2": { "name": "broken" },
                "c3": { "name": "unrendered" }
            }),
            json!({}),
        ),
    );
    api.images.insert("c2".to_string(), Some("https://cdn.test/gone.svg".to_string()));
    api.images.insert("c3".to_string(), None);
    let session = Session::new(api.with_svg("c1", "<svg/>"));

    let icons = extract_icons(&session, "3:0").await.unwrap();

    assert_eq!(icons.keys().collect::<Vec<_>>(), vec!["logo"]);
}

#[tokio::test]
async fn icons_without_component_index_are_absent() {
    let api = MockApi::default()
        .with_node("3:0", json!({ "document": page("3:0", "Icons", json!([])) }));
    let session = Session::new(api);

    assert!(extract_icons(&session, "3:0").await.is_none());
}

#[tokio::test]
async fn svg_urls_are_requested_in_chunks() {
    let components: serde_json::Map<String, Value> = (0..1001)
        .map(|i| (format!("c{i}"), json!({ "name": format!("icon-{i}") })))
        .collect();
    let mut api =
        MockApi::default().with_node("3:0", icons_entry(Value::Object(components), json!({})));
    for i in 0..1001 {
        api = api.with_svg(&format!("c{i}"), "<svg/>");
    }
    let api = std::sync::Arc::new(api);
    let session = Session::from_arc(api.clone());
    let (logs, _guard) = Logs::capture();

    let icons = extract_icons(&session, "3:0").await.unwrap();

    assert_eq!(*api.image_batches.lock().unwrap(), vec![500, 500, 1]);
    assert_eq!(
        logs.after("fetch icons meta: "),
        vec!["0.00%", "49.95%", "99.90%", "100%"]
    );
    assert_eq!(icons.len(), 1001);
    assert_eq!(icons.get_index(0).map(|(name, _)| name.as_str()), Some("icon-0"));
}

#[tokio::test]
async fn icon_downloads_report_progress_per_batch() {
    let components: serde_json::Map<String, Value> = (0..6)
        .map(|i| (format!("c{i}"), json!({ "name": format!("icon-{i}") })))
        .collect();
    let mut api =
        MockApi::default().with_node("3:0", icons_entry(Value::Object(components), json!({})));
    for i in 0..6 {
        api = api.with_svg(&format!("c{i}"), "<svg/>");
    }
    let session = Session::new(api);
    let (logs, _guard) = Logs::capture();

    let icons = extract_icons(&session, "3:0").await.unwrap();

    assert_eq!(icons.len(), 6);
    assert_eq!(logs.after("fetch icons meta: "), vec!["0.00%", "100%"]);
    assert_eq!(
        logs.after("fetch icons progress: "),
        vec!["0.00%", "66.67%", "100%"]
    );
}

#[tokio::test]
async fn incomplete_text_style_skips_only_that_leaf() {
    let api = MockApi::default().with_node(
        "1:0",
        json!({ "document": page("1:0", "Typography", json!([
            text("Heading", 32.0),
            { "name": "Odd", "type": "TEXT", "style": { "fontFamily": "Inter", "fontSize": 12 } }
        ])) }),
    );
    let session = Session::new(api);

    let typography = extract_typography(&session, "1:0").await.unwrap();

    assert_eq!(
        typography.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["Heading"]
    );
}

#[tokio::test]
async fn odd_nodes_on_the_colors_page_keep_the_valid_swatches() {
    let api = MockApi::default().with_node(
        "2:0",
        json!({ "document": page("2:0", "Colors", json!([
            swatch("Primary/Main", [1.0, 0.0, 0.0], Some(1.0)),
            { "name": "Label", "type": "TEXT", "style": { "fontFamily": "Inter" } },
            { "name": "Partial", "type": "RECTANGLE", "fills": [
                { "type": "SOLID", "color": { "r": 0, "g": 1 } }
            ]}
        ])) }),
    );
    let session = Session::new(api);

    let colors = extract_colors(&session, "2:0").await.unwrap();

    assert_eq!(
        colors.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Primary/Main"]
    );
}
