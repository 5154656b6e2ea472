//! Integration tests for editor crate

use scenecraft_common::{ResolvedAsset, StaticAssetResolver};
use scenecraft_editor::{EditorError, Mutation, PlacementIntent, SceneDocument, SceneEvent};
use scenecraft_model::{
    Anchor, AssetRef, LayoutPatch, NodeKind, NodeType, ObjectFit, StylePatch, ROOT_ID,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(doc: &SceneDocument) -> (Rc<RefCell<Vec<SceneEvent>>>, scenecraft_editor::Subscription) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let sub = doc.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (log, sub)
}

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("landing", 800.0, 600.0);
    assert_eq!(doc.version(), 0);

    let title = doc.create_node_with(
        NodeType::Text,
        &json!({
            "content": "Hello",
            "layout": { "x": 10, "y": 10, "width": 780, "height": 40 }
        }),
    )?;
    let title_id = title.id.clone();
    doc.add_child(ROOT_ID, title)?;

    assert_eq!(doc.version(), 1);
    assert_eq!(doc.root().children.len(), 1);
    assert_eq!(doc.find_node(&title_id).unwrap().layout.width, 780.0);

    assert!(doc.undo());
    assert!(doc.find_node(&title_id).is_none());
    assert!(doc.can_redo());

    assert!(doc.redo());
    assert!(doc.find_node(&title_id).is_some());
    Ok(())
}

#[test]
fn test_bind_asset_through_resolver() -> anyhow::Result<()> {
    let resolver = StaticAssetResolver::new().with("a1", "https://x/img.png");
    let mut doc = SceneDocument::new("media", 800.0, 600.0).with_resolver(Rc::new(resolver));

    let image = doc.create_node(NodeType::Image);
    let image_id = image.id.clone();
    doc.add_child(ROOT_ID, image)?;

    let (log, _sub) = recorder(&doc);
    doc.bind_asset(&image_id, AssetRef::from_id("a1"))?;

    match &doc.find_node(&image_id).unwrap().kind {
        NodeKind::Image { asset, .. } => {
            assert_eq!(asset.asset_id.as_deref(), Some("a1"));
            assert_eq!(asset.url, None);
        }
        other => panic!("Expected image, got {:?}", other),
    }
    assert!(!doc.to_json()?.contains("https://x/img.png"));
    assert_eq!(
        log.borrow()[0],
        SceneEvent::NodeChanged {
            id: image_id.clone()
        }
    );
    Ok(())
}

#[test]
fn test_unresolvable_bind_is_stored_unresolved() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("media", 800.0, 600.0);
    let video = doc.create_node(NodeType::Video);
    let id = video.id.clone();
    doc.add_child(ROOT_ID, video)?;

    doc.bind_asset(&id, AssetRef::from_id("missing"))?;
    match &doc.find_node(&id).unwrap().kind {
        NodeKind::Video { asset, .. } => {
            assert_eq!(asset.asset_id.as_deref(), Some("missing"));
            assert_eq!(asset.url, None);
        }
        other => panic!("Expected video, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_placement_intents_are_one_edit() -> anyhow::Result<()> {
    let mut resolver = StaticAssetResolver::new();
    resolver.insert("hero-img", ResolvedAsset::new("https://x/hero.png").with_alt("Hero"));
    let mut doc = SceneDocument::new("template", 1200.0, 800.0).with_resolver(Rc::new(resolver));

    let hero = doc.create_node_with(NodeType::Placeholder, &json!({ "slotId": "hero" }))?;
    let logo = doc.create_node_with(NodeType::Placeholder, &json!({ "slotId": "logo" }))?;
    let hero_id = hero.id.clone();
    let logo_id = logo.id.clone();
    doc.add_child(ROOT_ID, hero)?;
    doc.add_child(ROOT_ID, logo)?;
    let version = doc.version();

    let (log, _sub) = recorder(&doc);
    doc.apply_placement_intents(&[
        PlacementIntent::new("hero-img", "hero").fit("cover").position("top"),
        PlacementIntent::new("logo-img", "logo").fit("CONTAIN").opacity(0.5),
    ])?;

    assert_eq!(doc.version(), version + 1);
    assert_eq!(doc.undo_label(), Some("apply placement intents"));
    assert_eq!(
        *log.borrow(),
        vec![
            SceneEvent::SceneChanged,
            SceneEvent::HistoryChanged {
                can_undo: true,
                can_redo: false
            }
        ]
    );

    match &doc.find_node(&hero_id).unwrap().kind {
        NodeKind::Placeholder {
            current_asset,
            fit,
            position,
            ..
        } => {
            let asset = current_asset.as_ref().unwrap();
            assert_eq!(asset.asset_id.as_deref(), Some("hero-img"));
            assert_eq!(asset.url, None);
            assert_eq!(asset.alt.as_deref(), Some("Hero"));
            assert_eq!(*fit, ObjectFit::Cover);
            assert_eq!(*position, Anchor::Top);
        }
        other => panic!("Expected placeholder, got {:?}", other),
    }
    let logo = doc.find_node(&logo_id).unwrap();
    assert_eq!(logo.style.opacity, Some(0.5));

    // One undo reverts the whole batch
    assert!(doc.undo());
    match &doc.find_node(&hero_id).unwrap().kind {
        NodeKind::Placeholder { current_asset, .. } => assert!(current_asset.is_none()),
        other => panic!("Expected placeholder, got {:?}", other),
    }
    assert_eq!(doc.find_node(&logo_id).unwrap().style.opacity, None);
    Ok(())
}

#[test]
fn test_unknown_slot_rejects_whole_batch() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("template", 800.0, 600.0);
    let slot = doc.create_node_with(NodeType::Placeholder, &json!({ "slotId": "hero" }))?;
    doc.add_child(ROOT_ID, slot)?;
    let before = doc.to_json()?;

    let err = doc
        .apply_placement_intents(&[
            PlacementIntent::new("a", "hero"),
            PlacementIntent::new("b", "sidebar"),
        ])
        .unwrap_err();
    assert!(err.to_string().contains("sidebar"));
    assert_eq!(doc.to_json()?, before);
    Ok(())
}

#[test]
fn test_json_round_trip_is_exact() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("roundtrip", 640.0, 480.0);
    let frame = doc.create_node(NodeType::Frame);
    let frame_id = frame.id.clone();
    doc.add_child(ROOT_ID, frame)?;
    let shape = doc.create_node(NodeType::Shape);
    doc.add_child(&frame_id, shape)?;
    doc.update_style(
        &frame_id,
        StylePatch {
            background_color: Some("#123456".to_string()),
            opacity: Some(0.75),
            ..Default::default()
        },
    )?;

    let json = doc.to_json()?;
    let mut other = SceneDocument::new("other", 1.0, 1.0);
    other.import_json(&json)?;

    assert_eq!(other.root(), doc.root());
    assert_eq!(other.version(), doc.version());
    assert_eq!(other.to_json()?, json);
    assert!(!other.can_undo());
    Ok(())
}

#[test]
fn test_invalid_style_values_are_rejected() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("styles", 800.0, 600.0);
    let frame = doc.create_node(NodeType::Frame);
    let id = frame.id.clone();
    doc.add_child(ROOT_ID, frame)?;
    let version = doc.version();
    let before = doc.to_json()?;

    for opacity in [f64::NAN, 7.5] {
        let err = doc
            .update_style(
                &id,
                StylePatch {
                    opacity: Some(opacity),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Mutation(scenecraft_editor::MutationError::Model(
                scenecraft_model::ModelError::InvalidStyle { .. }
            ))
        ));
    }

    assert_eq!(doc.version(), version);
    assert_eq!(doc.to_json()?, before);
    Ok(())
}

#[test]
fn test_float_layout_survives_export_and_import() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("floats", 800.0, 600.0);
    let text = doc.create_node(NodeType::Text);
    let id = text.id.clone();
    doc.add_child(ROOT_ID, text)?;
    doc.update_layout(&id, LayoutPatch::position(985.6906946328695, 0.1 + 0.2))?;

    let mut other = SceneDocument::new("other", 1.0, 1.0);
    other.import_json(&doc.to_json()?)?;

    let layout = &other.find_node(&id).unwrap().layout;
    assert_eq!(layout.x, 985.6906946328695);
    assert_eq!(layout.y, 0.1 + 0.2);
    assert_eq!(other.root(), doc.root());
    Ok(())
}

#[test]
fn test_import_failure_leaves_document_untouched() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("atomic", 800.0, 600.0);
    let text = doc.create_node(NodeType::Text);
    doc.add_child(ROOT_ID, text)?;
    let before = doc.to_json()?;

    let (log, _sub) = recorder(&doc);
    let err = doc
        .import_json(r#"{ "root": { "canvas": { "width": 1, "height": 1 }, "children": [ { "id": "x", "type": "nope" } ] }, "version": 1 }"#)
        .unwrap_err();
    assert!(matches!(err, EditorError::Serialization(_)));

    let err = doc.import_json("not json").unwrap_err();
    assert!(matches!(err, EditorError::Serialization(_)));

    assert_eq!(doc.to_json()?, before);
    assert!(doc.can_undo());
    assert!(log.borrow().is_empty());
    Ok(())
}

#[test]
fn test_import_clears_focus_and_history() -> anyhow::Result<()> {
    let mut source = SceneDocument::new("source", 300.0, 200.0);
    let node = source.create_node(NodeType::Group);
    source.add_child(ROOT_ID, node)?;
    let json = source.to_json()?;

    let mut doc = SceneDocument::new("target", 800.0, 600.0);
    let text = doc.create_node(NodeType::Text);
    let text_id = text.id.clone();
    doc.add_child(ROOT_ID, text)?;
    doc.select_nodes([text_id])?;

    let (log, _sub) = recorder(&doc);
    doc.import_json(&json)?;

    assert!(doc.selection().is_empty());
    assert_eq!(doc.version(), 1);
    assert_eq!(
        *log.borrow(),
        vec![
            SceneEvent::SceneChanged,
            SceneEvent::HistoryChanged {
                can_undo: false,
                can_redo: false
            },
            SceneEvent::NodeSelected { ids: vec![] },
        ]
    );
    Ok(())
}

#[test]
fn test_imported_ids_are_never_reissued() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("ids", 800.0, 600.0);
    let a = doc.create_node(NodeType::Text);
    let b = doc.create_node(NodeType::Text);
    doc.add_child(ROOT_ID, a)?;
    doc.add_child(ROOT_ID, b)?;
    let json = doc.to_json()?;

    let mut reloaded = SceneDocument::from_json("ids", &json)?;
    let fresh = reloaded.create_node(NodeType::Text);
    assert!(reloaded.find_node(&fresh.id).is_none());
    reloaded.add_child(ROOT_ID, fresh)?;
    assert_eq!(reloaded.root().node_count(), 3);
    Ok(())
}

#[test]
fn test_reset_produces_blank_scene() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("reset", 800.0, 600.0);
    let text = doc.create_node(NodeType::Text);
    doc.add_child(ROOT_ID, text)?;

    doc.reset(1024.0, 768.0);
    assert_eq!(doc.version(), 0);
    assert!(doc.root().children.is_empty());
    assert_eq!(doc.root().canvas.width, 1024.0);
    assert_eq!(doc.root().canvas.background_color, "#ffffff");
    assert!(!doc.can_undo());
    Ok(())
}

#[test]
fn test_missing_ids_raise() {
    let mut doc = SceneDocument::new("errors", 800.0, 600.0);
    let node = doc.create_node(NodeType::Text);

    assert!(doc.add_child("ghost", node).is_err());
    assert!(doc.update_layout("ghost", LayoutPatch::position(1.0, 1.0)).is_err());
    assert!(doc.set_text("ghost", "x").is_err());
    assert!(doc.bind_asset("ghost", AssetRef::from_id("a")).is_err());
    assert!(doc.move_node("ghost", ROOT_ID, 0).is_err());
    assert!(doc.remove_node(ROOT_ID).is_err());
    assert_eq!(doc.version(), 0);
}

#[test]
fn test_mutation_serialization() {
    let mutation = Mutation::MoveNode {
        node_id: "elem-1".to_string(),
        new_parent_id: "container-2".to_string(),
        index: 0,
    };

    let json = serde_json::to_string(&mutation).unwrap();
    let back: Mutation = serde_json::from_str(&json).unwrap();
    assert_eq!(mutation, back);
}

#[test]
fn test_serialized_mutation_applies_like_command() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("wire", 800.0, 600.0);
    let text = doc.create_node(NodeType::Text);
    let id = text.id.clone();
    doc.add_child(ROOT_ID, text)?;

    let message = json!({ "SetText": { "node_id": id, "content": "From the wire" } });
    let mutation: Mutation = serde_json::from_value(message)?;
    doc.apply(mutation)?;

    match &doc.find_node(&id).unwrap().kind {
        NodeKind::Text { content } => assert_eq!(content, "From the wire"),
        other => panic!("Expected text, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_subscription_guard_scopes_listener() -> anyhow::Result<()> {
    let mut doc = SceneDocument::new("events", 800.0, 600.0);
    {
        let (log, _sub) = recorder(&doc);
        assert_eq!(doc.listener_count(), 1);
        let node = doc.create_node(NodeType::Shape);
        doc.add_child(ROOT_ID, node)?;
        assert_eq!(log.borrow().len(), 2);
    }
    assert_eq!(doc.listener_count(), 0);
    Ok(())
}
