use layer_canvas::{
    metrics, str_length, Layer, LayerKind, LayoutDiagnostic, LayoutSession, ReferLayer,
    Registration, Scale,
};

fn session(scale: f32) -> LayoutSession {
    LayoutSession::new(Scale::new(scale).unwrap())
}

fn boxed(id: &str, top: f32, left: f32, width: f32, height: f32) -> Layer {
    Layer {
        id: Some(id.to_string()),
        top: Some(top),
        left: Some(left),
        width: Some(width),
        height: Some(height),
        ..Layer::default()
    }
}

fn finish(session: &mut LayoutSession, layer: Layer, kind: LayerKind) -> Registration {
    let mut resolved = session.resolve_position(layer);
    resolved.set_kind(kind);
    session.add_layer(resolved)
}

#[test]
fn references_chain_in_caller_units() {
    let mut s = session(2.0);
    finish(&mut s, boxed("#header", 0.0, 10.0, 30.0, 100.0), LayerKind::Rectangle);

    let body = s.resolve_position(Layer {
        id: Some("#body".to_string()),
        height: Some(40.0),
        refer_layer: Some(ReferLayer {
            id: "#header".to_string(),
            top: Some(20.0),
            left: Some(8.0),
        }),
        ..Layer::default()
    });
    // Device units while drawing.
    assert_eq!(body.top, Some(240.0));
    assert_eq!(body.left, Some(96.0));
    assert_eq!(s.add_layer(body), Registration::Indexed);

    let stored = s.registry().get("#body").unwrap();
    assert_eq!(stored.top, Some(120.0));
    assert_eq!(stored.left, Some(48.0));
    assert_eq!(stored.height, Some(40.0));
    assert!(stored.refer_layer.is_none());
    assert_eq!(s.auto_height(), Some(160.0));
}

#[test]
fn layers_decode_from_json_and_resolve() {
    let mut s = session(1.0);
    let head = Layer::from_json_str(r##"{"id": "#a", "top": 5, "height": 10}"##).unwrap();
    finish(&mut s, head, LayerKind::Rectangle);

    let next = Layer::from_json_str(
        r##"{"id": "#b", "top": 999, "height": 4, "referLayer": {"id": "#a", "top": 3}}"##,
    )
    .unwrap();
    finish(&mut s, next, LayerKind::Image);

    assert_eq!(s.registry().get("#b").unwrap().top, Some(18.0));
    assert_eq!(s.registry().get("#b").unwrap().kind, Some(LayerKind::Image));
    assert_eq!(s.auto_height(), Some(22.0));
}

#[test]
fn artboard_does_not_stretch_auto_height() {
    let mut s = session(2.0);
    let mut board = s.adopt_device_layer(boxed("#board", 0.0, 0.0, 750.0, 1334.0));
    board.set_kind(LayerKind::Artboard);
    s.add_layer(board);
    assert_eq!(s.auto_height(), Some(0.0));

    finish(&mut s, boxed("#card", 5.0, 0.0, 10.0, 10.0), LayerKind::Rectangle);
    assert_eq!(s.auto_height(), Some(15.0));
    assert_eq!(s.registry().get("#board").unwrap().height, Some(667.0));
}

#[test]
fn empty_session_has_no_auto_height() {
    assert_eq!(session(3.0).auto_height(), None);
}

#[test]
fn unusable_scales_are_rejected() {
    for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let err = Scale::new(bad).unwrap_err();
        assert_eq!(err.code, "invalid_scale");
    }
}

#[test]
fn diagnostics_accumulate_in_order() {
    let mut s = session(1.0);
    finish(&mut s, Layer::default(), LayerKind::WrapText);
    finish(&mut s, boxed("#x", 0.0, 0.0, 1.0, 1.0), LayerKind::Rectangle);
    finish(&mut s, boxed("#x", 9.0, 0.0, 1.0, 1.0), LayerKind::Rectangle);

    let codes: Vec<&str> = s.diagnostics().iter().map(LayoutDiagnostic::code).collect();
    assert_eq!(codes, vec!["missing_id", "duplicate_id"]);
    assert_eq!(s.registry().len(), 3);
    assert_eq!(s.auto_height(), Some(10.0));
}

#[test]
fn estimates_count_wide_characters_double() {
    assert_eq!(str_length("poster"), 3);
    assert_eq!(str_length("海报"), 2);
    assert_eq!(str_length("a海"), 2);

    let estimate = metrics::TextEstimate {
        text: "hello world!",
        width: 30.0,
        font_size: 10.0,
        line_height: 4.0,
        scale: 2.0,
    };
    // 6 units * 10px = 60px over 30px: two rows.
    assert_eq!(metrics::text_width(&estimate), 120.0);
    assert_eq!(metrics::text_height(&estimate), 2.0 * 14.0 * 2.0 - 4.0);
}
