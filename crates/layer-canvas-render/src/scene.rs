use core::fmt;
use serde::{Deserialize, Serialize};

use layer_canvas::{CanvasError, Layer};

use crate::render_engine::Canvas;
use crate::surface::Surface;

/// One layer-creation call, as it appears in a JSON scene.
///
/// Tagged by `op`; the layer fields sit next to the tag:
/// `{"op": "wrapText", "id": "#title", "text": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LayerOp {
    Artboard(Layer),
    Rectangle(Layer),
    Image(Layer),
    CircleImage(Layer),
    WrapText(Layer),
}

/// Decode a JSON array of [`LayerOp`]s.
pub fn parse_scene(json: &str) -> Result<Vec<LayerOp>, CanvasError> {
    serde_json::from_str(json).map_err(|err| CanvasError::invalid_layer_json(&err))
}

/// Failure while applying a JSON scene.
#[derive(Debug)]
pub enum ApplyError<E> {
    /// The scene did not decode; nothing was drawn.
    Scene(CanvasError),
    /// The surface rejected a draw; earlier ops were already applied.
    Surface(E),
}

impl<E: fmt::Display> fmt::Display for ApplyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(err) => write!(f, "scene: {}", err),
            Self::Surface(err) => write!(f, "surface: {}", err),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for ApplyError<E> {}

impl<S> Canvas<S>
where
    S: Surface,
{
    /// Dispatch one op to its creation method.
    pub fn apply(&mut self, op: LayerOp) -> Result<&mut Self, S::Error> {
        match op {
            LayerOp::Artboard(layer) => self.create_artboard(layer),
            LayerOp::Rectangle(layer) => self.create_rectangle(layer),
            LayerOp::Image(layer) => self.draw_image(layer),
            LayerOp::CircleImage(layer) => self.draw_circle_image(layer),
            LayerOp::WrapText(layer) => self.draw_wrap_text(layer),
        }
    }

    /// Decode a JSON scene and apply its ops in order.
    pub fn apply_json(&mut self, json: &str) -> Result<&mut Self, ApplyError<S::Error>> {
        let ops = parse_scene(json).map_err(ApplyError::Scene)?;
        for op in ops {
            self.apply(op).map_err(ApplyError::Surface)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_engine::CanvasConfig;
    use crate::surface::RecordingSurface;
    use layer_canvas::LayerKind;

    #[test]
    fn ops_decode_with_flattened_layer_fields() {
        let ops = parse_scene(
            r##"[
                {"op": "artboard", "width": 750, "height": 1200},
                {"op": "circleImage", "id": "#avatar", "path": "a.png", "d": 80},
                {"op": "wrapText", "id": "#name", "text": "hello",
                 "referLayer": {"id": "#avatar", "top": 10}}
            ]"##,
        )
        .unwrap();
        assert_eq!(ops.len(), 3);
        let LayerOp::WrapText(text) = &ops[2] else {
            panic!("expected wrapText op");
        };
        assert_eq!(text.text.as_deref(), Some("hello"));
        assert_eq!(text.refer_layer.as_ref().map(|r| r.id.as_str()), Some("#avatar"));
    }

    #[test]
    fn unknown_op_is_a_scene_error() {
        let err = parse_scene(r#"[{"op": "triangle"}]"#).unwrap_err();
        assert_eq!(err.code, "invalid_layer_json");
    }

    #[test]
    fn apply_json_runs_ops_in_order() {
        let mut canvas = Canvas::new(CanvasConfig::default(), RecordingSurface::new()).unwrap();
        canvas
            .apply_json(
                r##"[
                    {"op": "rectangle", "id": "#bar", "top": 0, "height": 40, "width": 100},
                    {"op": "image", "id": "#pic", "path": "p.png", "width": 20, "height": 20,
                     "referLayer": {"id": "#bar", "top": 5}}
                ]"##,
            )
            .unwrap();
        let kinds: Vec<Option<LayerKind>> = canvas.registry().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![Some(LayerKind::Rectangle), Some(LayerKind::Image)]);
        assert_eq!(canvas.registry().get("#pic").unwrap().top, Some(45.0));
        assert_eq!(canvas.auto_height(), Some(65.0));
    }

    #[test]
    fn apply_json_reports_decode_failures() {
        let mut canvas = Canvas::new(CanvasConfig::default(), RecordingSurface::new()).unwrap();
        let err = canvas.apply_json("{ not json").err().unwrap();
        assert!(matches!(err, ApplyError::Scene(_)));
        assert!(canvas.registry().is_empty());
    }
}
