use core::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use layer_canvas_embedded_graphics::{EgSurface, MonoMeasurer, RgbBitmap};
use layer_canvas_render::{
    Canvas, CanvasConfig, Layer, RecordingSurface, ReferLayer, TextMeasurer,
};

struct Capture {
    size: Size,
    pixels: Vec<(Point, Rgb888)>,
}

impl Capture {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: Vec::new(),
        }
    }

    fn at(&self, x: i32, y: i32) -> Option<Rgb888> {
        let target = Point::new(x, y);
        self.pixels
            .iter()
            .rev()
            .find(|(point, _)| *point == target)
            .map(|(_, color)| *color)
    }
}

impl OriginDimensions for Capture {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Capture {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pixels
            .extend(pixels.into_iter().map(|Pixel(point, color)| (point, color)));
        Ok(())
    }
}

const BOARD: Rgb888 = Rgb888::new(0xcc, 0xcc, 0xcc);
const RED: Rgb888 = Rgb888::new(0xff, 0, 0);
const INK: Rgb888 = Rgb888::new(0x33, 0x33, 0x33);

fn layer(id: &str) -> Layer {
    Layer {
        id: Some(id.to_string()),
        ..Layer::default()
    }
}

fn poster() -> Canvas<EgSurface<Capture>> {
    let mut surface = EgSurface::new(Capture::new(64, 64));
    surface
        .register_image("avatar.png", RgbBitmap::solid(2, 2, RED).unwrap())
        .unwrap();
    let mut canvas = Canvas::new(CanvasConfig::default(), surface).unwrap();
    canvas
        .create_artboard(Layer {
            width: Some(64.0),
            height: Some(64.0),
            ..layer("#board")
        })
        .unwrap()
        .draw_circle_image(Layer {
            path: Some("avatar.png".to_string()),
            top: Some(4.0),
            left: Some(4.0),
            d: Some(20.0),
            ..layer("#avatar")
        })
        .unwrap()
        .draw_image(Layer {
            path: Some("missing.png".to_string()),
            top: Some(4.0),
            left: Some(40.0),
            width: Some(20.0),
            height: Some(20.0),
            ..layer("#cover")
        })
        .unwrap()
        .draw_wrap_text(Layer {
            text: Some("hello world".to_string()),
            left: Some(4.0),
            width: Some(40.0),
            refer_layer: Some(ReferLayer {
                id: "#avatar".to_string(),
                top: Some(2.0),
                left: None,
            }),
            ..layer("#name")
        })
        .unwrap();
    canvas
}

#[test]
fn poster_renders_board_avatar_and_fallback() {
    let canvas = poster();
    let display = canvas.surface().display();

    assert_eq!(display.at(10, 60), Some(BOARD));
    assert_eq!(display.at(14, 14), Some(RED));
    assert_eq!(display.at(4, 4), Some(BOARD));

    let outline = canvas.surface().config().outline_color;
    assert_eq!(display.at(40, 4), Some(outline));
    assert_eq!(display.at(50, 20), Some(BOARD));
    assert_eq!(canvas.surface().diagnostics().image_fallback_draws, 1);
    assert_eq!(canvas.surface().diagnostics().color_fallbacks, 0);

    assert!(display.pixels.iter().any(|(_, color)| *color == INK));
}

#[test]
fn wrap_uses_glyph_metrics_of_the_surface() {
    let mut canvas = poster();
    canvas.present(|| {}).unwrap();

    // 6px glyphs in a 40px box: "hello " then "world".
    let name = canvas.registry().get("#name").unwrap();
    assert_eq!(name.top, Some(26.0));
    assert_eq!(name.width, Some(30.0));
    assert_eq!(name.height, Some(25.0));
    assert_eq!(canvas.auto_height(), Some(51.0));
    assert_eq!(canvas.surface().present_count(), 1);
}

#[test]
fn mono_measurer_matches_surface_for_recorded_layouts() {
    let mut recorded = Canvas::new(
        CanvasConfig::default(),
        RecordingSurface::with_measurer(MonoMeasurer),
    )
    .unwrap();
    recorded
        .draw_wrap_text(Layer {
            text: Some("hello world".to_string()),
            width: Some(40.0),
            ..layer("#name")
        })
        .unwrap();
    recorded.present(|| {}).unwrap();

    let lines: Vec<&str> = recorded
        .surface()
        .frame()
        .text_commands()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(lines, vec!["hello ", "world"]);

    let live = EgSurface::new(Capture::new(1, 1));
    let font = &recorded.surface().frame().text_commands().next().unwrap().font;
    assert_eq!(
        live.measure_text_px("hello ", font),
        MonoMeasurer.measure_text_px("hello ", font)
    );
}
