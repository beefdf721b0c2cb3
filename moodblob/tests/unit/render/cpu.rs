use super::*;
use crate::blob::config::BlobConfig;
use kurbo::Shape;

fn disc(center: Point, r: f64) -> BezPath {
    kurbo::Circle::new(center, r).to_path(0.1)
}

fn red() -> ColorPalette {
    ColorPalette::from_hex(&["#FF0000"]).unwrap()
}

#[test]
fn empty_layer_list_renders_background() {
    let canvas = Canvas::new(8, 6).unwrap();
    let mut c = Compositor::new(canvas)
        .unwrap()
        .with_background(Color::rgba(0.0, 0.0, 1.0, 1.0));
    let frame = c.render(&[], 30.0).unwrap();
    assert_eq!(frame.data.len(), canvas.byte_len());
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
}

#[test]
fn single_layer_is_bright_at_center_and_empty_outside() {
    let canvas = Canvas::new(64, 64).unwrap();
    let mut c = Compositor::new(canvas).unwrap();
    let path = disc(Point::new(32.0, 32.0), 20.0);
    let palette = red();
    let layer = LayerPaint {
        path: &path,
        center: Point::new(32.0, 32.0),
        radius: 20.0,
        palette: &palette,
        opacity: 1.0,
    };
    let frame = c.render(&[layer], 0.0).unwrap();

    let center = frame.pixel(32, 32).unwrap();
    assert!(center[0] > 200 && center[3] > 200);
    assert_eq!(center[1], 0);
    assert_eq!(frame.pixel(1, 1).unwrap(), [0, 0, 0, 0]);
    assert!(frame.pixel(64, 0).is_none());
}

#[test]
fn overlapping_layers_brighten() {
    let canvas = Canvas::new(48, 48).unwrap();
    let path = disc(Point::new(24.0, 24.0), 16.0);
    let palette = ColorPalette::from_hex(&["#404040"]).unwrap();
    let layer = LayerPaint {
        path: &path,
        center: Point::new(24.0, 24.0),
        radius: 16.0,
        palette: &palette,
        opacity: 1.0,
    };
    let mut c = Compositor::new(canvas).unwrap();
    let one = c.render(&[layer], 0.0).unwrap().pixel(24, 24).unwrap();
    let two = c.render(&[layer, layer], 0.0).unwrap().pixel(24, 24).unwrap();
    assert!(two[0] > one[0]);
}

#[test]
fn edge_softness_spreads_coverage() {
    let canvas = Canvas::new(64, 64).unwrap();
    let path = disc(Point::new(32.0, 32.0), 12.0);
    let palette = red();
    let layer = LayerPaint {
        path: &path,
        center: Point::new(32.0, 32.0),
        radius: 12.0,
        palette: &palette,
        opacity: 1.0,
    };
    let mut c = Compositor::new(canvas).unwrap();
    let hard = c.render(&[layer], 0.0).unwrap();
    let soft = c.render(&[layer], 20.0).unwrap();
    let lit = |f: &FrameRGBA| f.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(lit(&soft) > lit(&hard));
}

#[test]
fn renders_a_blob_state() {
    let canvas = Canvas::new(160, 160).unwrap();
    let cfg = BlobConfig {
        layers: 2,
        orbit_radius: 6.0,
        ..BlobConfig::default()
    };
    let state = BlobState::new(&cfg, canvas).unwrap();
    let mut c = Compositor::new(canvas).unwrap();
    let frame = c.render_state(&state).unwrap();
    assert_eq!((frame.width, frame.height), (160, 160));
    assert!(frame.pixel(80, 80).unwrap()[3] > 0);
    assert_eq!(frame.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn gradient_fades_out_at_base_radius_even_when_pulsed() {
    let canvas = Canvas::new(300, 300).unwrap();
    let cfg = BlobConfig {
        radius: 40.0,
        min_radius: Some(32.0),
        max_radius: Some(64.0),
        noise_strength: 0.0,
        edge_noise_strength: 0.0,
        pulse_strength: 0.0,
        edge_softness: 0.0,
        ..BlobConfig::default()
    };
    let mut state = BlobState::new(&cfg, canvas).unwrap();
    state.update(Some(crate::audio::modulator::Modulation {
        pulse_strength: 0.0,
        level: 1.0,
        beat: true,
    }));
    assert_eq!(state.radius(), 64.0);

    let mut c = Compositor::new(canvas).unwrap();
    let frame = c.render_state(&state).unwrap();
    // 50.5px out: inside the 60px gradient.
    assert!(frame.pixel(200, 150).unwrap()[3] > 0);
    // 61.5px out: inside the pulsed outline but past 1.5x the base radius.
    assert_eq!(frame.pixel(211, 150).unwrap()[3], 0);
}
