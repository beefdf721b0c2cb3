use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_dimensions() {
    assert!(Canvas::new(0, 10).unwrap_err().is_config());
    assert!(Canvas::new(10, 0).unwrap_err().is_config());
    assert!(Canvas::new(70_000, 10).unwrap_err().is_config());
    let c = Canvas::new(400, 300).unwrap();
    assert_eq!(c.center(), Point::new(200.0, 150.0));
    assert_eq!(c.byte_len(), 400 * 300 * 4);
}

#[test]
fn transparent_is_all_zero() {
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
