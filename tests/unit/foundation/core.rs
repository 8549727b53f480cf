use super::*;

#[test]
fn canvas_closed_bounds_include_edges() {
    let c = Canvas::new(10, 20);
    assert!(c.contains_closed(Point::new(0.0, 0.0)));
    assert!(c.contains_closed(Point::new(10.0, 20.0)));
    assert!(!c.contains_closed(Point::new(10.1, 5.0)));
    assert!(!c.contains_closed(Point::new(5.0, -0.1)));
    assert_eq!(c.rgba_len(), 800);
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_pixels() {
    let f = FrameRGBA::from_straight_rgba8(1, 1, vec![10, 20, 30, 255]).unwrap();
    assert_eq!(f.data, vec![10, 20, 30, 255]);
    assert_eq!(f.to_straight_rgba8(), vec![10, 20, 30, 255]);
}

#[test]
fn premultiply_half_alpha_halves_color() {
    let f = FrameRGBA::from_straight_rgba8(1, 1, vec![255, 0, 0, 128]).unwrap();
    assert_eq!(f.data, vec![128, 0, 0, 128]);
    assert_eq!(f.to_straight_rgba8(), vec![255, 0, 0, 128]);
}

#[test]
fn from_straight_rejects_wrong_length() {
    assert!(FrameRGBA::from_straight_rgba8(2, 2, vec![0; 3]).is_err());
}

#[test]
fn pixel_reads_row_major() {
    let mut f = FrameRGBA::new_transparent(Canvas::new(2, 2));
    f.data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(f.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(2, 0), None);
}

#[test]
fn rgba_scale_by_zero_is_transparent() {
    let c = Rgba8Premul::from_straight_rgba(200, 100, 50, 255);
    assert_eq!(c.scale(0), Rgba8Premul::transparent());
    assert_eq!(c.scale(255), c);
}
