use super::*;

fn stroke(points: &[(f64, f64)]) -> Stroke {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn single_point_is_insufficient() {
    let err = derive(&stroke(&[(0.0, 0.0)])).unwrap_err();
    assert!(matches!(err, OverlayError::InsufficientPoints(_)));
}

#[test]
fn two_points_contain_their_centroid() {
    let region = derive(&stroke(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
    assert_eq!(
        region,
        ContainmentRegion::Circle {
            center: Point::new(5.0, 0.0),
            radius: 5.0
        }
    );
    assert!(region.contains(Point::new(5.0, 0.0)));
    assert!(region.contains(Point::new(10.0, 0.0)));
}

#[test]
fn square_path_derives_circle_near_its_middle() {
    let region = derive(&stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])).unwrap();
    let ContainmentRegion::Circle { center, radius } = region.clone() else {
        panic!("expected circle");
    };
    // Smoothed path: (0,0), (20/3,10/3), (20/3,20/3), (0,10).
    assert!((center - Point::new(10.0 / 3.0, 5.0)).hypot() < 1e-9, "{center:?}");
    let expected = (100.0_f64 / 9.0 + 25.0).sqrt();
    assert!((radius - expected).abs() < 1e-9, "{radius}");
    assert!(radius >= 5.0);
    // The bounding circle is taken over the smoothed points, so raw corners may fall outside.
    assert!(!contains(Some(&region), Point::new(10.0, 0.0)));
    assert!(contains(Some(&region), Point::new(5.0, 5.0)));
    assert!(!contains(Some(&region), Point::new(1000.0, 1000.0)));
}

#[test]
fn none_region_contains_everything() {
    assert!(contains(None, Point::new(-1e9, 1e9)));
    assert!(contains(None, Point::new(0.0, 0.0)));
}

#[test]
fn circle_boundary_is_inside() {
    let region = ContainmentRegion::Circle {
        center: Point::new(0.0, 0.0),
        radius: 3.0,
    };
    assert!(region.contains(Point::new(3.0, 0.0)));
    assert!(!region.contains(Point::new(3.0, 0.1)));
}

#[test]
fn smoothing_is_single_pass_and_keeps_endpoints() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(3.0, 3.0),
        Point::new(6.0, 0.0),
        Point::new(9.0, 3.0),
    ];
    let s = smooth(&pts);
    assert_eq!(s.len(), 4);
    assert_eq!(s[0], pts[0]);
    assert_eq!(s[3], pts[3]);
    assert_eq!(s[1], Point::new(3.0, 1.0));
    assert_eq!(s[2], Point::new(6.0, 2.0));
}

#[test]
fn polygon_kind_follows_stroke_shape() {
    let s = stroke(&[
        (0.0, 0.0),
        (100.0, 0.0),
        (100.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ]);
    let region = derive_with(&s, RegionKind::Polygon).unwrap();
    assert!(region.contains(Point::new(50.0, 5.0)));
    assert!(!region.contains(Point::new(50.0, 50.0)));
}

#[test]
fn polygon_needs_three_points() {
    let s = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
    assert!(matches!(
        derive_with(&s, RegionKind::Polygon),
        Err(OverlayError::InsufficientPoints(_))
    ));
}

#[test]
fn region_json_is_tagged_by_shape() {
    let json = serde_json::to_value(ContainmentRegion::Circle {
        center: Point::new(1.0, 2.0),
        radius: 3.0,
    })
    .unwrap();
    assert_eq!(json["shape"], "circle");
    assert_eq!(json["radius"], 3.0);
}
