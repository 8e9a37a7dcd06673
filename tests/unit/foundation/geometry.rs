use super::*;

#[test]
fn card_geometry_is_valid_and_scales_to_output() {
    let g = GeometrySpec::CARD;
    g.validate().unwrap();
    assert_eq!(
        g.output_canvas(),
        Canvas {
            width: 1188,
            height: 1680
        }
    );
    assert_eq!(g.barcode_pixel_size(), 320);
    assert_eq!(g.barcode_rect_output(), Rect::new(434.0, 1036.0, 754.0, 1356.0));
    assert_eq!(g.barcode_rect_logical(), Rect::new(217.0, 518.0, 377.0, 678.0));
}

#[test]
fn barcode_box_outside_canvas_is_rejected() {
    let g = GeometrySpec {
        barcode_x: 500,
        ..GeometrySpec::CARD
    };
    let err = g.validate().unwrap_err();
    assert!(err.to_string().contains("within the logical canvas"));
}

#[test]
fn zero_scale_and_oversized_output_are_rejected() {
    assert!(
        GeometrySpec {
            scale: 0,
            ..GeometrySpec::CARD
        }
        .validate()
        .is_err()
    );
    assert!(
        GeometrySpec {
            scale: 100,
            ..GeometrySpec::CARD
        }
        .validate()
        .is_err()
    );
}
