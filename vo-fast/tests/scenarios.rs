use vo_fast::{
    detect, DetectorBuilder, DetectorConfig, FastError, FastVariant, GrayscaleConverter,
    GrayscaleImage, KeypointOrder, PixelBuffer, Polarity,
};

fn block_frame(size: usize, lo: usize, hi: usize) -> Vec<u8> {
    GrayscaleImage::from_fn(size, size, |x, y| {
        if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
            200
        } else {
            10
        }
    })
    .into_raw()
}

fn dots_frame(size: usize, dots: &[(usize, usize, u8)]) -> Vec<u8> {
    let mut data = vec![10u8; size * size];
    for &(x, y, v) in dots {
        data[y * size + x] = v;
    }
    data
}

#[test]
fn pure_red_pixel_luminance() {
    let red = [255u8, 0, 0];
    let gray = GrayscaleConverter::convert(&PixelBuffer::new(1, 1, 3, &red)).unwrap();
    assert_eq!(gray.as_raw(), &[76]);
}

#[test]
fn small_bright_block_is_a_corner_region() {
    let data = block_frame(9, 3, 5);
    let cfg = DetectorConfig::new();
    let pipeline = DetectorBuilder::from_config(cfg.clone()).build().unwrap();
    let img = GrayscaleImage::from_raw(9, 9, data.clone()).unwrap();

    // The dark background covers a long enough arc around every block pixel.
    let map = pipeline.response_map(&img);
    assert_eq!(map.candidate_count(), 9);
    for (x, y, r) in map.candidates() {
        assert!((3..=5).contains(&x) && (3..=5).contains(&y));
        assert_eq!(r.polarity, Polarity::Darker);
        assert_eq!(r.response, 190.0);
    }
    // The block is narrower than the circle, so even its centre sees only background.
    assert_eq!(map.get(4, 4).map(|r| r.polarity), Some(Polarity::Darker));

    let keypoints = detect(&PixelBuffer::new(9, 9, 1, &data), &cfg).unwrap();
    assert_eq!(keypoints.len(), 1);
    assert_eq!((keypoints[0].x, keypoints[0].y), (3, 3));
}

#[test]
fn large_block_yields_corners_not_edges() {
    let data = block_frame(21, 6, 14);
    let keypoints = detect(&PixelBuffer::new(21, 21, 1, &data), &DetectorConfig::new()).unwrap();

    let coords: Vec<_> = keypoints.iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(coords, vec![(6, 6), (12, 6), (6, 12), (14, 12)]);
    for kp in &keypoints {
        // Every survivor sits next to one of the four block corners.
        let near = [(6, 6), (14, 6), (6, 14), (14, 14)]
            .iter()
            .any(|&(cx, cy): &(usize, usize)| kp.x.abs_diff(cx) <= 2 && kp.y.abs_diff(cy) <= 2);
        assert!(near, "({}, {})", kp.x, kp.y);
    }
}

#[test]
fn threshold_above_contrast_finds_nothing() {
    let data = block_frame(9, 3, 5);
    let buf = PixelBuffer::new(9, 9, 1, &data);
    let at_contrast = DetectorBuilder::new().threshold(190).build().unwrap();
    let above = DetectorBuilder::new().threshold(191).build().unwrap();
    assert_eq!(at_contrast.detect(&buf).unwrap().len(), 1);
    assert!(above.detect(&buf).unwrap().is_empty());
}

#[test]
fn flat_frame_has_no_keypoints() {
    for (w, h) in [(7, 7), (32, 24), (100, 3)] {
        let data = vec![128u8; w * h];
        for threshold in [1, 20, 255] {
            let cfg = DetectorBuilder::new().threshold(threshold).to_config();
            assert!(detect(&PixelBuffer::new(w, h, 1, &data), &cfg).unwrap().is_empty());
        }
    }
}

#[test]
fn smaller_window_keeps_both_nearby_corners() {
    // Two isolated bright dots, diagonal neighbours.
    let data = dots_frame(15, &[(7, 7, 200), (8, 8, 150)]);
    let buf = PixelBuffer::new(15, 15, 1, &data);

    let wide = DetectorBuilder::new().suppression_window(3).build().unwrap();
    let kept = wide.detect(&buf).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!((kept[0].x, kept[0].y, kept[0].response), (7, 7, 190.0));

    let narrow = DetectorBuilder::new().suppression_window(1).build().unwrap();
    let kept = narrow.detect(&buf).unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!((kept[1].x, kept[1].y, kept[1].response), (8, 8, 140.0));
}

#[test]
fn window_five_reaches_two_columns() {
    let data = dots_frame(15, &[(6, 7, 200), (8, 7, 200)]);
    let buf = PixelBuffer::new(15, 15, 1, &data);
    let three = DetectorBuilder::new().build().unwrap().detect(&buf).unwrap();
    let five = DetectorBuilder::new().suppression_window(5).build().unwrap().detect(&buf).unwrap();
    assert_eq!(three.len(), 2);
    assert_eq!(five.len(), 1);
    assert_eq!((five[0].x, five[0].y), (6, 7));
}

#[test]
fn invalid_frames_are_rejected() {
    let cfg = DetectorConfig::new();
    let data = vec![0u8; 64];

    let err = detect(&PixelBuffer::new(8, 0, 1, &data), &cfg).unwrap_err();
    assert!(matches!(err, FastError::InvalidImage { .. }));

    let err = detect(&PixelBuffer::new(8, 8, 1, &[]), &cfg).unwrap_err();
    assert!(matches!(err, FastError::InvalidImage { .. }));

    let err = detect(&PixelBuffer::new(8, 8, 3, &data), &cfg).unwrap_err();
    assert!(matches!(err, FastError::InvalidImage { .. }));

    let err = detect(&PixelBuffer::new(4, 4, 2, &data[..32]), &cfg).unwrap_err();
    assert_eq!(err, FastError::UnsupportedChannelLayout { channels: 2 });
}

#[test]
fn invalid_configuration_is_rejected_before_detection() {
    let data = vec![0u8; 64];
    let mut cfg = DetectorConfig::new();
    cfg.core.suppression_window = 4;
    let err = detect(&PixelBuffer::new(8, 8, 1, &data), &cfg).unwrap_err();
    assert_eq!(err, FastError::InvalidSuppressionWindow(4));
}

#[test]
fn fast12_is_stricter_than_fast9() {
    let data = block_frame(21, 6, 14);
    let img = GrayscaleImage::from_raw(21, 21, data).unwrap();
    let fast9 = DetectorBuilder::new().build().unwrap();
    let fast12 = DetectorBuilder::new().fast_variant(FastVariant::Fast12).build().unwrap();
    let n9 = fast9.response_map(&img).candidate_count();
    let n12 = fast12.response_map(&img).candidate_count();
    assert!(n12 < n9, "{n12} >= {n9}");
}

#[test]
fn ranked_and_capped_output() {
    let data = dots_frame(
        40,
        &[(8, 8, 60), (20, 8, 250), (30, 8, 120), (8, 25, 250), (25, 25, 180)],
    );
    let buf = PixelBuffer::new(40, 40, 1, &data);

    let ranked = DetectorBuilder::new().ranked().build().unwrap().detect(&buf).unwrap();
    let responses: Vec<_> = ranked.iter().map(|c| c.response).collect();
    assert_eq!(responses, vec![240.0, 240.0, 170.0, 110.0, 50.0]);
    // Equal responses stay in scan order.
    assert_eq!((ranked[0].x, ranked[0].y), (20, 8));
    assert_eq!((ranked[1].x, ranked[1].y), (8, 25));

    let capped = DetectorBuilder::new().max_keypoints(3).to_config();
    assert_eq!(capped.order, KeypointOrder::ScanOrder);
    let kept = detect(&buf, &capped).unwrap();
    let coords: Vec<_> = kept.iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(coords, vec![(20, 8), (8, 25), (25, 25)]);
}
