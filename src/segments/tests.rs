use super::*;
use crate::image::GrayImageU8;
use imageproc::drawing::draw_line_segment_mut;

fn vertical_line(map: &mut GrayImageU8, x: usize, ys: std::ops::RangeInclusive<usize>) {
    for y in ys {
        map.set(x, y, 255);
    }
}

fn endpoints(seg: &LineSegment) -> Vec<[i32; 2]> {
    let mut pts = vec![seg.p0, seg.p1];
    pts.sort();
    pts
}

#[test]
fn empty_map_has_no_segments() {
    let map = GrayImageU8::new(64, 48);
    let out = detect_segments(&map, &HoughOptions::default());
    assert!(out.segments.is_empty());
    assert_eq!(out.edge_pixels, 0);
}

#[test]
fn finds_vertical_line_with_exact_endpoints() {
    let mut map = GrayImageU8::new(200, 200);
    vertical_line(&mut map, 50, 20..=170);
    let out = detect_segments(&map, &HoughOptions::default());
    assert_eq!(out.edge_pixels, 151);
    assert_eq!(out.segments.len(), 1, "{:?}", out.segments);
    assert_eq!(endpoints(&out.segments[0]), vec![[50, 20], [50, 170]]);
}

#[test]
fn bridges_gaps_up_to_max_line_gap() {
    let mut map = GrayImageU8::new(200, 200);
    vertical_line(&mut map, 80, 20..=59);
    vertical_line(&mut map, 80, 70..=109);
    vertical_line(&mut map, 80, 120..=170);
    let out = detect_segments(&map, &HoughOptions::default());
    assert_eq!(out.segments.len(), 1, "{:?}", out.segments);
    assert_eq!(endpoints(&out.segments[0]), vec![[80, 20], [80, 170]]);
}

#[test]
fn rejects_lines_shorter_than_min_length() {
    let mut map = GrayImageU8::new(100, 100);
    vertical_line(&mut map, 40, 10..=45);
    let out = detect_segments(&map, &HoughOptions::default());
    assert!(out.segments.is_empty(), "{:?}", out.segments);
}

#[test]
fn finds_thick_diagonal_line() {
    let mut canvas = image::GrayImage::new(320, 240);
    for offset in -1..=1 {
        let o = offset as f32;
        draw_line_segment_mut(
            &mut canvas,
            (60.0 + o, 220.0),
            (200.0 + o, 60.0),
            image::Luma([255u8]),
        );
    }
    let map = GrayImageU8::from_image(canvas);
    let out = detect_segments(&map, &HoughOptions::default());
    assert!(!out.segments.is_empty());
    let longest = out
        .segments
        .iter()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
        .unwrap();
    assert!(longest.length() > 100.0, "{longest:?}");
    let slope = longest.dy() as f64 / longest.dx() as f64;
    assert!((slope - (-160.0 / 140.0)).abs() < 0.15, "slope {slope}");
}

#[test]
fn same_seed_gives_same_segments() {
    let mut canvas = image::GrayImage::new(320, 240);
    draw_line_segment_mut(&mut canvas, (30.0, 230.0), (150.0, 90.0), image::Luma([255u8]));
    draw_line_segment_mut(&mut canvas, (290.0, 230.0), (170.0, 90.0), image::Luma([255u8]));
    draw_line_segment_mut(&mut canvas, (10.0, 40.0), (300.0, 60.0), image::Luma([255u8]));
    let map = GrayImageU8::from_image(canvas);
    let options = HoughOptions::default();
    let a = detect_segments(&map, &options);
    let b = detect_segments(&map, &options);
    assert_eq!(a.segments, b.segments);
    assert!(!a.segments.is_empty());
}

#[test]
fn max_lines_caps_the_output() {
    let mut map = GrayImageU8::new(200, 200);
    vertical_line(&mut map, 50, 20..=170);
    vertical_line(&mut map, 150, 20..=170);
    let all = detect_segments(&map, &HoughOptions::default());
    assert_eq!(all.segments.len(), 2);
    let capped = detect_segments(
        &map,
        &HoughOptions {
            max_lines: Some(1),
            ..HoughOptions::default()
        },
    );
    assert_eq!(capped.segments.len(), 1);
}

#[test]
fn validation_rejects_degenerate_resolution() {
    assert!(HoughOptions::default().validate().is_ok());
    let bad_rho = HoughOptions {
        rho: 0.0,
        ..HoughOptions::default()
    };
    assert!(bad_rho.validate().is_err());
    let bad_threshold = HoughOptions {
        threshold: 0,
        ..HoughOptions::default()
    };
    assert!(bad_threshold.validate().is_err());
}

#[test]
fn segment_helpers() {
    let seg = LineSegment::from([0, 0, 3, 4]);
    assert_eq!(seg.length(), 5.0);
    assert!(!seg.is_vertical());
    assert!(LineSegment::new([2, 1], [2, 9]).is_vertical());
}
