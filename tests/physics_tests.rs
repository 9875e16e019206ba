use fittsforge::geometry::KeyboardGeometry;
use fittsforge::layouts::KnownLayout;
use fittsforge::scorer::physics::{fitts_time, MovementMatrix};
use rstest::rstest;

fn qwerty_matrix_time(from: char, to: char, width: f64, a: f64, b: f64) -> f64 {
    let layout = KnownLayout::Qwerty
        .to_layout(&KeyboardGeometry::standard())
        .unwrap();
    let m = MovementMatrix::build(&layout, width, a, b);
    m.time(from, to).unwrap()
}

// --- STANDARD BLOCK DISTANCES ---
#[rstest]
#[case('q', 'w', 1.0)] // same row neighbours
#[case('f', 'j', 3.0)] // home row, three keys apart
#[case('q', 'a', 1.0625f64.sqrt())] // 0.25 stagger, one row down
#[case('a', 'z', 1.25f64.sqrt())] // 0.5 stagger
#[case('e', 'e', 0.0)]
fn test_qwerty_movement(#[case] from: char, #[case] to: char, #[case] distance: f64) {
    let t = qwerty_matrix_time(from, to, 1.0, 0.0, 1.0);
    let expected = (distance + 1.0).log2();
    assert!(
        (t - expected).abs() < 1e-12,
        "{} -> {}: got {}, expected {}",
        from,
        to,
        t,
        expected
    );
}

#[rstest]
#[case(0.5)]
#[case(1.0)]
#[case(2.0)]
fn test_wider_keys_are_faster(#[case] width: f64) {
    let narrow = fitts_time(4.0, width, 0.0, 1.0);
    let wide = fitts_time(4.0, width * 2.0, 0.0, 1.0);
    assert!(wide < narrow);
}

#[test]
fn test_intercept_and_slope_are_affine() {
    let base = qwerty_matrix_time('q', 'p', 1.0, 0.0, 1.0);
    let scaled = qwerty_matrix_time('q', 'p', 1.0, 0.2, 3.0);
    assert!((scaled - (0.2 + 3.0 * base)).abs() < 1e-12);
}
