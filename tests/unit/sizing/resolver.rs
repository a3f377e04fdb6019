use super::*;

fn powers() -> impl Iterator<Item = u32> {
    (0..=14).map(|s| 1u32 << s)
}

fn samples() -> Vec<u32> {
    let mut v = vec![0, 1, 2, 3, 5, 7, 63, 64, 65, 300, 511, 512, 513, 700, 1000, 4097];
    v.extend([16383, 16384, 16385, 40000, u32::MAX]);
    v
}

#[test]
fn single_axis_is_largest_power_not_above_target() {
    assert_eq!(fit_power_of_two(0), 1);
    assert_eq!(fit_power_of_two(1), 1);
    assert_eq!(fit_power_of_two(700), 512);
    assert_eq!(fit_power_of_two(1024), 1024);
    assert_eq!(fit_power_of_two(100_000), MAX_FACE_DIMENSION);
    for t in samples() {
        let x = fit_power_of_two(t);
        assert!(x.is_power_of_two() && x <= MAX_FACE_DIMENSION, "{t} -> {x}");
        if t >= 1 && t <= MAX_FACE_DIMENSION {
            assert!(x <= t && x * 2 > t, "{t} -> {x}");
        }
    }
}

#[test]
fn dual_axis_never_zero_and_powers_of_two() {
    for w in samples() {
        for h in samples() {
            let s = fit_power_of_two_aspect(w, h);
            for edge in [s.width, s.height] {
                assert!(edge >= 1 && edge <= MAX_FACE_DIMENSION, "{w}x{h} -> {s}");
                assert!(edge.is_power_of_two(), "{w}x{h} -> {s}");
            }
        }
    }
}

#[test]
fn dual_axis_secondary_is_closest_aspect_with_largest_tie() {
    for w in samples() {
        for h in samples() {
            let s = fit_power_of_two_aspect(w, h);
            let (w1, h1) = (w.max(1), h.max(1));
            let aspect = w1 as f32 / h1 as f32;
            let score = |x: u32, y: u32| (x as f32 / y as f32 - aspect).abs();
            let best = score(s.width, s.height);
            for c in powers() {
                let other = if w1 > h1 {
                    score(s.width, c)
                } else {
                    score(c, s.height)
                };
                let chosen = if w1 > h1 { s.height } else { s.width };
                assert!(best <= other, "{w}x{h}: {s} worse than candidate {c}");
                if other == best {
                    assert!(chosen >= c, "{w}x{h}: tie should keep larger than {c}");
                }
            }
        }
    }
}

#[test]
fn tall_bounds_snap_height_and_fit_width() {
    let s = fit_power_of_two_aspect(300, 700);
    assert_eq!(s.height, 512);
    assert_eq!(s.width, 256);
}

#[test]
fn square_bounds_stay_square() {
    assert_eq!(
        fit_power_of_two_aspect(512, 512),
        FaceSize {
            width: 512,
            height: 512
        }
    );
}

#[test]
fn single_image_gives_square_face() {
    for (w, h) in [(300, 700), (2048, 1024), (1, 9000), (5, 3)] {
        let s = resolve_face_size(0, 0, (w, h), 1);
        assert_eq!(s.width, s.height, "{w}x{h}");
        assert_eq!(s.width, fit_power_of_two(w.max(h)));
    }
}

#[test]
fn overrides_fill_in_and_bypass() {
    assert_eq!(
        resolve_face_size(0, 128, (700, 300), 6),
        FaceSize {
            width: 128,
            height: 128
        }
    );
    assert_eq!(
        resolve_face_size(96, 0, (700, 300), 6),
        FaceSize {
            width: 96,
            height: 96
        }
    );
    assert_eq!(
        resolve_face_size(300, 700, (1, 1), 6),
        FaceSize {
            width: 300,
            height: 700
        }
    );
}

#[test]
fn six_images_use_bounding_aspect() {
    assert_eq!(resolve_face_size(0, 0, (300, 700), 6), fit_power_of_two_aspect(300, 700));
}
