/// Largest face edge the resolver will produce.
pub const MAX_FACE_DIMENSION: u32 = 16384;

/// Face dimensions picked for all six render targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FaceSize {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for FaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Largest power of two `<= target`, scanning down from [`MAX_FACE_DIMENSION`]. Never below 1.
pub fn fit_power_of_two(target: u32) -> u32 {
    let mut x = MAX_FACE_DIMENSION;
    while x > 1 {
        if x <= target {
            break;
        }
        x >>= 1;
    }
    x
}

/// Power-of-two secondary edge whose ratio against `dominant` lands closest to `aspect`.
///
/// `ratio` maps a candidate onto the aspect it would produce. Candidates are scanned from
/// the ceiling down, so equal scores keep the larger edge.
fn best_secondary(aspect: f32, ratio: impl Fn(u32) -> f32) -> u32 {
    let mut best = MAX_FACE_DIMENSION;
    let mut best_score = f32::MAX;
    let mut candidate = MAX_FACE_DIMENSION;
    loop {
        let score = (ratio(candidate) - aspect).abs();
        if score < best_score {
            best_score = score;
            best = candidate;
        }
        if candidate == 1 {
            break;
        }
        candidate >>= 1;
    }
    best
}

/// Snap the dominant axis to a power of two, then fit the other axis to keep `width / height`.
pub fn fit_power_of_two_aspect(width: u32, height: u32) -> FaceSize {
    let width = width.max(1);
    let height = height.max(1);
    let aspect = width as f32 / height as f32;

    if width > height {
        let x = fit_power_of_two(width);
        let y = best_secondary(aspect, |y| x as f32 / y as f32);
        FaceSize {
            width: x,
            height: y,
        }
    } else {
        let y = fit_power_of_two(height);
        let x = best_secondary(aspect, |x| x as f32 / y as f32);
        FaceSize {
            width: x,
            height: y,
        }
    }
}

/// Pick the face size from explicit overrides or, when both are zero, from the bounding
/// box of the normalized inputs.
///
/// A single override is copied to the missing axis; two overrides bypass the power-of-two
/// search entirely. One input image always yields a square face.
pub fn resolve_face_size(
    width: u32,
    height: u32,
    bounds: (u32, u32),
    image_count: usize,
) -> FaceSize {
    match (width, height) {
        (0, 0) => {
            let (bw, bh) = bounds;
            if image_count == 1 {
                let edge = fit_power_of_two(bw.max(bh));
                FaceSize {
                    width: edge,
                    height: edge,
                }
            } else {
                fit_power_of_two_aspect(bw, bh)
            }
        }
        (0, h) => FaceSize {
            width: h,
            height: h,
        },
        (w, 0) => FaceSize {
            width: w,
            height: w,
        },
        (w, h) => FaceSize {
            width: w,
            height: h,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sizing/resolver.rs"]
mod tests;
