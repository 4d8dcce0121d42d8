/// Poids perceptuels BT.601 (le vert domine, le bleu contribue le moins).
const WEIGHT_R: f64 = 0.299;
const WEIGHT_G: f64 = 0.587;
const WEIGHT_B: f64 = 0.114;

/// Luminance perceptuelle [0, 255] d'un pixel RGB, arrondie à l'entier le plus proche.
///
/// # Example
/// ```
/// use af_core::color::luminance;
/// assert_eq!(luminance(0, 0, 0), 0);
/// assert_eq!(luminance(255, 255, 255), 255);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    luminance_f64(f64::from(r), f64::from(g), f64::from(b))
}

/// Same weighting as [`luminance`], for fractional channels (composited pixels).
///
/// # Example
/// ```
/// use af_core::color::luminance_f64;
/// assert_eq!(luminance_f64(255.0, 255.0, 255.0), 255);
/// assert_eq!(luminance_f64(100.0, 100.0, 100.0), 100);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance_f64(r: f64, g: f64, b: f64) -> u8 {
    (WEIGHT_R * r + WEIGHT_G * g + WEIGHT_B * b)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Composite un pixel RGBA sur un fond blanc opaque.
///
/// `out = c · (a/255) + 255 · (1 − a/255)` : alpha 0 → blanc pur,
/// alpha 255 → pixel inchangé.
///
/// # Example
/// ```
/// use af_core::color::composite_over_white;
/// assert_eq!(composite_over_white(0, 0, 0, 0), (255.0, 255.0, 255.0));
/// assert_eq!(composite_over_white(10, 20, 30, 255), (10.0, 20.0, 30.0));
/// ```
#[inline(always)]
#[must_use]
pub fn composite_over_white(r: u8, g: u8, b: u8, a: u8) -> (f64, f64, f64) {
    let alpha = f64::from(a) / 255.0;
    let bg = 255.0 * (1.0 - alpha);
    (
        f64::from(r) * alpha + bg,
        f64::from(g) * alpha + bg,
        f64::from(b) * alpha + bg,
    )
}
