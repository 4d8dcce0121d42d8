use crate::error::CoreError;

/// Rampe par défaut, du plus dense (index 0) au plus vide (espace).
pub const ASCII_CHARS: &str = "@%#*+=-:. ";

/// Rampe étendue Paul Bourke, ordonnée dense → clair.
pub const CHARSET_FULL: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Blocs Unicode, dense → clair.
pub const CHARSET_BLOCKS: &str = "█▓▒░ ";

/// Rampe prédéfinie par nom : `default`, `full`, `blocks`.
///
/// # Example
/// ```
/// use af_core::charset::{named_ramp, CHARSET_BLOCKS};
/// assert_eq!(named_ramp("Blocks"), Some(CHARSET_BLOCKS));
/// assert_eq!(named_ramp("@#. "), None);
/// ```
#[must_use]
pub fn named_ramp(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "default" | "ascii" => Some(ASCII_CHARS),
        "full" => Some(CHARSET_FULL),
        "blocks" => Some(CHARSET_BLOCKS),
        _ => None,
    }
}

/// Map a luminance value onto a ramp ordered densest → lightest.
///
/// `index = round(lum / 255 · (len − 1))`, clamped to the last index.
/// An empty ramp yields a space.
///
/// # Example
/// ```
/// use af_core::charset::glyph_for;
/// let ramp: Vec<char> = "@%#*+=-:. ".chars().collect();
/// assert_eq!(glyph_for(0, &ramp), '@');
/// assert_eq!(glyph_for(255, &ramp), ' ');
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_for(luminance: u8, ramp: &[char]) -> char {
    let Some(last) = ramp.len().checked_sub(1) else {
        return ' ';
    };
    let index = (f64::from(luminance) / 255.0 * last as f64).round() as usize;
    ramp[index.min(last)]
}

/// Lookup table mapping luminance [0..255] → character.
///
/// Pre-computed once per ramp for O(1) per-pixel cost. Immutable after
/// construction, shared by reference across conversions.
///
/// # Example
/// ```
/// use af_core::charset::LuminanceLut;
/// let lut = LuminanceLut::new("@%#*+=-:. ").unwrap();
/// assert_eq!(lut.map(0), '@');
/// assert_eq!(lut.map(255), ' ');
/// ```
#[derive(Clone)]
pub struct LuminanceLut {
    lut: [char; 256],
}

impl LuminanceLut {
    /// Build a LUT from a ramp ordered densest → lightest.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidArgument`] if the ramp is empty.
    pub fn new(ramp: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::InvalidArgument(
                "la rampe de glyphes ne peut pas être vide".into(),
            ));
        }
        Ok(Self::from_chars(&chars))
    }

    fn from_chars(chars: &[char]) -> Self {
        let mut lut = [' '; 256];
        for (lum, slot) in (0..=255u8).zip(lut.iter_mut()) {
            *slot = glyph_for(lum, chars);
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a character.
    ///
    /// # Example
    /// ```
    /// use af_core::charset::LuminanceLut;
    /// let lut = LuminanceLut::default();
    /// assert_eq!(lut.map(141), '=');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}

impl Default for LuminanceLut {
    fn default() -> Self {
        let chars: Vec<char> = ASCII_CHARS.chars().collect();
        Self::from_chars(&chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<char> {
        ASCII_CHARS.chars().collect()
    }

    #[test]
    fn glyph_for_maps_extremes() {
        assert_eq!(glyph_for(0, &ramp()), '@');
        assert_eq!(glyph_for(255, &ramp()), ' ');
    }

    #[test]
    fn glyph_for_mid_gray() {
        let ramp = ramp();
        let mid_index = ramp.len() / 2;
        let mid_lum = (255 * mid_index / (ramp.len() - 1)) as u8;
        assert_eq!(glyph_for(mid_lum, &ramp), ramp[mid_index]);
    }

    #[test]
    fn glyph_for_monotonic_and_onto() {
        let ramp = ramp();
        let mut prev_idx = 0usize;
        let mut seen = vec![false; ramp.len()];
        for lum in 0..=255u8 {
            let ch = glyph_for(lum, &ramp);
            let Some(idx) = ramp.iter().position(|&c| c == ch) else {
                panic!("glyphe hors rampe à luminance {lum}");
            };
            assert!(idx >= prev_idx, "rampe non monotone à luminance {lum}");
            prev_idx = idx;
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "rampe non couverte: {seen:?}");
    }

    #[test]
    fn single_glyph_ramp() {
        assert_eq!(glyph_for(0, &['#']), '#');
        assert_eq!(glyph_for(255, &['#']), '#');
    }

    #[test]
    fn empty_ramp_rejected() {
        assert!(matches!(
            LuminanceLut::new(""),
            Err(CoreError::InvalidArgument(_))
        ));
        assert_eq!(glyph_for(10, &[]), ' ');
    }

    #[test]
    fn lut_matches_glyph_for() {
        let lut = LuminanceLut::new(CHARSET_FULL).unwrap();
        let chars: Vec<char> = CHARSET_FULL.chars().collect();
        for lum in 0..=255u8 {
            assert_eq!(lut.map(lum), glyph_for(lum, &chars));
        }
    }

    #[test]
    fn default_lut_uses_ascii_chars() {
        let lut = LuminanceLut::default();
        assert_eq!(lut.map(0), '@');
        assert_eq!(lut.map(255), ' ');
        assert_eq!(lut.map(141), '=');
    }
}
