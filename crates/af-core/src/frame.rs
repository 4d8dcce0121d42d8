use std::fmt::{self, Write as _};

use crate::error::CoreError;

/// Buffer de pixels RGBA, row-major, origine en haut à gauche.
///
/// Produit une fois (décodage, seek ou resize), puis uniquement lu.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer transparent (tout à zéro) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes, checking that their length matches the dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::ResourceUnavailable`] on a length mismatch.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();
    /// assert_eq!(fb.pixel(0, 0), (255, 0, 0, 255));
    /// assert!(FrameBuffer::from_rgba(2, 2, vec![0; 3]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let fb = Self {
            data,
            width,
            height,
        };
        fb.check_readable()?;
        Ok(fb)
    }

    /// Remplit le buffer d'une couleur unie. Pratique pour les tests et les fonds.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, (0, 0, 0, 255));
    /// assert_eq!(fb.pixel(1, 1), (0, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: (u8, u8, u8, u8)) -> Self {
        let (r, g, b, a) = rgba;
        let data = [r, g, b, a].repeat(width as usize * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Vérifie que le buffer est lisible : dimensions non nulles, taille cohérente.
    ///
    /// # Errors
    /// Returns [`CoreError::ResourceUnavailable`] otherwise.
    pub fn check_readable(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::ResourceUnavailable(format!(
                "buffer vide ({}×{})",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected {
            return Err(CoreError::ResourceUnavailable(format!(
                "buffer {}×{} illisible : {} bytes, {expected} attendus",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }
}

/// Grille de caractères produite par une conversion.
///
/// `Display` sérialise les lignes séparées par `\n`, sans saut final.
///
/// # Example
/// ```
/// use af_core::frame::AsciiGrid;
/// let mut grid = AsciiGrid::new(2, 2);
/// grid.set(0, 0, '@');
/// grid.set(1, 0, '@');
/// assert_eq!(grid.to_string(), "@@\n  ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of glyphs, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie d'espaces.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set the glyph at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Get the glyph at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Itère sur les lignes de la grille.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

impl fmt::Display for AsciiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &ch in row {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// Séquence ordonnée de grilles sérialisées ; l'index `i` correspond à `i / fps`.
pub type FrameSequence = Vec<String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_rejects_mismatch() {
        let err = FrameBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, CoreError::ResourceUnavailable(_)));
    }

    #[test]
    fn empty_buffer_is_unreadable() {
        let fb = FrameBuffer::new(0, 5);
        assert!(matches!(
            fb.check_readable(),
            Err(CoreError::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn filled_sets_every_pixel() {
        let fb = FrameBuffer::filled(3, 2, (1, 2, 3, 4));
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(fb.pixel(x, y), (1, 2, 3, 4));
            }
        }
    }

    #[test]
    fn grid_display_has_no_trailing_newline() {
        let mut grid = AsciiGrid::new(3, 2);
        for x in 0..3 {
            grid.set(x, 1, '#');
        }
        let text = grid.to_string();
        assert_eq!(text, "   \n###");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn zero_height_grid_is_empty_string() {
        assert_eq!(AsciiGrid::new(4, 0).to_string(), "");
    }
}
