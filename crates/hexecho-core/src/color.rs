#![forbid(unsafe_code)]

//! Colors and the cycle palette.

/// An opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Rest color of a cell no cycle is driving.
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `intensity / 255`.
    #[must_use]
    pub fn scaled(self, intensity: u8) -> Self {
        let k = u16::from(intensity);
        let ch = |v: u8| ((u16::from(v) * k + 127) / 255) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Subtract `amount` from every channel, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// RGB plus alpha, used for selection highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Highlight for a cell with exactly two in-selection neighbors.
pub const HIGHLIGHT_EXACT: Rgba = Rgba::new(255, 255, 0, 100);
/// Highlight for a cell with fewer than two in-selection neighbors.
pub const HIGHLIGHT_UNDER: Rgba = Rgba::new(255, 165, 0, 100);
/// Highlight for a cell with more than two in-selection neighbors.
pub const HIGHLIGHT_OVER: Rgba = Rgba::new(255, 0, 0, 100);

/// Default cycle colors, rotated per cell.
pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb::new(64, 224, 208),  // turquoise
    Rgb::new(92, 182, 224),  // sky blue
    Rgb::new(130, 150, 227), // periwinkle
    Rgb::new(155, 127, 216), // soft purple
];

/// Index into a [`Palette`].
pub type PaletteSlot = u8;

/// Fixed rotation of cycle colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette. Returns `None` when `colors` is empty or has more
    /// entries than a [`PaletteSlot`] can address.
    #[must_use]
    pub fn new(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() || colors.len() > usize::from(PaletteSlot::MAX) + 1 {
            return None;
        }
        Some(Self { colors })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `slot`, wrapping.
    #[must_use]
    pub fn color(&self, slot: PaletteSlot) -> Rgb {
        self.colors[usize::from(slot) % self.colors.len()]
    }

    /// Slot following `current`; `None` starts the rotation at slot 0.
    #[must_use]
    pub fn next_slot(&self, current: Option<PaletteSlot>) -> PaletteSlot {
        match current {
            None => 0,
            Some(slot) => ((usize::from(slot) + 1) % self.colors.len()) as PaletteSlot,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}
