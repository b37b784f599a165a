//! Per-line properties tracked across an input paragraph.

use bitflags::bitflags;

bitflags! {
    /// Boolean properties of a line within an input paragraph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineFlags: u8 {
        /// The body region is a single repeated character.
        const BODILESS = 1;
        /// Synthesized by the quote feature and hidden on output.
        const INVIS = 2;
        /// First line of a paragraph.
        const FIRST = 4;
        /// A vacant line that a gap can spare.
        const SUPERF = 8;
    }
}

/// Properties of one line, parallel to the paragraph's line array.
///
/// `p` and `s` hold the prefix and suffix length of a bodiless line,
/// or the fallback prefix and suffix length of the paragraph that
/// contains a line with a body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineProp {
    pub p: usize,
    pub s: usize,
    pub flags: LineFlags,
    /// The repeated character of a bodiless line.
    pub rc: u8,
}

impl LineProp {
    #[must_use]
    pub fn is_bodiless(&self) -> bool {
        self.flags.contains(LineFlags::BODILESS)
    }

    #[must_use]
    pub fn is_invis(&self) -> bool {
        self.flags.contains(LineFlags::INVIS)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.flags.contains(LineFlags::FIRST)
    }

    #[must_use]
    pub fn is_superf(&self) -> bool {
        self.flags.contains(LineFlags::SUPERF)
    }

    /// A bodiless line whose repeated character is a space.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.is_bodiless() && self.rc == b' '
    }
}

/// Whitespace per the C locale: space, tab, newline, vertical tab,
/// form feed, carriage return.
#[must_use]
pub fn is_white(b: u8) -> bool {
    b == b' ' || (0x09..=0x0d).contains(&b)
}
