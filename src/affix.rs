//! Effective prefix and suffix selection for one paragraph.

use crate::{charset::CharSet, delimit::com_affix_len, line::LineProp};

/// The affix lengths a paragraph is reflowed with.
#[derive(Debug, Clone, Copy)]
pub struct Affixes {
    /// Augmented fallback prefix length, used when the output grows
    /// past the input while the input is within the hang.
    pub afp: usize,
    /// Fallback suffix length, used under the same conditions.
    pub fs: usize,
    pub prefix: usize,
    pub suffix: usize,
}

/// Resolves the affixes of a paragraph. `prefix` and `suffix` are the
/// user-supplied lengths, `None` meaning automatic: lines past the
/// hang supply a recomputed common affix when there are at least two
/// of them, otherwise the first line's fallback values apply. The
/// fallback prefix is augmented over quote characters for a lone
/// quoted line.
#[must_use]
pub fn set_affixes(
    lines: &[Vec<u8>],
    props: &[LineProp],
    bodychars: &CharSet,
    quotechars: &CharSet,
    hang: usize,
    quote: bool,
    prefix: Option<usize>,
    suffix: Option<usize>,
) -> Affixes {
    let numin = lines.len();

    let mut pre = 0;
    let mut suf = 0;
    if (prefix.is_none() || suffix.is_none()) && numin > hang + 1 {
        (pre, suf) = com_affix_len(&lines[hang..], bodychars, 0, 0);
    }

    let first = &lines[0];
    let mut afp = props[0].p;
    if numin == 1 && quote {
        while afp < first.len() && quotechars.contains(first[afp]) {
            afp += 1;
        }
    }
    let fs = props[0].s;

    let prefix = prefix.unwrap_or(if numin > hang + 1 { pre } else { afp });
    let suffix = suffix.unwrap_or(if numin > hang + 1 { suf } else { fs });

    Affixes {
        afp,
        fs,
        prefix,
        suffix,
    }
}
