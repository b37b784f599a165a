//! Common affix measurement and line classification for one input
//! paragraph.

use crate::{
    charset::CharSet,
    line::{LineFlags, LineProp},
};

/// Computes the common prefix and suffix length of `lines`, assuming
/// both have already been determined to be at least `pre` and `suf`.
///
/// The prefix stops at the first body character. The suffix extends
/// leftward only over non-body characters and is then shortened so
/// that it keeps at most one of its leading padding spaces.
#[must_use]
pub fn com_affix_len(
    lines: &[Vec<u8>],
    bodychars: &CharSet,
    pre: usize,
    suf: usize,
) -> (usize, usize) {
    let first = &lines[0];

    let mut end = pre;
    while end < first.len() && !bodychars.contains(first[end]) {
        end += 1;
    }
    for line in &lines[1..] {
        let mut p = pre;
        while p < end && p < line.len() && first[p] == line[p] {
            p += 1;
        }
        end = p;
    }
    let pre = end;

    let mut start = first.len() - suf;
    while start > pre && !bodychars.contains(first[start - 1]) {
        start -= 1;
    }
    for line in &lines[1..] {
        let mut p1 = first.len() - suf;
        let mut p2 = line.len() - suf;
        while p1 > start && p2 > pre && first[p1 - 1] == line[p2 - 1] {
            p1 -= 1;
            p2 -= 1;
        }
        start = p1;
    }
    while first.len() - start >= 2 && first[start] == b' ' && first[start + 1] == b' ' {
        start += 1;
    }

    (pre, first.len() - start)
}

fn classify_bodiless(line: &[u8], prop: &mut LineProp, pre: usize, suf: usize, repeat: usize) {
    prop.flags |= LineFlags::BODILESS;
    prop.p = pre;
    prop.s = suf;
    let body = &line[pre..line.len() - suf];
    let rc = body.first().copied().unwrap_or(b' ');
    if rc != b' ' && repeat != 0 && body.len() < repeat {
        prop.flags.remove(LineFlags::BODILESS);
    } else if body.iter().any(|&b| b != rc) {
        prop.flags.remove(LineFlags::BODILESS);
    }
    if prop.is_bodiless() {
        prop.rc = rc;
    }
}

/// Classifies the lines of a paragraph: refines the common affixes,
/// detects bodiless lines, recurses between them, and marks the first
/// line of each paragraph (`SUPERF` is never set here). The affixes
/// must already be known to be at least `pre` and `suf`.
pub fn delimit(
    lines: &[Vec<u8>],
    props: &mut [LineProp],
    bodychars: &CharSet,
    repeat: usize,
    div: bool,
    pre: usize,
    suf: usize,
) {
    if lines.is_empty() {
        return;
    }
    if lines.len() == 1 {
        props[0].flags |= LineFlags::FIRST;
        props[0].p = pre;
        props[0].s = suf;
        return;
    }

    let (pre, suf) = com_affix_len(lines, bodychars, pre, suf);

    let mut anybodiless = false;
    for (line, prop) in lines.iter().zip(props.iter_mut()) {
        classify_bodiless(line, prop, pre, suf, repeat);
        anybodiless |= prop.is_bodiless();
    }

    if anybodiless {
        let mut i = 0;
        while i < lines.len() {
            if props[i].is_bodiless() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < lines.len() && !props[j].is_bodiless() {
                j += 1;
            }
            delimit(
                &lines[i..j],
                &mut props[i..j],
                bodychars,
                repeat,
                div,
                pre,
                suf,
            );
            i = j;
        }
        return;
    }

    if !div {
        props[0].flags |= LineFlags::FIRST;
        return;
    }

    let at_pre = |line: &Vec<u8>| line.get(pre).copied().unwrap_or(0) == b' ';
    let status = at_pre(&lines[0]);
    for (line, prop) in lines.iter().zip(props.iter_mut()) {
        if at_pre(line) == status {
            prop.flags |= LineFlags::FIRST;
        }
    }
}

/// Marks superfluous vacant lines: every vacant line is superfluous
/// except, in each run of vacants between two body lines, the one
/// with the fewest non-space bytes (ties keep the leftmost). Runs
/// touching the paragraph boundary keep none.
pub fn mark_superfluous(lines: &[Vec<u8>], props: &mut [LineProp]) {
    for prop in props.iter_mut() {
        if prop.is_vacant() {
            prop.flags |= LineFlags::SUPERF;
        }
    }

    let mut inbody = false;
    let mut mnum = 0usize;
    let mut kept: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        if props[i].is_vacant() {
            let num = line.iter().filter(|&&b| b != b' ').count();
            if inbody || num < mnum {
                mnum = num;
                kept = Some(i);
            }
            inbody = false;
        } else {
            if !inbody {
                if let Some(m) = kept {
                    props[m].flags.remove(LineFlags::SUPERF);
                }
            }
            inbody = true;
        }
    }
}
