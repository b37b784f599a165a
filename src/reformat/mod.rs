//! Reflowing one paragraph: tokenize its body, choose line breaks,
//! and rebuild lines with the original affixes attached.

mod breaks;
mod words;

use crate::{affix::Affixes, error::Error, opts::Options};

use breaks::{just_breaks, normal_breaks, BreakPlan};
use words::{tokenize, WordList, NIL};

/// Length of the line starting at `w1`, up to its planned break.
fn planned_len(list: &WordList, plan: &BreakPlan, w1: u32) -> (usize, usize, u32) {
    let mut numgaps = 0;
    let mut used = list.len_of(w1);
    let mut w2 = list.words[w1 as usize].next;
    while w2 != plan.next[w1 as usize] {
        numgaps += 1;
        used += 1 + usize::from(list.shifted(w2)) + list.len_of(w2);
        w2 = list.words[w2 as usize].next;
    }
    (used, numgaps, w2)
}

fn assemble(
    lines: &[Vec<u8>],
    list: &WordList,
    plan: &BreakPlan,
    l: usize,
    aff: &Affixes,
    hang: usize,
    just: bool,
    last: bool,
) -> Vec<Vec<u8>> {
    let Affixes {
        afp,
        fs,
        prefix,
        suffix,
    } = *aff;
    let affix = prefix + suffix;
    let numin = lines.len();

    let mut out = Vec::new();
    let mut numout = 0usize;
    let mut w1 = list.first();
    let mut w2 = NIL;
    let mut numgaps = 0usize;
    let mut extra = 0usize;

    while numout < hang || w1 != NIL {
        if w1 != NIL {
            let (used, gaps, next) = planned_len(list, plan, w1);
            numgaps = gaps;
            w2 = next;
            extra = l - used;
        }
        let linelen = if suffix != 0 || (just && (w2 != NIL || last)) {
            l + affix
        } else if w1 != NIL {
            prefix + l - extra
        } else {
            prefix
        };

        let mut q = Vec::with_capacity(linelen);
        numout += 1;

        if numout <= numin {
            q.extend_from_slice(&lines[numout - 1][..prefix]);
        } else if numin > hang {
            q.extend_from_slice(&lines[numin - 1][..prefix]);
        } else {
            q.extend_from_slice(&lines[numin - 1][..afp.min(prefix)]);
            q.resize(prefix, b' ');
        }

        if w1 != NIL {
            let mut phase = numgaps / 2;
            let mut w = w1;
            loop {
                q.extend_from_slice(list.bytes(lines, w));
                w = list.words[w as usize].next;
                if w == plan.next[w1 as usize] {
                    break;
                }
                q.push(b' ');
                if just && (plan.next[w1 as usize] != NIL || last) {
                    phase += extra;
                    while phase >= numgaps {
                        q.push(b' ');
                        phase -= numgaps;
                    }
                }
                if list.shifted(w) {
                    q.push(b' ');
                }
            }
        }

        let body_end = prefix + (linelen - affix);
        q.resize(body_end, b' ');

        if numout <= numin {
            let line = &lines[numout - 1];
            q.extend_from_slice(&line[line.len() - suffix..]);
        } else if numin > hang {
            let line = &lines[numin - 1];
            q.extend_from_slice(&line[line.len() - suffix..]);
        } else {
            let line = &lines[numin - 1];
            let start = line.len() - suffix;
            q.extend_from_slice(&line[start..start + fs.min(suffix)]);
            q.resize(body_end + suffix, b' ');
        }

        out.push(q);
        if w1 != NIL {
            w1 = plan.next[w1 as usize];
        }
    }

    out
}

/// Reflows the lines of one paragraph and returns the output lines.
///
/// # Errors
/// Fails when the width cannot hold the affixes, a line is shorter
/// than the affixes, a word cannot fit a line and reporting was
/// requested, or the paragraph cannot be justified.
pub fn reformat(lines: &[Vec<u8>], aff: &Affixes, opts: &Options) -> Result<Vec<Vec<u8>>, Error> {
    if lines.is_empty() {
        return Err(Error::Impossibility(4));
    }
    let affix = aff.prefix + aff.suffix;
    if opts.width <= affix {
        return Err(Error::WidthTooSmall {
            width: opts.width,
            prefix: aff.prefix,
            suffix: aff.suffix,
        });
    }
    let mut l = opts.width - affix;

    let mut list = tokenize(lines, aff.prefix, aff.suffix)?;

    if opts.guess {
        list.guess_pass(lines, opts.cap, &opts.terminalchars);
    }

    if opts.report {
        list.report_long(lines, l)?;
    } else {
        list.split_long(l);
    }

    let mut plan = BreakPlan::new(list.words.len());
    if opts.just {
        just_breaks(&list, l as i64, opts.last, &mut plan)?;
    } else {
        normal_breaks(&list, l as i64, opts.fit, opts.last, &mut plan)?;
    }

    if !opts.just && opts.touch() {
        l = 0;
        let mut w1 = list.first();
        while w1 != NIL {
            let (used, _, next) = planned_len(&list, &plan, w1);
            l = l.max(used);
            w1 = next;
        }
    }

    Ok(assemble(
        lines, &list, &plan, l, aff, opts.hang, opts.just, opts.last,
    ))
}
