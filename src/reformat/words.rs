//! The word arena: views into a paragraph's lines, linked into a
//! list with a sentinel at index zero so that sentence-break merging
//! and over-long splitting are plain index relinks.

use bitflags::bitflags;

use crate::{charset::CharSet, error::Error};

/// Absent link.
pub(crate) const NIL: u32 = u32::MAX;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct WordFlags: u8 {
        /// Needs an extra space before it unless it starts a line.
        const SHIFTED = 1;
        /// Ends in sentence-terminal punctuation backed by a letter.
        const CURIOUS = 2;
        /// First alphanumeric is not lowercase.
        const CAPITAL = 4;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Word {
    pub line: usize,
    pub start: usize,
    pub len: usize,
    pub flags: WordFlags,
    pub prev: u32,
    pub next: u32,
}

#[derive(Debug)]
pub(crate) struct WordList {
    pub words: Vec<Word>,
    pub tail: u32,
}

impl WordList {
    fn new() -> Self {
        WordList {
            words: vec![Word {
                line: 0,
                start: 0,
                len: 0,
                flags: WordFlags::empty(),
                prev: NIL,
                next: NIL,
            }],
            tail: 0,
        }
    }

    pub fn first(&self) -> u32 {
        self.words[0].next
    }

    pub fn is_empty(&self) -> bool {
        self.first() == NIL
    }

    pub fn bytes<'a>(&self, lines: &'a [Vec<u8>], id: u32) -> &'a [u8] {
        let w = &self.words[id as usize];
        &lines[w.line][w.start..w.start + w.len]
    }

    pub fn len_of(&self, id: u32) -> usize {
        self.words[id as usize].len
    }

    pub fn shifted(&self, id: u32) -> bool {
        self.words[id as usize].flags.contains(WordFlags::SHIFTED)
    }

    fn push_back(&mut self, line: usize, start: usize, len: usize) {
        let id = u32::try_from(self.words.len()).unwrap_or(NIL);
        self.words.push(Word {
            line,
            start,
            len,
            flags: WordFlags::empty(),
            prev: self.tail,
            next: NIL,
        });
        self.words[self.tail as usize].next = id;
        self.tail = id;
    }
}

/// Builds the word list for a paragraph's body regions.
///
/// The very first word's view begins at the prefix column of its
/// line, so an indent beyond the prefix travels with it.
///
/// # Errors
/// Fails when a line is shorter than the combined affix width.
pub(crate) fn tokenize(
    lines: &[Vec<u8>],
    prefix: usize,
    suffix: usize,
) -> Result<WordList, Error> {
    let affix = prefix + suffix;
    let mut list = WordList::new();
    let mut onfirstword = true;
    for (idx, line) in lines.iter().enumerate() {
        if line.len() < affix {
            return Err(Error::LineTooShort {
                line: idx + 1,
                prefix,
                suffix,
                affix,
            });
        }
        let end = line.len() - suffix;
        let mut p1 = prefix;
        loop {
            while p1 < end && line[p1] == b' ' {
                p1 += 1;
            }
            if p1 == end {
                break;
            }
            let mut p2 = p1;
            if onfirstword {
                p1 = prefix;
                onfirstword = false;
            }
            while p2 < end && line[p2] != b' ' {
                p2 += 1;
            }
            list.push_back(idx, p1, p2 - p1);
            p1 = p2;
        }
    }
    Ok(list)
}

/// Whether the word's first alphanumeric byte is not lowercase.
fn check_capital(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| b.is_ascii_alphanumeric())
        .is_some_and(|b| !b.is_ascii_lowercase())
}

/// Whether the word ends in a run of non-alphanumerics containing a
/// terminal character that is itself preceded by an alphanumeric.
fn check_curious(bytes: &[u8], terminalchars: &CharSet) -> bool {
    let mut p = bytes.len();
    while p > 0 {
        let ch = bytes[p - 1];
        if ch.is_ascii_alphanumeric() {
            return false;
        }
        if terminalchars.contains(ch) {
            break;
        }
        p -= 1;
    }
    if p <= 1 {
        return false;
    }
    bytes[..p - 1].iter().any(|b| b.is_ascii_alphanumeric())
}

impl WordList {
    /// Flags curious and capital words and preserves wide sentence
    /// breaks: a capital word directly after a curious one in the
    /// same line absorbs it (and the joining space); one separated
    /// from it becomes shifted.
    pub fn guess_pass(&mut self, lines: &[Vec<u8>], cap: bool, terminalchars: &CharSet) {
        let mut w1 = 0u32;
        let mut w2 = self.words[0].next;
        while w2 != NIL {
            if check_curious(self.bytes(lines, w2), terminalchars) {
                self.words[w2 as usize].flags |= WordFlags::CURIOUS;
            }
            if cap || check_capital(self.bytes(lines, w2)) {
                self.words[w2 as usize].flags |= WordFlags::CAPITAL;
                if self.words[w1 as usize].flags.contains(WordFlags::CURIOUS) {
                    let (l1, s1, n1, f1) = {
                        let w = &self.words[w1 as usize];
                        (w.line, w.start, w.len, w.flags)
                    };
                    let adjacent = {
                        let w = &self.words[w2 as usize];
                        w.line == l1 && s1 + n1 + 1 == w.start
                    };
                    if adjacent {
                        let prev = self.words[w1 as usize].prev;
                        let w = &mut self.words[w2 as usize];
                        w.len += n1 + 1;
                        w.start = s1;
                        w.prev = prev;
                        w.flags.set(WordFlags::CAPITAL, f1.contains(WordFlags::CAPITAL));
                        w.flags.set(WordFlags::SHIFTED, f1.contains(WordFlags::SHIFTED));
                        self.words[prev as usize].next = w2;
                    } else {
                        self.words[w2 as usize].flags |= WordFlags::SHIFTED;
                    }
                }
            }
            w1 = w2;
            w2 = self.words[w2 as usize].next;
        }
        self.tail = w1;
    }

    /// Reports the first word longer than `l`.
    ///
    /// # Errors
    /// [`Error::WordTooLong`] with a truncated excerpt.
    pub fn report_long(&self, lines: &[Vec<u8>], l: usize) -> Result<(), Error> {
        let mut w2 = self.first();
        while w2 != NIL {
            if self.len_of(w2) > l {
                return Err(Error::word_too_long(self.bytes(lines, w2)));
            }
            w2 = self.words[w2 as usize].next;
        }
        Ok(())
    }

    /// Splits words longer than `l` into `l`-sized pieces plus a
    /// tail. Leading pieces take the shifted and capital flags.
    pub fn split_long(&mut self, l: usize) {
        let mut w2 = self.first();
        while w2 != NIL {
            while self.len_of(w2) > l {
                let id = u32::try_from(self.words.len()).unwrap_or(NIL);
                let (line, start, prev) = {
                    let w = &self.words[w2 as usize];
                    (w.line, w.start, w.prev)
                };
                let mut flags = WordFlags::empty();
                {
                    let w = &mut self.words[w2 as usize];
                    if w.flags.contains(WordFlags::CAPITAL) {
                        flags |= WordFlags::CAPITAL;
                        w.flags.remove(WordFlags::CAPITAL);
                    }
                    if w.flags.contains(WordFlags::SHIFTED) {
                        flags |= WordFlags::SHIFTED;
                        w.flags.remove(WordFlags::SHIFTED);
                    }
                    w.start += l;
                    w.len -= l;
                    w.prev = id;
                }
                self.words.push(Word {
                    line,
                    start,
                    len: l,
                    flags,
                    prev,
                    next: w2,
                });
                self.words[prev as usize].next = id;
            }
            w2 = self.words[w2 as usize].next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<Vec<u8>> {
        src.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    fn collect(list: &WordList, ls: &[Vec<u8>]) -> Vec<String> {
        let mut out = Vec::new();
        let mut w = list.first();
        while w != NIL {
            out.push(String::from_utf8_lossy(list.bytes(ls, w)).into_owned());
            w = list.words[w as usize].next;
        }
        out
    }

    #[test]
    fn splits_on_space_runs() {
        let ls = lines(&["one  two", "three"]);
        let list = tokenize(&ls, 0, 0).unwrap();
        assert_eq!(collect(&list, &ls), vec!["one", "two", "three"]);
    }

    #[test]
    fn first_word_keeps_indent_past_the_prefix() {
        let ls = lines(&["   indented start", "continued"]);
        let list = tokenize(&ls, 0, 0).unwrap();
        assert_eq!(
            collect(&list, &ls),
            vec!["   indented", "start", "continued"]
        );
    }

    #[test]
    fn affixes_bound_the_scan() {
        let ls = lines(&["| a b |"]);
        let list = tokenize(&ls, 2, 2).unwrap();
        assert_eq!(collect(&list, &ls), vec!["a", "b"]);
    }

    #[test]
    fn short_line_is_an_error() {
        let ls = lines(&["ab"]);
        let err = tokenize(&ls, 2, 2).unwrap_err();
        assert!(matches!(err, Error::LineTooShort { line: 1, .. }));
    }

    #[test]
    fn capital_and_curious_detection() {
        assert!(check_capital(b"World"));
        assert!(check_capital(b"(4th)"));
        assert!(!check_capital(b"world"));
        assert!(!check_capital(b"..."));

        let term = CharSet::from_bytes(b".?!");
        assert!(check_curious(b"Hello.", &term));
        assert!(check_curious(b"end!)", &term));
        assert!(!check_curious(b"e.g.x", &term));
        assert!(!check_curious(b"plain", &term));
        assert!(!check_curious(b".", &term));
    }

    #[test]
    fn adjacent_curious_capital_pair_merges() {
        let ls = lines(&["Hello.  World foo."]);
        let mut list = tokenize(&ls, 0, 0).unwrap();
        list.guess_pass(&ls, false, &CharSet::from_bytes(b".?!"));
        // "Hello." and "World" were split by a double space, so they
        // stay separate words; the double space leaves "World"
        // shifted only when the pair is not adjacent.
        assert_eq!(collect(&list, &ls), vec!["Hello.", "World", "foo."]);
        assert!(list.shifted(list.words[list.first() as usize].next));
    }

    #[test]
    fn single_space_pair_coalesces_into_one_word() {
        let ls = lines(&["Hello. World"]);
        let mut list = tokenize(&ls, 0, 0).unwrap();
        list.guess_pass(&ls, false, &CharSet::from_bytes(b".?!"));
        assert_eq!(collect(&list, &ls), vec!["Hello. World"]);
        assert_eq!(list.tail, list.first());
    }

    #[test]
    fn cap_treats_every_word_as_capitalized() {
        let ls = lines(&["ok. then"]);
        let mut list = tokenize(&ls, 0, 0).unwrap();
        list.guess_pass(&ls, true, &CharSet::from_bytes(b".?!"));
        assert_eq!(collect(&list, &ls), vec!["ok. then"]);
    }

    #[test]
    fn split_long_moves_flags_to_the_head_piece() {
        let ls = lines(&["Abcdefgh"]);
        let mut list = tokenize(&ls, 0, 0).unwrap();
        list.guess_pass(&ls, false, &CharSet::from_bytes(b".?!"));
        list.split_long(3);
        assert_eq!(collect(&list, &ls), vec!["Abc", "def", "gh"]);
        let first = list.first();
        assert!(list.words[first as usize]
            .flags
            .contains(WordFlags::CAPITAL));
        let second = list.words[first as usize].next;
        assert!(!list.words[second as usize]
            .flags
            .contains(WordFlags::CAPITAL));
    }
}
