//! Reading one input paragraph's worth of lines from a byte stream.

use std::io::BufRead;

use crate::{
    charset::CharSet,
    error::Error,
    line::{is_white, LineFlags, LineProp},
};

/// A byte source with a single pushed-back byte, mirroring the
/// one-byte guarantee of `ungetc`.
pub struct ByteStream<R> {
    inner: R,
    pushed: Option<u8>,
}

impl<R: BufRead> ByteStream<R> {
    pub fn new(inner: R) -> Self {
        ByteStream {
            inner,
            pushed: None,
        }
    }

    /// Returns the next byte, or `None` at end of input.
    ///
    /// # Errors
    /// Propagates read failures from the underlying stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        if let Some(b) = self.pushed.take() {
            return Ok(Some(b));
        }
        let buf = self.inner.fill_buf()?;
        let Some(&b) = buf.first() else {
            return Ok(None);
        };
        self.inner.consume(1);
        Ok(Some(b))
    }

    /// Pushes `b` back; the next read returns it again.
    pub fn unread(&mut self, b: u8) {
        debug_assert!(self.pushed.is_none());
        self.pushed = Some(b);
    }
}

/// The lines of one input paragraph with their parallel properties.
#[derive(Debug, Default)]
pub struct Paragraph {
    pub lines: Vec<Vec<u8>>,
    pub props: Vec<LineProp>,
}

impl Paragraph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Quote skeleton of one line: where the leading quote run ends and
/// whether the rest of the line is quote characters and spaces only.
struct Skeleton {
    qpend: usize,
    qsonly: bool,
}

fn skeleton(ln: &[u8], quotechars: &CharSet) -> Skeleton {
    let mut qpend = 0;
    while qpend < ln.len() && quotechars.contains(ln[qpend]) {
        qpend += 1;
    }
    let mut p = qpend;
    while p < ln.len() && (ln[p] == b' ' || quotechars.contains(ln[p])) {
        p += 1;
    }
    let qsonly = p == ln.len();
    while qpend > 0 && ln[qpend - 1] == b' ' {
        qpend -= 1;
    }
    Skeleton { qpend, qsonly }
}

/// Compares the current line's quote skeleton with the previous one
/// and either truncates skeleton-only lines to their common prefix or
/// inserts a vacant line carrying the common prefix.
fn reconcile_quotes(
    ln: &mut Vec<u8>,
    sk: &mut Skeleton,
    para: &mut Paragraph,
    prev: (usize, usize, bool),
    invis: bool,
) {
    let (prev_idx, oldqpend, oldqsonly) = prev;
    let old = &para.lines[prev_idx];
    let mut k = 0;
    while k < sk.qpend && k < oldqpend && ln[k] == old[k] {
        k += 1;
    }
    if k == sk.qpend && k == oldqpend {
        return;
    }
    if !invis && (oldqsonly || sk.qsonly) {
        if oldqsonly {
            para.lines[prev_idx].truncate(k);
        }
        if sk.qsonly {
            ln.truncate(k);
            sk.qpend = k;
        }
    } else {
        para.lines.push(ln[..k].to_vec());
        para.props.push(LineProp {
            flags: if invis {
                LineFlags::INVIS
            } else {
                LineFlags::empty()
            },
            ..LineProp::default()
        });
    }
}

/// Reads lines until end of input, a blank line (its newline is
/// pushed back), or a line opening with a protective character (that
/// byte is pushed back). NUL bytes are dropped and every white byte
/// other than newline becomes a space. When `quote` is set, vacant
/// lines are supplied between differing quote nesting levels; they
/// are flagged invisible when `invis` is also set.
///
/// # Errors
/// Propagates read failures from the underlying stream.
pub fn read_paragraph<R: BufRead>(
    stream: &mut ByteStream<R>,
    protectchars: &CharSet,
    quotechars: &CharSet,
    invis: bool,
    quote: bool,
) -> Result<Paragraph, Error> {
    let mut para = Paragraph::default();
    let mut cbuf: Vec<u8> = Vec::new();
    let mut empty = true;
    let mut blank = true;
    let mut prev: Option<(usize, usize, bool)> = None;

    while let Some(c) = stream.next_byte()? {
        if c == b'\n' {
            if blank {
                stream.unread(c);
                break;
            }
            let mut ln = std::mem::take(&mut cbuf);
            if quote {
                let mut sk = skeleton(&ln, quotechars);
                if let Some(prev) = prev {
                    reconcile_quotes(&mut ln, &mut sk, &mut para, prev, invis);
                }
                prev = Some((para.lines.len(), sk.qpend, sk.qsonly));
            }
            para.lines.push(ln);
            para.props.push(LineProp::default());
            empty = true;
            blank = true;
        } else {
            if empty {
                if protectchars.contains(c) {
                    stream.unread(c);
                    break;
                }
                empty = false;
            }
            if c == 0 {
                continue;
            }
            if is_white(c) {
                cbuf.push(b' ');
            } else {
                blank = false;
                cbuf.push(c);
            }
        }
    }

    if !blank {
        para.lines.push(cbuf);
        para.props.push(LineProp::default());
    }

    Ok(para)
}
