//! Option state and the argument grammar.
//!
//! Arguments are words, not GNU-style flags: `refold 72jw60` is a
//! bare width, a boolean and a width in one argument. Numeric values
//! never exceed 9999. `PARBODY`, `PARPROTECT` and `PARQUOTE` seed
//! the character sets and `PARINIT` supplies arguments parsed ahead
//! of the command line.

use crate::{
    charset::{parse_charset, CharSet},
    error::Error,
};

pub const USAGE: &str = "\
Usage: refold [help] [version] [B<op><set>] [P<op><set>] [Q<op><set>]
              [h[<hang>]] [p[<prefix>]] [r[<repeat>]] [s[<suffix>]]
              [w[<width>]] [c[<cap>]] [d[<div>]] [E[<Err>]] [e[<expel>]]
              [f[<fit>]] [g[<guess>]] [i[<invis>]] [j[<just>]] [l[<last>]]
              [q[<quote>]] [R[<Report>]] [t[<touch>]]

help        print this usage message
version     print the version number
B<op><set>  as <op> is =/+/-, replace/augment/diminish body chars by <set>
P<op><set>  ditto for protective chars
Q<op><set>  ditto for quote chars
h<hang>     skip an IP's first <hang> lines in the scan for common affixes
p<prefix>   prefix length
r<repeat>   if not 0, force bodiless lines to length <width>
s<suffix>   suffix length
w<width>    max output line length

Boolean parameters (0 or 1):
c<cap>      count all words as capitalized
d<div>      use indentation as a paragraph delimiter
E<Err>      send messages to stderr
e<expel>    discard superfluous lines
f<fit>      narrow paragraphs for best fit
g<guess>    preserve wide sentence breaks
i<invis>    hide lines inserted by <quote>
j<just>     justify paragraphs
l<last>     treat last lines like others
q<quote>    supply vacant lines between different quote nesting levels
R<Report>   print an error for too-long words
t<touch>    move suffixes left
";

/// Every knob the reflow pipeline takes. `prefix`, `suffix` and
/// `touch` distinguish "unset" from an explicit value.
#[expect(
    clippy::struct_excessive_bools,
    reason = "the booleans map one-to-one onto flag letters"
)]
#[derive(Debug, Clone)]
pub struct Options {
    pub hang: usize,
    pub prefix: Option<usize>,
    pub repeat: usize,
    pub suffix: Option<usize>,
    pub width: usize,
    pub cap: bool,
    pub div: bool,
    pub err: bool,
    pub expel: bool,
    pub fit: bool,
    pub guess: bool,
    pub invis: bool,
    pub just: bool,
    pub last: bool,
    pub quote: bool,
    pub report: bool,
    pub touch: Option<bool>,
    pub bodychars: CharSet,
    pub protectchars: CharSet,
    pub quotechars: CharSet,
    pub terminalchars: CharSet,
    pub help: bool,
    pub version: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            hang: 0,
            prefix: None,
            repeat: 0,
            suffix: None,
            width: 72,
            cap: false,
            div: false,
            err: false,
            expel: false,
            fit: false,
            guess: false,
            invis: false,
            just: false,
            last: false,
            quote: false,
            report: false,
            touch: None,
            bodychars: CharSet::new(),
            protectchars: CharSet::new(),
            quotechars: CharSet::from_bytes(b"> "),
            terminalchars: CharSet::from_bytes(b".?!"),
            help: false,
            version: false,
        }
    }
}

/// Scans a run of decimal digits at `i`. `None` when `bytes[i]` is
/// not a digit; an error when the value would pass 9999.
fn scan_num(bytes: &[u8], mut i: usize) -> Result<(Option<usize>, usize), ()> {
    if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
        return Ok((None, i));
    }
    let mut n: usize = 0;
    while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        if n >= 1000 {
            return Err(());
        }
        n = 10 * n + usize::from(d - b'0');
        i += 1;
    }
    Ok((Some(n), i))
}

impl Options {
    /// Resolved `touch`: defaults on when `fit` or `last` is on.
    #[must_use]
    pub fn touch(&self) -> bool {
        self.touch.unwrap_or(self.fit || self.last)
    }

    fn parse_charset_edit(&mut self, arg: &str) -> Result<(), Error> {
        let bytes = arg.as_bytes();
        let op = bytes.get(1).copied();
        let Some(op @ (b'=' | b'+' | b'-')) = op else {
            self.help = true;
            return Err(Error::bad_argument(arg));
        };
        let mut change = parse_charset(&arg[2..])?;
        let target = match bytes[0] {
            b'B' => &mut self.bodychars,
            b'P' => &mut self.protectchars,
            _ => &mut self.quotechars,
        };
        match op {
            b'=' => target.swap(&mut change),
            b'+' => target.add(&change),
            _ => target.remove(&change),
        }
        Ok(())
    }

    /// Parses one argument word.
    ///
    /// # Errors
    /// [`Error::BadArgument`] for anything outside the grammar and
    /// [`Error::BadCharset`] for a malformed set literal.
    pub fn parse_arg(&mut self, arg: &str) -> Result<(), Error> {
        let savearg = arg;
        let arg = arg.strip_prefix('-').unwrap_or(arg);
        let bad = |opts: &mut Options| {
            opts.help = true;
            Err(Error::bad_argument(savearg))
        };

        match arg {
            "help" => {
                self.help = true;
                return Ok(());
            }
            "version" => {
                self.version = true;
                return Ok(());
            }
            _ => {}
        }

        let bytes = arg.as_bytes();
        if let Some(b'B' | b'P' | b'Q') = bytes.first() {
            return self.parse_charset_edit(arg);
        }

        let mut i = 0;
        if bytes.first().is_some_and(u8::is_ascii_digit) {
            let Ok((Some(n), next)) = scan_num(bytes, 0) else {
                return bad(self);
            };
            if n <= 8 {
                self.prefix = Some(n);
            } else {
                self.width = n;
            }
            i = next;
        }

        while i < bytes.len() {
            let oc = bytes[i];
            let Ok((n, next)) = scan_num(bytes, i + 1) else {
                return bad(self);
            };
            i = next;
            match oc {
                b'h' => self.hang = n.unwrap_or(1),
                b'w' => self.width = n.unwrap_or(79),
                b'p' => self.prefix = n,
                b'r' => self.repeat = n.unwrap_or(3),
                b's' => self.suffix = n,
                _ => {
                    let v = n.unwrap_or(1);
                    if v > 1 {
                        return bad(self);
                    }
                    let v = v != 0;
                    match oc {
                        b'c' => self.cap = v,
                        b'd' => self.div = v,
                        b'E' => self.err = v,
                        b'e' => self.expel = v,
                        b'f' => self.fit = v,
                        b'g' => self.guess = v,
                        b'i' => self.invis = v,
                        b'j' => self.just = v,
                        b'l' => self.last = v,
                        b'q' => self.quote = v,
                        b'R' => self.report = v,
                        b't' => self.touch = Some(v),
                        _ => return bad(self),
                    }
                }
            }
        }

        Ok(())
    }

    fn env_charset(&mut self, name: &str) -> Result<Option<CharSet>, Error> {
        let Ok(value) = std::env::var(name) else {
            return Ok(None);
        };
        match parse_charset(&value) {
            Ok(set) => Ok(Some(set)),
            Err(err) => {
                self.help = true;
                Err(err)
            }
        }
    }

    /// Applies the environment: the charset variables, then the
    /// words of `PARINIT`. Stops early once `help` or `version` is
    /// seen, like the argument list proper.
    ///
    /// # Errors
    /// Propagates the first parse failure, leaving the options in
    /// their state at that point.
    pub fn apply_env(&mut self) -> Result<(), Error> {
        if let Some(set) = self.env_charset("PARBODY")? {
            self.bodychars = set;
        }
        if let Some(set) = self.env_charset("PARPROTECT")? {
            self.protectchars = set;
        }
        if let Some(set) = self.env_charset("PARQUOTE")? {
            self.quotechars = set;
        }

        if let Ok(init) = std::env::var("PARINIT") {
            for word in init.split([' ', '\x0c', '\n', '\r', '\t', '\x0b']) {
                if word.is_empty() {
                    continue;
                }
                self.parse_arg(word)?;
                if self.help || self.version {
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
