//! The filter loop: copy blank and protected material through,
//! gather paragraphs, and reflow them.

use std::io::{BufRead, Write};

use crate::{
    affix::set_affixes,
    delimit::{delimit, mark_superfluous},
    error::Error,
    line::LineProp,
    opts::Options,
    reader::{read_paragraph, ByteStream},
    reformat::reformat,
};

fn emit_bodiless<W: Write>(
    output: &mut W,
    line: &[u8],
    prop: &LineProp,
    opts: &Options,
) -> Result<(), Error> {
    if opts.repeat == 0 || (prop.rc == b' ' && prop.s == 0) {
        let mut end = line.len();
        while end > 0 && line[end - 1] == b' ' {
            end -= 1;
        }
        output.write_all(&line[..end])?;
    } else {
        let Some(n) = opts.width.checked_sub(prop.p + prop.s) else {
            return Err(Error::Impossibility(5));
        };
        output.write_all(&line[..prop.p])?;
        output.write_all(&vec![prop.rc; n])?;
        output.write_all(&line[line.len() - prop.s..])?;
    }
    output.write_all(b"\n")?;
    Ok(())
}

/// Copies blank lines (or owes one, under `expel`) and protected
/// lines through verbatim. Returns the first byte of the next
/// paragraph, or `None` at end of input.
fn copy_through<R: BufRead, W: Write>(
    stream: &mut ByteStream<R>,
    output: &mut W,
    opts: &Options,
    saw_nonblank: &mut bool,
    owe_blank: &mut bool,
) -> Result<Option<u8>, Error> {
    loop {
        let mut c = stream.next_byte()?;
        if opts.expel && c == Some(b'\n') {
            *owe_blank = *saw_nonblank;
            continue;
        }
        if let Some(b) = c {
            if opts.protectchars.contains(b) {
                *saw_nonblank = true;
                if std::mem::take(owe_blank) {
                    output.write_all(b"\n")?;
                }
                let mut cur = Some(b);
                while let Some(x) = cur {
                    if x == b'\n' {
                        break;
                    }
                    output.write_all(&[x])?;
                    cur = stream.next_byte()?;
                }
                c = cur;
            }
        }
        match c {
            Some(b'\n') => output.write_all(b"\n")?,
            other => return Ok(other),
        }
    }
}

/// Runs the whole filter over `input`, writing to `output`.
///
/// # Errors
/// The first failing paragraph (or I/O failure) aborts the run;
/// everything already reflowed has been written.
pub fn run<R: BufRead, W: Write>(input: R, output: &mut W, opts: &Options) -> Result<(), Error> {
    let mut stream = ByteStream::new(input);
    let mut saw_nonblank = false;
    let mut owe_blank = false;

    loop {
        let Some(b) = copy_through(
            &mut stream,
            output,
            opts,
            &mut saw_nonblank,
            &mut owe_blank,
        )?
        else {
            break;
        };
        stream.unread(b);

        let para = read_paragraph(
            &mut stream,
            &opts.protectchars,
            &opts.quotechars,
            opts.invis,
            opts.quote,
        )?;
        if para.is_empty() {
            continue;
        }
        saw_nonblank = true;
        if std::mem::take(&mut owe_blank) {
            output.write_all(b"\n")?;
        }

        let lines = para.lines;
        let mut props = para.props;
        delimit(
            &lines,
            &mut props,
            &opts.bodychars,
            opts.repeat,
            opts.div,
            0,
            0,
        );
        if opts.expel {
            mark_superfluous(&lines, &mut props);
        }

        let mut i = 0;
        while i < lines.len() {
            if props[i].is_bodiless() {
                if !props[i].is_invis() && !(opts.expel && props[i].is_superf()) {
                    emit_bodiless(output, &lines[i], &props[i], opts)?;
                }
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < lines.len() && !props[j].is_bodiless() && !props[j].is_first() {
                j += 1;
            }

            let aff = set_affixes(
                &lines[i..j],
                &props[i..j],
                &opts.bodychars,
                &opts.quotechars,
                opts.hang,
                opts.quote,
                opts.prefix,
                opts.suffix,
            );
            let reflowed = reformat(&lines[i..j], &aff, opts)?;
            for line in &reflowed {
                output.write_all(line)?;
                output.write_all(b"\n")?;
            }
            i = j;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_filter(input: &str, opts: &Options) -> String {
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let opts = Options {
            width: 15,
            ..Options::default()
        };
        let got = run_filter("one two three four\n\nfive six seven eight\n", &opts);
        assert_eq!(got, "one two three\nfour\n\nfive six seven\neight\n");
    }

    #[test]
    fn all_space_blank_lines_shrink_to_a_newline() {
        let opts = Options::default();
        let got = run_filter("a\n   \nb\n", &opts);
        assert_eq!(got, "a\n\nb\n");
    }

    #[test]
    fn protected_lines_pass_through_verbatim() {
        let opts = Options {
            width: 10,
            protectchars: crate::charset::CharSet::from_bytes(b"#"),
            ..Options::default()
        };
        let got = run_filter("#!/bin/sh -x   \nword one two\n", &opts);
        assert_eq!(got, "#!/bin/sh -x   \nword one\ntwo\n");
    }

    #[test]
    fn expel_collapses_blank_runs_and_drops_edges() {
        let opts = Options {
            expel: true,
            ..Options::default()
        };
        let got = run_filter("\n\na\n\n\n\nb\n\n", &opts);
        assert_eq!(got, "a\n\nb\n");
    }

    #[test]
    fn expel_spares_one_vacant_per_gap_inside_a_paragraph() {
        let opts = Options {
            expel: true,
            ..Options::default()
        };
        let got = run_filter("# a\n#\n#\n# b\n", &opts);
        assert_eq!(got, "# a\n#\n# b\n");
    }

    #[test]
    fn div_splits_paragraphs_at_matching_indents() {
        let opts = Options {
            div: true,
            ..Options::default()
        };
        let got = run_filter(
            "  first para starts here\nand continues\n  second para\nalso continues\n",
            &opts,
        );
        assert_eq!(
            got,
            "  first para starts here and continues\n  second para also continues\n"
        );
    }

    #[test]
    fn separators_pass_through_and_split_paragraphs() {
        let opts = Options {
            width: 20,
            ..Options::default()
        };
        let got = run_filter("----\none two three four five\n----\n", &opts);
        assert_eq!(got, "----\none two three four\nfive\n----\n");
    }

    #[test]
    fn repeat_stretches_separators_to_width() {
        let opts = Options {
            width: 10,
            repeat: 3,
            ..Options::default()
        };
        let got = run_filter("----\nab cd\n----\n", &opts);
        assert_eq!(got, "----------\nab cd\n----------\n");
    }

    #[test]
    fn quote_vacancies_appear_between_nesting_levels() {
        let opts = Options {
            quote: true,
            ..Options::default()
        };
        let got = run_filter("> A\n> > B\n", &opts);
        assert_eq!(got, "> A\n>\n> > B\n");
    }

    #[test]
    fn invisible_vacancies_are_withheld() {
        let opts = Options {
            quote: true,
            invis: true,
            ..Options::default()
        };
        let got = run_filter("> A\n> > B\n", &opts);
        assert_eq!(got, "> A\n> > B\n");
    }

    #[test]
    fn failing_paragraph_aborts_the_run() {
        let opts = Options {
            width: 10,
            report: true,
            ..Options::default()
        };
        let mut out = Vec::new();
        let err = run("0123456789abcdef\n".as_bytes(), &mut out, &opts).unwrap_err();
        assert!(matches!(err, Error::WordTooLong(_)));
    }
}
