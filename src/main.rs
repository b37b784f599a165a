use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use refold::{run, Error, Options, USAGE};

/// Parses the environment and command line into `opts`, stopping at
/// the first failure or at `help`/`version`.
fn configure(opts: &mut Options) -> Result<(), Error> {
    opts.apply_env()?;
    if opts.help || opts.version {
        return Ok(());
    }
    for arg in std::env::args().skip(1) {
        opts.parse_arg(&arg)?;
        if opts.help || opts.version {
            return Ok(());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let mut opts = Options::default();

    let mut result = configure(&mut opts);
    if result.is_ok() && !opts.help && !opts.version {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut output = BufWriter::new(stdout.lock());
        result = run(stdin.lock(), &mut output, &opts)
            .and_then(|()| output.flush().map_err(Error::from));
    }

    // Reports go to stderr only on request; the help and version
    // texts follow the same routing.
    let status = if result.is_err() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    };
    let stderr = io::stderr();
    let stdout = io::stdout();
    let mut errout: Box<dyn Write> = if opts.err {
        Box::new(stderr.lock())
    } else {
        Box::new(stdout.lock())
    };
    if let Err(err) = result {
        let _ = writeln!(errout, "refold error:\n{err}");
    }
    if opts.version {
        let _ = writeln!(errout, "refold {}", env!("CARGO_PKG_VERSION"));
    }
    if opts.help {
        let _ = errout.write_all(USAGE.as_bytes());
    }

    status
}
