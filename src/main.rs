//! Command-line front end for the sawtooth pitch tracker.
//!
//! Mirrors the classic `swipe` tool: WAV in (file or stdin), one
//! `time pitch` pair per line out (file or stdout), with an optional batch
//! list of input/output pairs.

use sawtooth::track::{DEFAULT_PMAX, DEFAULT_PMIN, DEFAULT_THRESHOLD, DEFAULT_TIMESTEP, MIN_TIMESTEP};
use sawtooth::{convert, io, track};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

const SYNOPSIS: &str = "\
SYNOPSIS:

swipe [-i INPUT] [-b LIST] [-o OUTPUT] [-r MIN:MAX] [-s ST] [-t DT] [-mnhv]

FLAG:       DESCRIPTION:                                DEFAULT:

-i FILE     input WAV file                              STDIN
-o FILE     output file                                 STDOUT
-b LIST     batch mode: LIST is a file containing one
            \"INPUT OUTPUT\" pair per line
-r MIN:MAX  pitch range in Hertz                        100:600
-s THRSHLD  strength threshold [0 <= x <= 1]            0.300
-t SECONDS  timestep in seconds                         0.001
-m          output Mel pitch                            no
-n          don't output unvoiced frames                no
-h          display this message, then quit
-v          display version number, then quit
";

struct Cli {
    input: Option<String>,
    output: Option<String>,
    batch: Option<String>,
    pmin: f64,
    pmax: f64,
    threshold: f64,
    timestep: f64,
    mel: bool,
    keep_unvoiced: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            batch: None,
            pmin: DEFAULT_PMIN,
            pmax: DEFAULT_PMAX,
            threshold: DEFAULT_THRESHOLD,
            timestep: DEFAULT_TIMESTEP,
            mel: false,
            keep_unvoiced: true,
        }
    }
}

enum Action {
    Run(Box<Cli>),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut cli = Cli::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| format!("flag {flag} requires a value"))
        };
        match arg.as_str() {
            "-i" => cli.input = Some(value("-i")?),
            "-o" => cli.output = Some(value("-o")?),
            "-b" => cli.batch = Some(value("-b")?),
            "-r" => {
                let range = value("-r")?;
                let (lo, hi) = range
                    .split_once(':')
                    .ok_or_else(|| format!("bad pitch range `{range}`, expected MIN:MAX"))?;
                cli.pmin = lo
                    .parse()
                    .map_err(|_| format!("bad minimum pitch `{lo}`"))?;
                cli.pmax = hi
                    .parse()
                    .map_err(|_| format!("bad maximum pitch `{hi}`"))?;
            }
            "-s" => {
                let st = value("-s")?;
                cli.threshold = st
                    .parse()
                    .map_err(|_| format!("bad strength threshold `{st}`"))?;
            }
            "-t" => {
                let dt = value("-t")?;
                cli.timestep = dt.parse().map_err(|_| format!("bad timestep `{dt}`"))?;
            }
            flag if flag.len() > 1 && flag.starts_with('-') => {
                // Clustered boolean flags, e.g. -nm
                for ch in flag[1..].chars() {
                    match ch {
                        'm' => cli.mel = true,
                        'n' => cli.keep_unvoiced = false,
                        'h' => return Ok(Action::Help),
                        'v' => return Ok(Action::Version),
                        other => return Err(format!("unknown flag -{other}")),
                    }
                }
            }
            other => return Err(format!("unexpected argument `{other}`")),
        }
    }
    Ok(Action::Run(Box::new(cli)))
}

/// How a single input/output pair failed.
enum PairError {
    /// Nothing was written; a batch may continue.
    Soft(String),
    /// Output was partially written; the batch must abort.
    Hard(String),
}

fn read_input(input: Option<&str>) -> Result<(Vec<f64>, u32), PairError> {
    let (signal, spec) = match input {
        Some(path) => io::load_wav(path),
        None => io::read_wav(BufReader::new(std::io::stdin())),
    }
    .map_err(|e| PairError::Soft(e.to_string()))?;
    Ok((signal, spec.sample_rate))
}

fn write_track<W: Write>(
    sink: &mut W,
    pitch: &[f64],
    timestep: f64,
    mel: bool,
    keep_unvoiced: bool,
) -> std::io::Result<()> {
    let mut t = 0.0f64;
    for &hz in pitch {
        if keep_unvoiced || !hz.is_nan() {
            let value = if mel { convert::hz_to_mel(hz) } else { hz };
            writeln!(sink, "{t:4.7} {value:5.4}")?;
        }
        t += timestep;
    }
    Ok(())
}

fn run_one(input: Option<&str>, output: Option<&str>, cli: &Cli) -> Result<(), PairError> {
    let (signal, rate) = read_input(input)?;

    let nyquist = rate as f64 / 2.0;
    if cli.pmax > nyquist {
        eprintln!("Max pitch > Nyquist ... max set to {nyquist:.2} Hz.");
    }

    let pitch = track::swipe(
        &signal,
        rate,
        cli.pmin,
        cli.pmax,
        cli.threshold,
        cli.timestep,
    )
    .map_err(|e| PairError::Soft(e.to_string()))?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| PairError::Soft(format!("cannot write {path}: {e}")))?;
            let mut sink = BufWriter::new(file);
            write_track(&mut sink, &pitch, cli.timestep, cli.mel, cli.keep_unvoiced)
                .and_then(|_| sink.flush())
                .map_err(|e| PairError::Hard(format!("write to {path} failed: {e}")))
        }
        None => {
            let stdout = std::io::stdout();
            let mut sink = stdout.lock();
            write_track(&mut sink, &pitch, cli.timestep, cli.mel, cli.keep_unvoiced)
                .map_err(|e| PairError::Hard(format!("write to stdout failed: {e}")))
        }
    }
}

fn run_batch(list: &str, cli: &Cli) -> ExitCode {
    let file = match File::open(list) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cannot open batch list {list}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("cannot read batch list {list}: {e}");
                return ExitCode::FAILURE;
            }
        };
        let mut fields = line.split_whitespace();
        let (input, output) = match (fields.next(), fields.next()) {
            (Some(i), Some(o)) => (i, o),
            (None, _) => continue, // blank line
            _ => {
                eprintln!("bad batch line `{line}`, expected \"INPUT OUTPUT\"");
                failed = true;
                continue;
            }
        };

        eprint!("{input} -> {output} ... ");
        match run_one(Some(input), Some(output), cli) {
            Ok(()) => eprintln!("done."),
            Err(PairError::Soft(msg)) => {
                eprintln!("failed: {msg}");
                failed = true;
            }
            Err(PairError::Hard(msg)) => {
                eprintln!("failed: {msg}");
                return ExitCode::FAILURE;
            }
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = match parse_args(&args) {
        Ok(Action::Run(cli)) => cli,
        Ok(Action::Help) => {
            eprint!("{SYNOPSIS}");
            return ExitCode::SUCCESS;
        }
        Ok(Action::Version) => {
            eprintln!("This is swipe, v. {}.", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprint!("{SYNOPSIS}");
            return ExitCode::FAILURE;
        }
    };

    if cli.pmin < 1.0 {
        eprintln!("Min pitch < 1 Hz, aborting.");
        return ExitCode::FAILURE;
    }
    if cli.pmax <= cli.pmin {
        eprintln!("Max pitch <= min pitch, aborting.");
        return ExitCode::FAILURE;
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        eprintln!("Strength must be 0 <= x <= 1, set to {DEFAULT_THRESHOLD:.3}.");
        cli.threshold = DEFAULT_THRESHOLD;
    }
    if cli.timestep < MIN_TIMESTEP {
        eprintln!("Timestep must be >= {MIN_TIMESTEP} (1 ms), set to {DEFAULT_TIMESTEP:.3}.");
        cli.timestep = DEFAULT_TIMESTEP;
    }

    if let Some(list) = cli.batch.clone() {
        return run_batch(&list, &cli);
    }

    match run_one(cli.input.as_deref(), cli.output.as_deref(), &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PairError::Soft(msg)) | Err(PairError::Hard(msg)) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let action = parse_args(&[]).unwrap();
        let cli = match action {
            Action::Run(cli) => cli,
            _ => panic!("expected run action"),
        };
        assert!(cli.input.is_none());
        assert_eq!(cli.pmin, DEFAULT_PMIN);
        assert_eq!(cli.pmax, DEFAULT_PMAX);
        assert!(cli.keep_unvoiced);
        assert!(!cli.mel);
    }

    #[test]
    fn test_parse_range_and_flags() {
        let action = parse_args(&args(&["-r", "75:500", "-s", "0.25", "-t", "0.01", "-nm"]))
            .unwrap();
        let cli = match action {
            Action::Run(cli) => cli,
            _ => panic!("expected run action"),
        };
        assert_eq!(cli.pmin, 75.0);
        assert_eq!(cli.pmax, 500.0);
        assert_eq!(cli.threshold, 0.25);
        assert_eq!(cli.timestep, 0.01);
        assert!(cli.mel);
        assert!(!cli.keep_unvoiced);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["-r", "600"])).is_err());
        assert!(parse_args(&args(&["-r"])).is_err());
        assert!(parse_args(&args(&["-x"])).is_err());
        assert!(parse_args(&args(&["stray"])).is_err());
    }

    #[test]
    fn test_parse_help_version() {
        assert!(matches!(parse_args(&args(&["-h"])), Ok(Action::Help)));
        assert!(matches!(parse_args(&args(&["-v"])), Ok(Action::Version)));
    }

    #[test]
    fn test_write_track_format() {
        let pitch = [250.0, f64::NAN, 252.5];
        let mut buf = Vec::new();
        write_track(&mut buf, &pitch, 0.01, false, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0.0000000 250.0000");
        assert!(lines[1].contains("NaN"));
        assert_eq!(lines[2], "0.0200000 252.5000");
    }

    #[test]
    fn test_write_track_skips_unvoiced() {
        let pitch = [250.0, f64::NAN, 252.5];
        let mut buf = Vec::new();
        write_track(&mut buf, &pitch, 0.01, false, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // Unvoiced frame dropped, but time still advances past it
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "0.0200000 252.5000");
    }
}
