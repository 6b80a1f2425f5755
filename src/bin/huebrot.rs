extern crate clap;
extern crate env_logger;
extern crate huebrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use huebrot::jitter::JitterMode;
use huebrot::progress::{ConsoleProgress, Progress, Silent};
use huebrot::sink::{write_png, PngSink};
use huebrot::{render, RenderConfig, RenderError, Sweep, SweepConfig, Viewport};
use log::info;
use num::Complex;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ORIGIN: &str = "origin";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const THREADS: &str = "threads";
const GAMMA: &str = "gamma";
const JITTER: &str = "jitter";
const SEED: &str = "seed";
const QUIET: &str = "quiet";
const VERBOSE: &str = "verbose";
const SWEEP: &str = "sweep";
const MULTIPLIER: &str = "multiplier";
const STEP: &str = "step";
const MAX: &str = "max";
const REVERSE: &str = "reverse";
const COLOR_SWEEP: &str = "color-sweep";
const PREFIX: &str = "prefix";

fn app<'a, 'b>() -> App<'a, 'b> {
    let max_threads = num_cpus::get();

    App::new("huebrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Supersampled HSL Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("mandelbrot.png")
                .help("Output file, or output directory when sweeping"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x1024")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ORIGIN)
                .long(ORIGIN)
                .short("p")
                .takes_value(true)
                .default_value("-1,-1")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse origin"))
                .help("Complex coordinate of the image's first pixel"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .short("H")
                .takes_value(true)
                .default_value("0.08125")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse view height",
                        "View height must be positive",
                    )
                })
                .help("Extent of the view along the imaginary axis"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1024")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000000",
                    )
                })
                .help("Maximum iterations per sample"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 1000000",
                    )
                })
                .help("Jittered samples per pixel"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in renderer"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .long(GAMMA)
                .short("g")
                .help("Average samples in gamma space instead of linear light"),
        )
        .arg(
            Arg::with_name(JITTER)
                .long(JITTER)
                .short("j")
                .takes_value(true)
                .default_value("random")
                .possible_values(&["random", "xorshift", "none", "center"])
                .help("Source of sub-pixel sample offsets"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .validator(|s| validate_number::<u64>(&s, "Could not parse seed"))
                .help("Seed for the jitter generators; random if absent"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Do not print render progress"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Log camera state and timings"),
        )
        .arg(
            Arg::with_name(SWEEP)
                .long(SWEEP)
                .help("Render a sequence of frames, pulling the camera back each step"),
        )
        .arg(
            Arg::with_name(MULTIPLIER)
                .long(MULTIPLIER)
                .takes_value(true)
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(|s| validate_number::<f64>(&s, "Could not parse multiplier"))
                .help("Starting value of the sweep multiplier"),
        )
        .arg(
            Arg::with_name(STEP)
                .long(STEP)
                .takes_value(true)
                .default_value("0.25")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse step",
                        "Step must be positive",
                    )
                })
                .help("Multiplier and camera step per frame"),
        )
        .arg(
            Arg::with_name(MAX)
                .long(MAX)
                .takes_value(true)
                .default_value("10")
                .allow_hyphen_values(true)
                .validator(|s| validate_number::<f64>(&s, "Could not parse maximum multiplier"))
                .help("Maximum value of the sweep multiplier"),
        )
        .arg(
            Arg::with_name(REVERSE)
                .long(REVERSE)
                .help("Sweep back to the starting camera after sweeping forward"),
        )
        .arg(
            Arg::with_name(COLOR_SWEEP)
                .long(COLOR_SWEEP)
                .help("Use the sweep multiplier to vary colour"),
        )
        .arg(
            Arg::with_name(PREFIX)
                .long(PREFIX)
                .takes_value(true)
                .help("Prefix for sweep frame names; the Unix time if absent"),
        )
}

fn args<'a>() -> ArgMatches<'a> {
    app().get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => Ok(v),
        _ => Err(RenderError::config(format!("Could not parse --{}", name))),
    }
}

fn render_config(matches: &ArgMatches) -> Result<(RenderConfig, Viewport), RenderError> {
    let (width, height): (u16, u16) =
        parse_pair(matches.value_of(SIZE).unwrap_or_default(), 'x')
            .ok_or_else(|| RenderError::config("Error parsing image dimensions"))?;
    let origin = parse_complex(matches.value_of(ORIGIN).unwrap_or_default())
        .ok_or_else(|| RenderError::config("Error parsing origin"))?;
    let (width, height) = (usize::from(width), usize::from(height));

    let config = RenderConfig {
        width,
        height,
        max_iterations: value(matches, ITERATIONS)?,
        samples: value(matches, SAMPLES)?,
        linear: !matches.is_present(GAMMA),
        color_sweep: matches.is_present(COLOR_SWEEP),
        sweep_factor: value(matches, MULTIPLIER)?,
        workers: value(matches, THREADS)?,
        jitter: value::<JitterMode>(matches, JITTER)?,
        seed: match matches.value_of(SEED) {
            Some(_) => value(matches, SEED)?,
            None => rand::random(),
        },
    };
    let viewport = Viewport::new(origin, value(matches, HEIGHT)?, width, height);
    Ok((config, viewport))
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let (config, viewport) = render_config(matches)?;
    let mut progress: Box<dyn Progress> = if matches.is_present(QUIET) {
        Box::new(Silent)
    } else {
        Box::new(ConsoleProgress::new())
    };
    let output = matches.value_of(OUTPUT).unwrap_or_default();

    if matches.is_present(SWEEP) {
        let sweep = SweepConfig {
            start: value(matches, MULTIPLIER)?,
            max: value(matches, MAX)?,
            step: value(matches, STEP)?,
            reverse: matches.is_present(REVERSE),
        };
        std::fs::create_dir_all(output).map_err(|e| RenderError::Sink {
            path: output.to_string(),
            reason: e.to_string(),
        })?;
        let mut sink = PngSink::new(output, matches.value_of(PREFIX).map(String::from));
        let frames = Sweep::new(viewport, sweep)?.run(&config, &mut sink, &mut *progress)?;
        info!("Wrote {} frames into {}", frames.len(), output);
    } else {
        info!("Rendering {}x{} with seed {}", config.width, config.height, config.seed);
        let fb = render(&viewport, &config, &mut *progress)?;
        write_png(Path::new(output), &fb)?;
    }
    Ok(())
}

fn main() {
    let matches = args();
    let level = if matches.is_present(VERBOSE) { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
