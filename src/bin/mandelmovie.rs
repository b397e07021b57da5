extern crate clap;
extern crate mandelzoom;

use clap::{App, AppSettings, Arg, ArgMatches};
use mandelzoom::{FrameScheduler, MovieConfig};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    // Every option has a default and a validator, so this cannot fail.
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => unreachable!("{} was validated by clap", name),
    }
}

fn path(matches: &ArgMatches, name: &str) -> PathBuf {
    // Paths are taken as given, even when they are not valid UTF-8.
    match matches.value_of_os(name) {
        Some(p) => PathBuf::from(p),
        None => unreachable!("{} has a default", name),
    }
}

const JOBS: &str = "jobs";
const XCENTER: &str = "xcenter";
const YCENTER: &str = "ycenter";
const SCALE: &str = "scale";
const FRAMES: &str = "frames";
const ZOOM: &str = "zoom";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const DIRECTORY: &str = "directory";
const EXTENSION: &str = "extension";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelmovie")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a Mandelbrot zoom as a numbered sequence of images")
        .setting(AppSettings::AllowNegativeNumbers)
        .after_help("Frames are named frame_00.<ext>, frame_01.<ext>, ... in the output directory.")
        .arg(
            Arg::with_name(JOBS)
                .short("n")
                .takes_value(true)
                .default_value("4")
                .validator(|s| validate_number::<usize>(&s, "Could not parse job count"))
                .help("Max number of frames rendered concurrently"),
        )
        .arg(
            Arg::with_name(XCENTER)
                .short("x")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse x coordinate"))
                .help("X coordinate of Mandelbrot center"),
        )
        .arg(
            Arg::with_name(YCENTER)
                .short("y")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse y coordinate"))
                .help("Y coordinate of Mandelbrot center"),
        )
        .arg(
            Arg::with_name(SCALE)
                .short("s")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("4.0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse scale"))
                .help("Initial zoom scale"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("50")
                .validator(|s| validate_number::<usize>(&s, "Could not parse frame count"))
                .help("Number of frames"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .short("z")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.02")
                .validator(|s| validate_number::<f64>(&s, "Could not parse zoom factor"))
                .help("Fraction of the initial scale removed per frame"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .short("W")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image width"))
                .help("Width of each frame in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .short("H")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image height"))
                .help("Height of each frame in pixels"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .short("m")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("The maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_number::<usize>(&s, "Could not parse thread count"))
                .help("Render threads per frame (clamped to 1-20)"),
        )
        .arg(
            Arg::with_name(DIRECTORY)
                .short("d")
                .takes_value(true)
                .default_value(".")
                .help("Directory the frames are written to"),
        )
        .arg(
            Arg::with_name(EXTENSION)
                .short("e")
                .takes_value(true)
                .default_value("jpg")
                .help("Image format extension"),
        )
        .get_matches()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    let config = MovieConfig {
        center: Complex::new(value(&matches, XCENTER), value(&matches, YCENTER)),
        initial_scale: value(&matches, SCALE),
        frames: value(&matches, FRAMES),
        zoom: value(&matches, ZOOM),
        width: value(&matches, WIDTH),
        height: value(&matches, HEIGHT),
        max_iterations: value(&matches, ITERATIONS),
        threads: value(&matches, THREADS),
        max_jobs: value(&matches, JOBS),
        output_dir: path(&matches, DIRECTORY),
        extension: value(&matches, EXTENSION),
    };

    let report = FrameScheduler::new(config).and_then(|scheduler| scheduler.run());
    match report {
        Err(e) => {
            eprintln!("Movie failure: {}", e);
            std::process::exit(1);
        }
        Ok(report) => {
            if !report.is_success() {
                for failure in &report.failures {
                    eprintln!("{}", failure);
                }
                std::process::exit(1);
            }
        }
    }
}
