extern crate clap;
extern crate mandelzoom;

use clap::{App, AppSettings, Arg, ArgMatches};
use mandelzoom::output::write_image;
use mandelzoom::{render, RenderConfig};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
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

const XCENTER: &str = "xcenter";
const YCENTER: &str = "ycenter";
const SCALE: &str = "scale";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const OUTPUT: &str = "output";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders one Mandelbrot image")
        .setting(AppSettings::AllowNegativeNumbers)
        .after_help(
            "Some examples are:\n\
             mandel -x -0.5 -y -0.5 -s 0.2\n\
             mandel -x -.38 -y -.665 -s .05 -m 100\n\
             mandel -x 0.286932 -y 0.014287 -s .0005 -m 1000",
        )
        .arg(
            Arg::with_name(XCENTER)
                .short("x")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse x coordinate"))
                .help("X coordinate of image center point"),
        )
        .arg(
            Arg::with_name(YCENTER)
                .short("y")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse y coordinate"))
                .help("Y coordinate of image center point"),
        )
        .arg(
            Arg::with_name(SCALE)
                .short("s")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("4")
                .validator(|s| validate_number::<f64>(&s, "Could not parse scale"))
                .help("Scale of the image in Mandelbrot coordinates (X-axis)"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .short("W")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image width"))
                .help("Width of the image in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .short("H")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image height"))
                .help("Height of the image in pixels"),
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
                .help("Number of threads to use in solver (clamped to 1-20)"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("mandel.jpg")
                .help("Output file"),
        )
        .get_matches()
}

fn run(config: RenderConfig) -> mandelzoom::Result<()> {
    let config = config.validate()?;
    let viewport = config.viewport()?;
    info!(
        "mandel: x={} y={} xscale={} yscale={} max={} threads={} outfile={}",
        config.center.re,
        config.center.im,
        viewport.width(),
        viewport.height(),
        config.max_iterations,
        config.threads,
        config.output.display()
    );
    let pixels = render(
        &viewport,
        config.width,
        config.height,
        config.max_iterations,
        config.threads,
    )?;
    write_image(&config.output, &pixels)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    let config = RenderConfig {
        center: Complex::new(value(&matches, XCENTER), value(&matches, YCENTER)),
        scale: value(&matches, SCALE),
        width: value(&matches, WIDTH),
        height: value(&matches, HEIGHT),
        max_iterations: value(&matches, ITERATIONS),
        threads: value(&matches, THREADS),
        output: path(&matches, OUTPUT),
    };

    if let Err(e) = run(config) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
