use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use icoforge::{ConvertOptions, FrameEncoding, IconDir};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::process;

//===========================================================================//

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();
    let matches = App::new("icoconvert")
        .version("0.1")
        .about("Converts images into multi-resolution ICO files")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("convert")
                .about("Creates an ICO file from a PNG, BMP or ICO image")
                .arg(Arg::with_name("source").required(true))
                .arg(Arg::with_name("destination").required(true))
                .arg(
                    Arg::with_name("sizes")
                        .multiple(true)
                        .help(
                            "Icon sizes in pixels \
                             (default: 16 32 48 64 128 256)",
                        ),
                )
                .arg(
                    Arg::with_name("bmp")
                        .long("bmp")
                        .help("Stores frames as BMP data instead of PNG"),
                )
                .arg(
                    Arg::with_name("serial")
                        .long("serial")
                        .help("Renders one size at a time"),
                )
                .arg(
                    Arg::with_name("threads")
                        .takes_value(true)
                        .value_name("N")
                        .long("threads")
                        .help("Renders sizes on a pool of N threads"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists icons in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = match matches.subcommand() {
        ("convert", Some(submatches)) => convert(submatches),
        ("list", Some(submatches)) => list(submatches),
        _ => Ok(()),
    };
    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn convert(matches: &ArgMatches) -> Result<(), String> {
    let mut options = ConvertOptions::default();
    if let Some(values) = matches.values_of("sizes") {
        let mut sizes = Vec::new();
        for value in values {
            let size = value
                .parse::<i64>()
                .map_err(|_| format!("size: {:?} is not a number", value))?;
            sizes.push(size);
        }
        options = options.with_sizes(sizes).map_err(|e| e.to_string())?;
    }
    if matches.is_present("bmp") {
        options = options.with_encoding(FrameEncoding::Bmp);
    }
    if matches.is_present("serial") {
        options = options.with_parallel(false);
    }
    if let Some(value) = matches.value_of("threads") {
        let threads = value
            .parse::<NonZeroUsize>()
            .map_err(|_| format!("invalid thread count {:?}", value))?;
        options = options.with_threads(threads);
    }
    let source = Path::new(matches.value_of("source").unwrap_or_default());
    let destination =
        Path::new(matches.value_of("destination").unwrap_or_default());
    let conversion = icoforge::convert_file(source, destination, &options)
        .map_err(|e| e.to_string())?;
    let sizes: Vec<String> =
        conversion.sizes.iter().map(|size| size.to_string()).collect();
    println!(
        "Wrote {} ({} bytes): {}",
        destination.display(),
        conversion.bytes_written,
        sizes.join(", ")
    );
    Ok(())
}

fn list(matches: &ArgMatches) -> Result<(), String> {
    let path = matches.value_of("ico").unwrap_or_default();
    let data = fs::read(path).map_err(|e| format!("input: {}: {}", path, e))?;
    let icondir = IconDir::read(std::io::Cursor::new(data))
        .map_err(|e| e.to_string())?;
    for (index, entry) in icondir.entries().iter().enumerate() {
        let kind = if entry.is_png() { "PNG" } else { "BMP" };
        println!(
            "{:5}: {}x{} {}, {} bpp, {} bytes at offset {}",
            index,
            entry.width(),
            entry.height(),
            kind,
            entry.bits_per_pixel(),
            entry.data().len(),
            entry.data_offset()
        );
    }
    Ok(())
}

//===========================================================================//
