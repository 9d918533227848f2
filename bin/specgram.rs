use specgram::audio;
use specgram::params::Parameters;
use specgram::plot;
use specgram::Result;

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, Command};
use log::{debug, info};


fn app() -> Command<'static> {
    Command::new("Plot the spectrogram of an audio file")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .arg(Arg::new("input")
                .help("The audio file to analyze (wav, flac, mp3, ogg, ...)")
                .value_name("INPUT")
                .value_parser(value_parser!(PathBuf))
                .required(true))
        .arg(Arg::new("params")
                .help("The parameters to use (as yaml file)")
                .value_name("PARAMS")
                .short('p')
                .long("params")
                .takes_value(true)
                .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("no-show")
                .help("Only print the shapes, do not open the plot window")
                .short('n')
                .long("no-show")
                .action(ArgAction::SetTrue))
}

fn run(path_in: &Path, path_params: Option<&Path>, show: bool) -> Result<()> {
    // load parameters
    let params = match path_params {
        Some(path) => Parameters::from_path(path)?,
        None => Parameters::default(),
    };
    debug!("parameters: {:?}", params);

    // load audio, downmixed, at its native rate
    let signal = audio::load(path_in)?;
    let samples = signal.samples.mapv(f64::from);

    // compute spectrogram
    let mut specgram = params.specgram.build::<f64>()?;
    let spectrogram = specgram.process(&samples, signal.sample_rate)?;

    for shape in spectrogram.shapes().iter() {
        println!("{}", shape);
    }

    // plot
    if show {
        info!("showing spectrogram");
        plot::show(&spectrogram, &params.display)?;
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = app().get_matches();
    let path_in     = matches.get_one::<PathBuf>("input").expect("required argument");
    let path_params = matches.get_one::<PathBuf>("params");
    let no_show     = matches.get_one::<bool>("no-show").copied().unwrap_or(false);

    if let Err(err) = run(path_in, path_params.map(PathBuf::as_path), !no_show) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
