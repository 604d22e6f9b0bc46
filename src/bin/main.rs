use crossterm::style::Stylize;
use noisy_speller::persistence::{load_models, save_models, ModelBundle};
use noisy_speller::training::{train_channel_from_file, train_prior_from_dir};
use noisy_speller::{CorrectorConfig, SpellCorrector};
use std::env;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: spell_repl [--config cfg.json] \
(--model models.bin | --corpus DIR --edits FILE [--save models.bin])";
const SUGGESTIONS_SHOWN: usize = 3;

enum ModelSource {
    Saved(PathBuf),
    Train {
        corpus: PathBuf,
        edits: PathBuf,
        save: Option<PathBuf>,
    },
}

struct Args {
    config: Option<PathBuf>,
    source: ModelSource,
}

fn parse_args() -> Result<Args, String> {
    let mut config = None;
    let mut model = None;
    let mut corpus = None;
    let mut edits = None;
    let mut save = None;

    let mut raw = env::args().skip(1);
    while let Some(flag) = raw.next() {
        let slot = match flag.as_str() {
            "--config" => &mut config,
            "--model" => &mut model,
            "--corpus" => &mut corpus,
            "--edits" => &mut edits,
            "--save" => &mut save,
            other => return Err(format!("unknown argument {other:?}")),
        };
        let value = raw.next().ok_or_else(|| format!("{flag} needs a value"))?;
        *slot = Some(PathBuf::from(value));
    }

    let source = match (model, corpus, edits) {
        (Some(model), None, None) => ModelSource::Saved(model),
        (None, Some(corpus), Some(edits)) => ModelSource::Train {
            corpus,
            edits,
            save,
        },
        _ => return Err("pass either --model or both --corpus and --edits".to_string()),
    };
    Ok(Args { config, source })
}

fn build_corrector(args: &Args) -> noisy_speller::Result<SpellCorrector> {
    let config = match &args.config {
        Some(path) => CorrectorConfig::from_json_file(path)?,
        None => CorrectorConfig::default(),
    };

    let bundle = match &args.source {
        ModelSource::Saved(path) => load_models(path)?,
        ModelSource::Train {
            corpus,
            edits,
            save,
        } => {
            let bundle = ModelBundle {
                prior: train_prior_from_dir(corpus, config.lambda)?,
                statistics: train_channel_from_file(edits)?,
            };
            if let Some(path) = save {
                save_models(&bundle, path)?;
            }
            bundle
        }
    };
    SpellCorrector::from_bundle(bundle, config)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let corrector = match build_corrector(&args) {
        Ok(corrector) => corrector,
        Err(e) => {
            eprintln!("[ERROR] Could not prepare the models: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Noisy-channel spelling corrector. Type a query, ':q' to quit.");
    println!("---------------------------------------------------------------");

    let mut input = String::new();
    loop {
        print!("> ");
        if stdout().flush().is_err() {
            break;
        }
        input.clear();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let query = input.trim_end_matches(['\r', '\n']);
        if query.trim() == ":q" {
            break;
        }
        print_correction(&corrector, query);
    }
    ExitCode::SUCCESS
}

fn print_correction(corrector: &SpellCorrector, query: &str) {
    let corrected = corrector.correct(query);
    if corrected == query {
        println!("  {}", corrected.as_str().green());
        return;
    }
    println!("  {} -> {}", query.dark_grey(), corrected.as_str().yellow().bold());

    let ranked = corrector.ranked(query, SUGGESTIONS_SHOWN);
    for (i, candidate) in ranked.iter().enumerate().skip(1) {
        println!(
            "    :{}: {} (score: {:.3}, {:?})",
            i + 1,
            candidate.query,
            candidate.score,
            candidate.path
        );
    }
}
