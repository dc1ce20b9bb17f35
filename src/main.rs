// ficha-cadastro: Generate registration forms for a martial-arts academy

use chrono::Local;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ficha_cadastro::assets::{load_logo, load_signature};
use ficha_cadastro::cli::{parse_today, Args, FormInput};
use ficha_cadastro::{render_pdf, AppError, FocusTarget, Session};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if let AppError::Validation(errors) = &e {
            for (field, message) in errors {
                eprintln!("  {}: {}", field, message);
            }
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> Result<(), AppError> {
    // Parse reference date
    let today = parse_today(&args.today)?;

    // Load form values, flags override the input file
    let input = match &args.input {
        Some(path) => FormInput::load(path)?,
        None => FormInput::default(),
    }
    .merge_args(&args);

    let mut session = Session::new(today);
    for (field, value) in input.edits() {
        session.edit(field, value)?;
    }

    if let Some(path) = &args.signature {
        session.set_signature(load_signature(path)?)?;
    }

    let result = session.submit(|s| {
        let logo = load_logo(&args.logo)?;
        render_pdf(s.form(), s.signature(), &logo, Local::now().naive_local())
    });

    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}", e.user_message());
            if let AppError::Validation(_) = e {
                match session.focus() {
                    Some(FocusTarget::Field(field)) => eprintln!("→ Check field: {}", field),
                    Some(FocusTarget::ScrollToTop) => eprintln!("→ Review the form from the top"),
                    None => {}
                }
            }
            return Err(e);
        }
    };

    // Write PDF
    let path = match &args.output {
        Some(path) => {
            std::fs::write(path, &doc.bytes)?;
            path.clone()
        }
        None => {
            std::fs::create_dir_all(&args.output_dir)?;
            doc.save_to(&args.output_dir)?
        }
    };

    println!("✓ Generated: {}", path.display());
    println!("  Pages: {}", doc.page_count);

    Ok(())
}
