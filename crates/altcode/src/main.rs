use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use altcode::{
    BackendKind, CancellationFlag, ComposeMode, FlutterMode, MarkupMode, RunConfig, SwiftUiMode,
};
use pico_args::Arguments;

const HELP: &str = "\
altcode converts a design-tool node tree into framework source code.

USAGE:
  altcode [OPTIONS] <input.json>    # from file
  altcode [OPTIONS] -               # from stdin

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information

  --backend BACKEND                 Sets the target framework
                                    [default: html]
                                    [possible values: html, tailwind, flutter,
                                    swiftui, compose]
  --mode MODE                       Sets the generation mode of the backend
                                    html, tailwind: html, jsx
                                    flutter: snippet, stateless, full-app
                                    swiftui: snippet, struct, preview
                                    compose: snippet, composable
  --config PATH                     Loads a JSON run configuration.
                                    Other options override its fields
  --no-vectors                      Emits icons as shapes instead of inline
                                    vector markup
  --no-variables                    Emits literal colors instead of variables
  --threshold PERCENT               Sets the nearest-palette color threshold
                                    [default: 5]
  --icon-size PX                    Sets the largest size at which shapes
                                    count as icons
                                    [default: 64]
  --layer-names                     Annotates the output with layer names
  --diagnostics                     Prints diagnostics to the stderr
  --palette                         Prints the palette summary to the stderr
  --quiet                           Disables log output

ARGS:
  <input.json>                      Input document
";

#[derive(Debug)]
struct Args {
    backend: Option<BackendKind>,
    mode: Option<String>,
    config: Option<PathBuf>,
    no_vectors: bool,
    no_variables: bool,
    threshold: Option<f64>,
    icon_size: Option<f64>,
    layer_names: bool,
    diagnostics: bool,
    palette: bool,
    quiet: bool,
    input: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        backend: input.opt_value_from_str("--backend")?,
        mode: input.opt_value_from_str("--mode")?,
        config: input.opt_value_from_str("--config")?,
        no_vectors: input.contains("--no-vectors"),
        no_variables: input.contains("--no-variables"),
        threshold: input.opt_value_from_fn("--threshold", parse_percent)?,
        icon_size: input.opt_value_from_fn("--icon-size", parse_size)?,
        layer_names: input.contains("--layer-names"),
        diagnostics: input.contains("--diagnostics"),
        palette: input.contains("--palette"),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
    })
}

fn parse_percent(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid number")?;

    if (0.0..=100.0).contains(&n) {
        Ok(n)
    } else {
        Err("threshold out of bounds".to_string())
    }
}

fn parse_size(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid number")?;

    if n > 0.0 {
        Ok(n)
    } else {
        Err("icon size must be positive".to_string())
    }
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

/// Run configuration from the `--config` file plus option overrides.
fn build_config(args: &Args) -> Result<RunConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
            RunConfig::from_json(&json).map_err(|e| format!("invalid config: {}", e))?
        }
        None => RunConfig::default(),
    };

    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(mode) = &args.mode {
        match config.backend {
            BackendKind::Html | BackendKind::Tailwind => {
                config.markup_mode = mode.parse::<MarkupMode>()?
            }
            BackendKind::Flutter => config.flutter_mode = mode.parse::<FlutterMode>()?,
            BackendKind::SwiftUi => config.swiftui_mode = mode.parse::<SwiftUiMode>()?,
            BackendKind::Compose => config.compose_mode = mode.parse::<ComposeMode>()?,
        }
    }
    if args.no_vectors {
        config.embed_vectors = false;
    }
    if args.no_variables {
        config.use_variables = false;
    }
    if let Some(threshold) = args.threshold {
        config.palette_threshold = threshold;
    }
    if let Some(size) = args.icon_size {
        config.icon_size_threshold = size;
    }
    if args.layer_names {
        config.show_layer_names = true;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), String> {
    let config = build_config(&args)?;

    let json = if args.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        buf
    } else {
        fs::read_to_string(&args.input).map_err(|e| format!("failed to read '{}': {}", args.input, e))?
    };

    let doc = altcode::parse_document(&json).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start the runtime: {}", e))?;
    let cancel = CancellationFlag::new();
    let output = runtime
        .block_on(altcode::convert_document(&doc, &config, &cancel))
        .map_err(|e| e.diagnostic().to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", output.code).map_err(|e| e.to_string())?;

    if args.diagnostics {
        for diagnostic in &output.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    if args.palette {
        for entry in &output.palette {
            match &entry.variable {
                Some(variable) => eprintln!("{:<10} {:>4}  {}", entry.hex, entry.occurrences, variable),
                None => eprintln!("{:<10} {:>4}", entry.hex, entry.occurrences),
            }
        }
    }

    Ok(())
}
