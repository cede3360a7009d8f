use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use mdnize_cli::Commands;
use mdnize_cli::MdnizeCli;
use mdnize_core::CommentSyntaxTable;
use mdnize_core::DEFAULT_DEST;
use mdnize_core::DEFAULT_TARGET;
use mdnize_core::DiagnosticSink;
use mdnize_core::HeaderMode;
use mdnize_core::MdnizeConfig;
use mdnize_core::MdnizeError;
use mdnize_core::MdnizeOptions;
use mdnize_core::MergeOutcome;
use mdnize_core::NoopSink;
use mdnize_core::TracingSink;
use mdnize_core::compute;
use mdnize_core::ensure_placeholder;
use mdnize_core::write_outcome;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# mdnize configuration\n\n# File or directory to scan, relative to \
                             this file.\n# target = \".\"\n\n# Markdown document to merge \
                             into.\n# dest = \"README.md\"\n\n# Fragment markers. These are \
                             regular expression fragments.\n# start_symbol = \"md:\"\n# \
                             end_symbol = \":md\"\n\n# Section header above each file: true \
                             (\"## path\"), false (\"<!-- path -->\") or a custom prefix.\n# \
                             header = true\n\n# Extra line comment tokens per file \
                             extension.\n# [comments]\n# vue = [\"//\"]\n\n# Gitignore style \
                             patterns skipped during the walk.\n# [exclude]\n# patterns = \
                             [\"vendor/\"]\n";

/// Everything a command needs once flags and config are combined.
struct Settings {
	root: PathBuf,
	target: PathBuf,
	dest: PathBuf,
	options: MdnizeOptions,
}

fn main() {
	let args = MdnizeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = resolve_settings(&args).and_then(|settings| {
		init_logging(settings.options.verbose);
		run_command(args.command.as_ref(), &settings)
	});

	if let Err(e) = result {
		match e.downcast::<MdnizeError>() {
			Ok(mdnize_err) => {
				let report: miette::Report = (*mdnize_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn run_command(
	command: Option<&Commands>,
	settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
	match command {
		Some(Commands::Init) => run_init(settings),
		Some(Commands::Check { diff }) => run_check(settings, *diff),
		Some(Commands::Update { dry_run, watch }) => run_update(settings, *dry_run, *watch),
		None => {
			eprintln!("No subcommand specified. Run `mdnize --help` for usage.");
			process::exit(1);
		}
	}
}

/// Send core diagnostics to stderr. `RUST_LOG` takes precedence over
/// `--verbose`.
fn init_logging(verbose: bool) {
	let filter = if std::env::var_os("RUST_LOG").is_some() {
		EnvFilter::from_default_env()
	} else if verbose {
		EnvFilter::new("warn,mdnize_core=debug")
	} else {
		EnvFilter::new("warn")
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_target(false)
				.with_ansi(color_enabled())
				.with_writer(std::io::stderr),
		)
		.try_init()
		.ok();
}

fn resolve_root(args: &MdnizeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Combine the config file at the project root with command line flags.
/// Flags win.
fn resolve_settings(args: &MdnizeCli) -> Result<Settings, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = MdnizeConfig::load(&root)?;
	let mut options = MdnizeOptions::from_config(config.as_ref());

	if let Some(start_symbol) = &args.start_symbol {
		options.start_symbol.clone_from(start_symbol);
	}
	if let Some(end_symbol) = &args.end_symbol {
		options.end_symbol.clone_from(end_symbol);
	}
	if let Some(header) = &args.header {
		options.header = HeaderMode::from_flag(header);
	}
	options.verbose |= args.verbose;

	let target = args
		.target
		.as_deref()
		.or_else(|| config.as_ref().map(MdnizeConfig::target))
		.unwrap_or_else(|| Path::new(DEFAULT_TARGET));
	let dest = args
		.dest
		.as_deref()
		.or_else(|| config.as_ref().map(MdnizeConfig::dest))
		.unwrap_or_else(|| Path::new(DEFAULT_DEST));

	Ok(Settings {
		target: root.join(target),
		dest: root.join(dest),
		root,
		options,
	})
}

fn compute_outcome(settings: &Settings) -> Result<MergeOutcome, Box<dyn std::error::Error>> {
	let syntax = CommentSyntaxTable::new(&settings.options.comment_overrides);
	let sink: &dyn DiagnosticSink = if settings.options.verbose {
		&TracingSink
	} else {
		&NoopSink
	};

	Ok(compute(
		&settings.target,
		&settings.dest,
		&settings.options,
		&syntax,
		sink,
	)?)
}

fn run_init(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
	if let Some(config_path) = MdnizeConfig::resolve_path(&settings.root) {
		println!("Config file already exists: {}", config_path.display());
	} else {
		std::fs::write(settings.root.join("mdnize.toml"), SAMPLE_CONFIG)?;
		println!("Created mdnize.toml");
	}

	let dest_display = make_relative(&settings.dest, &settings.root);
	let current = match std::fs::read_to_string(&settings.dest) {
		Ok(content) => Some(content),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
		Err(e) => return Err(e.into()),
	};
	let scaffolded = ensure_placeholder(current.as_deref().unwrap_or_default());

	match current {
		None => {
			std::fs::write(&settings.dest, &scaffolded)?;
			println!("Created {dest_display}");
		}
		Some(content) if content != scaffolded => {
			std::fs::write(&settings.dest, &scaffolded)?;
			println!("Added a placeholder to {dest_display}");
		}
		Some(_) => {
			println!("{dest_display} already has a placeholder");
		}
	}

	println!();
	println!("Next steps:");
	println!("  1. Document your code between comment markers:");
	println!("     // md:");
	println!("     // # My module");
	println!("     // :md");
	println!("  2. Run `mdnize update` to merge it into {dest_display}");

	Ok(())
}

fn run_check(settings: &Settings, show_diff: bool) -> Result<(), Box<dyn std::error::Error>> {
	let outcome = compute_outcome(settings)?;
	let dest_display = make_relative(&settings.dest, &settings.root);

	if !outcome.is_changed() {
		println!("{dest_display} is up to date.");
		return Ok(());
	}

	eprintln!(
		"{} {dest_display} is out of date. Run `mdnize update` to refresh it.",
		colored!("stale:", yellow)
	);

	if show_diff {
		print_diff(outcome.previous.as_deref().unwrap_or_default(), &outcome.merged);
	}

	process::exit(1);
}

fn run_update(
	settings: &Settings,
	dry_run: bool,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	run_update_once(settings, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_)
						| notify::EventKind::Create(_)
						| notify::EventKind::Remove(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&settings.root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, updating...");
		if let Err(e) = run_update_once(settings, false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_update_once(settings: &Settings, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let outcome = compute_outcome(settings)?;
	let dest_display = make_relative(&settings.dest, &settings.root);

	if !outcome.is_changed() {
		println!("{dest_display} is already up to date.");
		return Ok(());
	}

	if dry_run {
		println!(
			"Dry run: would update {dest_display} with {} file(s).",
			outcome.leaf_count
		);
		return Ok(());
	}

	write_outcome(&outcome)?;
	println!(
		"{} {dest_display} with {} file(s).",
		colored!("Updated", green),
		outcome.leaf_count
	);

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
	eprintln!();
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
