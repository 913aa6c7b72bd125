// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chess_registration::{
    export, read_log, submit, Config, ExperienceLevel, ExportFormat, LogFileSink,
    RegistrationInput,
};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "chess-registration", version)]
#[command(about = "Chess tournament registration form and log tools")]
struct Cli {
    /// Registration log (default: $CHESS_REGISTRATION_LOG or ./chess_registrations.txt)
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive registration form (default)
    Form,
    /// Register without the form
    Register(RegisterArgs),
    /// Show every registration in the log
    List,
    /// Export the log as csv or json (stdout when OUT is omitted)
    Export {
        format: ExportFormat,
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long, value_parser = single_line)]
    name: Option<String>,
    #[arg(long, value_parser = single_line)]
    email: Option<String>,
    #[arg(long, value_parser = single_line)]
    phone: Option<String>,
    #[arg(long, value_parser = single_line)]
    age: Option<String>,
    #[arg(long, value_parser = single_line)]
    rating: Option<String>,
    #[arg(long, default_value = "Beginner")]
    experience: ExperienceLevel,
    #[arg(long, value_parser = single_line)]
    category: Option<String>,
    #[arg(long, value_parser = single_line)]
    emergency_contact: Option<String>,
    /// May span several lines
    #[arg(long)]
    notes: Option<String>,
}

impl RegisterArgs {
    /// Missing options become empty fields so validation reports them
    fn into_input(self) -> RegistrationInput {
        RegistrationInput {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            age_text: self.age.unwrap_or_default(),
            rating_text: self.rating.unwrap_or_default(),
            experience_level: self.experience,
            category: self.category.unwrap_or_default(),
            emergency_contact: self.emergency_contact.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        }
    }
}

/// Only notes may hold line breaks; any other field would split its log line
fn single_line(value: &str) -> std::result::Result<String, String> {
    if value.contains(['\n', '\r']) {
        Err("line breaks are only allowed in --notes".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.log);

    match cli.command.unwrap_or(Command::Form) {
        Command::Form => {
            init_logging("off");
            run_ui_mode(&config)?;
        }
        Command::Register(args) => {
            init_logging("warn");
            run_register(&config, args.into_input())?;
        }
        Command::List => {
            init_logging("warn");
            run_list(&config)?;
        }
        Command::Export { format, out } => {
            init_logging("warn");
            run_export(&config, format, out)?;
        }
    }

    Ok(())
}

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn run_register(config: &Config, input: RegistrationInput) -> Result<()> {
    let mut sink = LogFileSink::new(&config.log_path);

    let submission = match submit(&input, &mut sink) {
        Ok(submission) => submission,
        Err(err) => {
            eprintln!("❌ Validation Error: {}", err);
            process::exit(1);
        }
    };

    println!("{}", submission.record.confirmation_message());
    println!();

    match submission.persisted {
        Ok(()) => {
            println!(
                "✓ Registration data has been saved to {}",
                config.log_path.display()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("⚠️  Could not save to file: {}", err);
            process::exit(2);
        }
    }
}

fn run_list(config: &Config) -> Result<()> {
    let records = read_log(&config.log_path)
        .with_context(|| format!("Failed to read {}", config.log_path.display()))?;

    println!("📋 {} registration(s) in {}", records.len(), config.log_path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>3}. {:<25} {:<14} {:<13} age {:<4} {}  ({})",
            i + 1,
            record.name,
            record.category,
            record.experience_level,
            record.age,
            record.rating,
            record.formatted_date(),
        );
    }

    Ok(())
}

fn run_export(config: &Config, format: ExportFormat, out: Option<PathBuf>) -> Result<()> {
    let records = read_log(&config.log_path)
        .with_context(|| format!("Failed to read {}", config.log_path.display()))?;

    match out {
        Some(out) => {
            let file = File::create(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            export(&records, format, BufWriter::new(file))?;
            eprintln!("✓ Exported {} registration(s) to {}", records.len(), out.display());
        }
        None => export(&records, format, io::stdout().lock())?,
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let sink = LogFileSink::new(&config.log_path);
    let mut app = ui::App::new(Box::new(sink));
    ui::run_ui(&mut app)?;

    println!(
        "\n✅ Form closed - {} registration(s) this session",
        app.registered_count
    );

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ Form mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or register directly: chess-registration register --name ...");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("chess-registration").chain(args.iter().copied()))
    }

    fn register_input(args: &[&str]) -> RegistrationInput {
        match parse(args).unwrap().command {
            Some(Command::Register(register)) => register.into_input(),
            other => panic!("expected register, got {:?}", other),
        }
    }

    #[test]
    fn test_no_command_means_form() {
        let cli = parse(&[]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log.is_none());
    }

    #[test]
    fn test_global_log_option() {
        let cli = parse(&["list", "--log", "other.txt"]).unwrap();
        assert_eq!(cli.log, Some(PathBuf::from("other.txt")));
        assert!(matches!(cli.command, Some(Command::List)));

        let cli = parse(&["--log", "other.txt", "list"]).unwrap();
        assert_eq!(cli.log, Some(PathBuf::from("other.txt")));

        assert!(parse(&["list", "--log"]).is_err());
    }

    #[test]
    fn test_log_as_option_value_is_not_global() {
        let cli = parse(&["register", "--notes=--log", "--name", "Ada"]).unwrap();
        assert!(cli.log.is_none());

        let input = register_input(&["register", "--notes=--log"]);
        assert_eq!(input.notes, "--log");
    }

    #[test]
    fn test_register_args() {
        let input = register_input(&[
            "register",
            "--name", "Ada Lovelace",
            "--email", "ada@example.com",
            "--phone", "555-1234",
            "--age", "30",
            "--experience", "Advanced",
            "--category", "Open",
        ]);
        assert_eq!(input.name, "Ada Lovelace");
        assert_eq!(input.age_text, "30");
        assert_eq!(input.experience_level, ExperienceLevel::Advanced);
        assert_eq!(input.category, "Open");
        assert!(input.rating_text.is_empty());
    }

    #[test]
    fn test_register_missing_fields_left_for_validation() {
        let input = register_input(&["register"]);
        assert_eq!(input, RegistrationInput::default());
    }

    #[test]
    fn test_register_rejects_unknown_options() {
        assert!(parse(&["register", "--nickname", "Ada"]).is_err());
        assert!(parse(&["register", "--name"]).is_err());
        assert!(parse(&["register", "--experience", "Grandmaster"]).is_err());
    }

    #[test]
    fn test_line_breaks_only_in_notes() {
        assert!(parse(&["register", "--name", "Ada\nEmail: evil@x.y"]).is_err());
        assert!(parse(&["register", "--phone", "555\r1234"]).is_err());
        assert!(parse(&["register", "--emergency-contact", "Bob\n555"]).is_err());

        let input = register_input(&["register", "--notes", "Quiet table\nArrives late"]);
        assert_eq!(input.notes, "Quiet table\nArrives late");
    }

    #[test]
    fn test_export_args() {
        match parse(&["export", "csv", "out.csv"]).unwrap().command {
            Some(Command::Export { format, out }) => {
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(out, Some(PathBuf::from("out.csv")));
            }
            other => panic!("expected export, got {:?}", other),
        }
        assert!(parse(&["export", "xml"]).is_err());
    }
}
