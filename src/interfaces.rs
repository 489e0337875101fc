use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate,
    Check,
    PrintContract,
}

/// Parsed command line. Store paths default at a higher level so `check`
/// can report exactly which inputs were left unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub image_path: Option<PathBuf>,
    pub tasks_path: Option<PathBuf>,
    pub notes_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub now: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliParseError {
    UnknownArgument(String),
    MissingValue(&'static str),
    UnknownCommand(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownArgument(argument) => write!(f, "unknown argument: {argument}"),
            Self::MissingValue(flag) => write!(f, "missing value for {flag}"),
            Self::UnknownCommand(command) => write!(f, "unknown command: {command}"),
        }
    }
}

impl std::error::Error for CliParseError {}

impl Default for Cli {
    fn default() -> Self {
        Self {
            command: Command::Generate,
            image_path: None,
            tasks_path: None,
            notes_path: None,
            settings_path: None,
            output_path: None,
            now: None,
        }
    }
}

impl Cli {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, CliParseError> {
        let mut cli = Cli::default();
        let mut iter = args.into_iter().peekable();

        if let Some(candidate) = iter.peek() {
            match candidate.as_str() {
                "generate" => {
                    cli.command = Command::Generate;
                    iter.next();
                }
                "check" => {
                    cli.command = Command::Check;
                    iter.next();
                }
                "contract" => {
                    cli.command = Command::PrintContract;
                    iter.next();
                }
                option if option.starts_with('-') => {}
                _ => return Err(CliParseError::UnknownCommand(candidate.clone())),
            }
        }

        while let Some(argument) = iter.next() {
            match argument.as_str() {
                "--image" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--image"));
                    };
                    cli.image_path = Some(PathBuf::from(value));
                }
                "--tasks" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--tasks"));
                    };
                    cli.tasks_path = Some(PathBuf::from(value));
                }
                "--notes" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--notes"));
                    };
                    cli.notes_path = Some(PathBuf::from(value));
                }
                "--settings" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--settings"));
                    };
                    cli.settings_path = Some(PathBuf::from(value));
                }
                "--output" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--output"));
                    };
                    cli.output_path = Some(PathBuf::from(value));
                }
                "--now" => {
                    let Some(value) = iter.next() else {
                        return Err(CliParseError::MissingValue("--now"));
                    };
                    cli.now = Some(value);
                }
                _ => return Err(CliParseError::UnknownArgument(argument)),
            }
        }

        Ok(cli)
    }
}

pub fn command_contract_json() -> serde_json::Value {
    serde_json::json!({
        "commands": {
            "generate": {
                "description": "Render the wallpaper composite and save it as a PNG.",
                "flags": [
                    "--image <path>", "--tasks <path>", "--notes <path>",
                    "--settings <path>", "--output <path>",
                    "--now <YYYY-MM-DDTHH:MM:SS>"
                ]
            },
            "check": {
                "description": "Validate that the base image and JSON stores can be loaded.",
                "flags": ["--image <path>", "--tasks <path>", "--notes <path>", "--settings <path>"]
            },
            "contract": {
                "description": "Print the CLI/event contract as JSON.",
                "flags": []
            }
        },
        "events": {
            "render:start": {"level": "info"},
            "render:widget": {"level": "info"},
            "render:saved": {"level": "info"},
            "render:failed": {"level": "error"},
            "font:fallback": {"level": "warn"}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_command_and_flags() {
        let cli = Cli::parse(vec![
            "generate".to_string(),
            "--image".to_string(),
            "./beach.jpg".to_string(),
            "--output".to_string(),
            "./out.png".to_string(),
            "--now".to_string(),
            "2024-06-10T09:05:00".to_string(),
        ])
        .expect("cli should parse");

        assert_eq!(cli.command, Command::Generate);
        assert_eq!(cli.image_path, Some(PathBuf::from("./beach.jpg")));
        assert_eq!(cli.output_path, Some(PathBuf::from("./out.png")));
        assert_eq!(cli.now.as_deref(), Some("2024-06-10T09:05:00"));
    }

    #[test]
    fn bare_flags_default_to_generate() {
        let cli = Cli::parse(vec!["--image".to_string(), "photo.png".to_string()])
            .expect("cli should parse");
        assert_eq!(cli.command, Command::Generate);
        assert_eq!(cli.image_path, Some(PathBuf::from("photo.png")));
    }

    #[test]
    fn fails_on_unknown_command() {
        let error = Cli::parse(vec!["preview".to_string()]).expect_err("must fail");
        assert_eq!(error, CliParseError::UnknownCommand("preview".to_string()));
    }

    #[test]
    fn fails_on_flag_without_value() {
        let error = Cli::parse(vec!["--tasks".to_string()]).expect_err("must fail");
        assert_eq!(error, CliParseError::MissingValue("--tasks"));
    }
}
