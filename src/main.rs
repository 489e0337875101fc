use std::env;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use wallcal::compositor::{self, RenderRequest, OUTPUT_FILENAME};
use wallcal::config::WallpaperSettings;
use wallcal::interfaces::{command_contract_json, Cli, Command};
use wallcal::logging;
use wallcal::models::Task;
use wallcal::storage;

struct Inputs {
    image: PathBuf,
    tasks: Vec<Task>,
    notes: String,
    settings: WallpaperSettings,
}

fn load_inputs(cli: &Cli) -> Result<Inputs, String> {
    let Some(image) = cli.image_path.clone() else {
        return Err("--image <path> is required".to_string());
    };

    let tasks = cli
        .tasks_path
        .as_deref()
        .map(storage::load_tasks)
        .unwrap_or_default();
    let notes = cli
        .notes_path
        .as_deref()
        .map(storage::load_notes)
        .unwrap_or_default();
    let settings = cli
        .settings_path
        .as_deref()
        .map(storage::load_settings)
        .unwrap_or_default();

    Ok(Inputs {
        image,
        tasks,
        notes,
        settings,
    })
}

fn parse_now(cli: &Cli) -> Result<Option<NaiveDateTime>, String> {
    match &cli.now {
        None => Ok(None),
        Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .map(Some)
            .map_err(|err| format!("invalid --now value {raw:?}: {err}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse(env::args().skip(1).collect::<Vec<_>>())?;

    match cli.command {
        Command::PrintContract => {
            println!(
                "{}",
                serde_json::to_string_pretty(&command_contract_json())?
            );
            return Ok(());
        }
        Command::Check => {
            let inputs = load_inputs(&cli)?;
            image::image_dimensions(&inputs.image)
                .map_err(|err| format!("cannot read {}: {err}", inputs.image.display()))?;
            println!(
                "wallcal check: passed ({} tasks, {} note bytes)",
                inputs.tasks.len(),
                inputs.notes.len()
            );
            return Ok(());
        }
        Command::Generate => {}
    }

    let inputs = load_inputs(&cli)?;
    let now = parse_now(&cli)?;
    let output = cli.output_path.clone().unwrap_or_else(|| {
        inputs
            .image
            .parent()
            .map(|dir| dir.join(OUTPUT_FILENAME))
            .unwrap_or_else(|| PathBuf::from(OUTPUT_FILENAME))
    });

    let request = RenderRequest {
        base_image: &inputs.image,
        tasks: &inputs.tasks,
        notes: &inputs.notes,
        settings: &inputs.settings,
        output,
        now,
    };

    match compositor::generate(&request) {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(error) => {
            logging::log_event(serde_json::json!({
                "event": "render:failed",
                "error": error.to_string(),
            }));
            Err(error.into())
        }
    }
}
