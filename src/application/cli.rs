use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::EncounterSummary;
use crate::infrastructure::api::ApiManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_encounter(encounter: &EncounterSummary) -> String {
    let mut res = format!("- (ID: {}) {}", encounter.id, encounter.status);

    if let Some(started_at) = &encounter.started_at {
        res = format!("{res}, {started_at}");
    }

    if let Some(triage_level) = &encounter.triage_level {
        res = format!("{res}, triage: {triage_level}");
    }

    if let Some(chief_complaint) = &encounter.chief_complaint {
        let mut line = chief_complaint.split('\n').collect::<Vec<_>>()[0].to_string();

        if line.chars().count() >= 70 {
            line = format!("{}...", line.chars().take(67).collect::<String>());
        }
        res = format!("{res}, {line}");
    }

    if encounter.needs_attention {
        res = format!("{res} {}", Paint::red("[要対応]").bold());
    }

    return res;
}

async fn print_encounters_list(status: Option<&String>) -> Result<()> {
    let api = ApiManager::get()?;
    let encounters = api
        .list_encounters(status.map(|e| return e.as_str()))
        .await?
        .iter()
        .map(|encounter| {
            return format_encounter(encounter);
        })
        .collect::<Vec<String>>();

    if encounters.is_empty() {
        println!("There are no encounters yet. Start your first one with 'monshin chat'.");
    } else {
        println!("{}", encounters.join("\n"));
    }

    return Ok(());
}

async fn create_encounter() -> Result<()> {
    let api = ApiManager::get()?;
    let chief_complaint = Config::get(ConfigKey::ChiefComplaint);
    let chief_complaint_opt = if chief_complaint.is_empty() {
        None
    } else {
        Some(chief_complaint.as_str())
    };

    let encounter_id = api.create_encounter(chief_complaint_opt).await?;
    println!("{encounter_id}");
    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Monshin")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Monshin with environment variable RUST_LOG=monshin")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_encounters() -> Command {
    return Command::new("encounters")
        .about("Inspect past and ongoing encounters on the server.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List encounters with their ids and statuses.")
                .arg(
                    clap::Arg::new("status")
                        .short('s')
                        .long("status")
                        .help("Only list encounters with the given status, e.g. 'active'.")
                        .num_args(1),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Open a new encounter and print its id.")
                .arg(arg_chief_complaint()),
        );
}

fn arg_encounter_id() -> Arg {
    return Arg::new(ConfigKey::EncounterId.to_string())
        .short('i')
        .long(ConfigKey::EncounterId.to_string())
        .env("MONSHIN_ENCOUNTER_ID")
        .num_args(1)
        .help("Resume an existing encounter instead of opening a new one.");
}

fn arg_chief_complaint() -> Arg {
    return Arg::new(ConfigKey::ChiefComplaint.to_string())
        .long(ConfigKey::ChiefComplaint.to_string())
        .env("MONSHIN_CHIEF_COMPLAINT")
        .num_args(1)
        .help("Chief complaint to open the encounter with.");
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Start an interview chat session.")
        .arg(arg_encounter_id())
        .arg(arg_chief_complaint());
}

pub fn build() -> Command {
    let hotkeys_text = format!(
        "{}\n- Enter: Submit the typed message.\n- Ctrl+E: End the encounter and review the clinical note.\n- Ctrl+C: Interrupt a streaming reply, or quit.\n- c/s (review): Copy the note, or save it to the notes directory.",
        Paint::new("CHAT HOTKEYS:").underline().bold()
    );

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("monshin")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_encounters())
        .arg(arg_encounter_id())
        .arg(arg_chief_complaint())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("MONSHIN_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ServerUrl.to_string())
                .short('u')
                .long(ConfigKey::ServerUrl.to_string())
                .env("MONSHIN_SERVER_URL")
                .num_args(1)
                .help(format!(
                    "Interview backend URL. [default: {}]",
                    Config::default(ConfigKey::ServerUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("MONSHIN_USERNAME")
                .num_args(1)
                .help("Your name as shown on patient chat bubbles.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::NotesDir.to_string())
                .long(ConfigKey::NotesDir.to_string())
                .env("MONSHIN_NOTES_DIR")
                .num_args(1)
                .help(format!(
                    "Directory where saved clinical notes land. [default: {}]",
                    Config::default(ConfigKey::NotesDir)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StreamTimeout.to_string())
                .long(ConfigKey::StreamTimeout.to_string())
                .env("MONSHIN_STREAM_TIMEOUT")
                .num_args(1)
                .help(format!(
                    "Time to wait in milliseconds for the next streamed token before giving up on a reply. [default: {}]",
                    Config::default(ConfigKey::StreamTimeout)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long(ConfigKey::HealthCheckTimeout.to_string())
                .env("MONSHIN_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!(
                    "Time to wait in milliseconds before timing out the startup healthcheck. [default: {}]",
                    Config::default(ConfigKey::HealthCheckTimeout)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir().unwrap().join("monshin/debug.log");
                    println!("{}", log_path.to_str().unwrap());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("encounters", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("list", list_matches)) => {
                Config::load(vec![&matches, list_matches]).await?;
                print_encounters_list(list_matches.get_one::<String>("status")).await?;
                return Ok(false);
            }
            Some(("new", new_matches)) => {
                Config::load(vec![&matches, new_matches]).await?;
                create_encounter().await?;
                return Ok(false);
            }
            _ => {
                subcommand_encounters().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
