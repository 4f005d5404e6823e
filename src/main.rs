//! Binary entrypoint for the sellgui development server.
//!
//! Commands:
//! - `start` - run the engine loop against an in-memory simulated world
//! - `init` - create a starter `config.toml`
//! - `status` - print stored configuration and recent activity
//!
//! The simulator stands in for the game host: it owns scoreboards,
//! inventories, and the player roster, renders forms to the terminal, and
//! feeds typed answers back into the engine. See the library crate docs
//! for module-level details: `sellgui::`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use sellgui::config::Config;
use sellgui::sell::{Effect, Field, FieldValue, FormResponse, FormSpec, SellGui, SellGuiStore};
use sellgui::sim::SimWorld;

#[derive(Parser)]
#[command(name = "sellgui")]
#[command(about = "Owner-configurable sell menus over a simulated game world")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sell GUI loop against a simulated world
    Start,
    /// Initialize a new configuration file
    Init,
    /// Show stored sell ids, permissions, and recent activity
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init, which
    // writes the default file later).
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting sellgui v{}", env!("CARGO_PKG_VERSION"));
            run_sim(config).await
        }
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote starter configuration to {}", cli.config);
            Ok(())
        }
        Commands::Status => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            show_status(&config)
        }
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity; config can lower the default only.
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if verbosity == 0 {
        if let Some(level) = config.as_ref().and_then(|c| c.logging.level.as_deref()) {
            if let Ok(parsed) = level.parse::<log::LevelFilter>() {
                builder.filter_level(parsed);
            }
        }
    }
    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new().create(true).append(true).open(&file) {
            let sink = std::sync::Arc::new(std::sync::Mutex::new(f));
            // On a TTY, mirror the file output to the console as well.
            let mirror_console = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = sink.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if mirror_console {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
    }
    let _ = builder.try_init();
}

/// A form the simulator has rendered but the "player" has not answered.
struct OpenForm {
    token: Uuid,
    player: String,
    form: FormSpec,
}

struct Simulator {
    store: SellGuiStore,
    gui: SellGui,
    world: SimWorld,
    forms: Vec<OpenForm>,
    settings_item: String,
    signal_objective: String,
}

impl Simulator {
    fn tick(&mut self) {
        let effects = self.gui.on_tick(&mut self.world);
        self.dispatch(effects);
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::ShowForm { player, token, form } => {
                    self.forms.push(OpenForm {
                        token: *token,
                        player: player.clone(),
                        form: form.clone(),
                    });
                    print_form(self.forms.len() - 1, player, form);
                }
                Effect::Message { player, text } => println!("[chat -> {}] {}", player, text),
                Effect::ClearItems { player, item_id, amount } => {
                    println!("[world] cleared {} x {} from {}", amount, item_id, player);
                    self.world.apply(&effect);
                }
                Effect::AddScore { player, objective, amount } => {
                    println!("[world] {} +{} on {}", player, amount, objective);
                    self.world.apply(&effect);
                }
            }
        }
    }

    /// Returns false when the simulator should exit.
    fn command(&mut self, line: &str) -> Result<bool> {
        // `answer` keeps the rest of the line verbatim so text fields can
        // contain spaces; everything else is whitespace-tokenized.
        if let Some(rest) = line.strip_prefix("answer ") {
            let mut parts = rest.trim().splitn(2, ' ');
            let index = parts.next().unwrap_or("");
            let values = parts.next().unwrap_or("");
            self.answer_form(index, Some(values));
            return Ok(true);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            ["help"] => print_help(),
            ["quit"] | ["exit"] => return Ok(false),
            ["join", id] => {
                self.world.join(id, id);
                println!("{} joined", id);
            }
            ["join", id, name] => {
                self.world.join(id, name);
                println!("{} ({}) joined", name, id);
            }
            ["obj", name] => {
                self.world.add_objective(name);
                println!("objective {} created", name);
            }
            ["delobj", name] => {
                self.world.remove_objective(name);
                println!("objective {} removed", name);
            }
            ["give", player, item, amount] => match amount.parse::<u32>() {
                Ok(amount) => {
                    self.world.give(player, item, amount);
                    println!("gave {} x {} to {}", amount, item, player);
                }
                Err(_) => println!("amount must be a number"),
            },
            ["use", player] => {
                let item = self.settings_item.clone();
                let effects = self.gui.on_item_use(player, &item);
                if effects.is_empty() {
                    println!("(nothing happens)");
                }
                self.dispatch(effects);
            }
            ["signal", player, id] => match id.parse::<i64>() {
                Ok(score) => {
                    let objective = self.signal_objective.clone();
                    self.world.set_score(&objective, player, score);
                    println!("{} signalled sell id {}; the next sweep picks it up", player, score);
                }
                Err(_) => println!("id must be a number"),
            },
            ["forms"] => {
                if self.forms.is_empty() {
                    println!("(no open forms)");
                }
                for (index, open) in self.forms.iter().enumerate() {
                    print_form(index, &open.player, &open.form);
                }
            }
            ["world"] => {
                for line in self.world.describe() {
                    println!("{}", line);
                }
            }
            ["cancel", index] => self.answer_form(index, None),
            _ => println!("unrecognized command; type 'help'"),
        }
        Ok(true)
    }

    fn answer_form(&mut self, index: &str, values: Option<&str>) {
        let Ok(index) = index.parse::<usize>() else {
            println!("form number must be a number");
            return;
        };
        if index >= self.forms.len() {
            println!("no such form");
            return;
        }
        let open = self.forms.remove(index);
        let response = match values {
            None => FormResponse::Cancelled,
            Some(raw) => match parse_response(&open.form, raw) {
                Some(response) => response,
                None => {
                    println!("answer does not match the form; it stays open");
                    self.forms.insert(index, open);
                    return;
                }
            },
        };
        match self.gui.resolve_form(&self.store, &self.world, open.token, response) {
            Ok(effects) => self.dispatch(effects),
            Err(err) => log::error!("form resolution failed: {}", err),
        }
    }
}

/// Turn a terminal answer into a typed form response. Action forms take a
/// button index; modal forms take one `|`-separated value per field.
fn parse_response(form: &FormSpec, raw: &str) -> Option<FormResponse> {
    match form {
        FormSpec::Action(_) => raw.trim().parse::<usize>().ok().map(FormResponse::Button),
        FormSpec::Modal(modal) => {
            let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
            if parts.len() != modal.fields.len() {
                return None;
            }
            let mut values = Vec::with_capacity(parts.len());
            for (field, part) in modal.fields.iter().zip(parts) {
                values.push(match field {
                    Field::Text { .. } => FieldValue::Text(part.to_string()),
                    Field::Dropdown { .. } => FieldValue::Index(part.parse().ok()?),
                    Field::Slider { .. } => FieldValue::Amount(part.parse().ok()?),
                });
            }
            Some(FormResponse::Submit(values))
        }
    }
}

fn print_form(index: usize, player: &str, form: &FormSpec) {
    match form {
        FormSpec::Action(action) => {
            println!("[form #{} -> {}] {}", index, player, action.title);
            if let Some(body) = &action.body {
                println!("    {}", body);
            }
            for (i, button) in action.buttons.iter().enumerate() {
                println!("    ({}) {}", i, button);
            }
            println!("    reply: answer {} <button#>  |  cancel {}", index, index);
        }
        FormSpec::Modal(modal) => {
            if modal.title.is_empty() {
                println!("[form #{} -> {}]", index, player);
            } else {
                println!("[form #{} -> {}] {}", index, player, modal.title);
            }
            for field in &modal.fields {
                match field {
                    Field::Text { label, placeholder, default } => {
                        let label = label.replace('\n', " / ");
                        match default {
                            Some(default) => {
                                println!("    text: {} [{}] (default: {})", label, placeholder, default)
                            }
                            None => println!("    text: {} [{}]", label, placeholder),
                        }
                    }
                    Field::Dropdown { label, options, default_index } => {
                        println!("    dropdown: {} {:?} (default index {})", label, options, default_index);
                    }
                    Field::Slider { label, min, max, step } => {
                        println!("    slider: {} [{}..{} step {}]", label, min, max, step);
                    }
                }
            }
            println!(
                "    reply: answer {} <v1> | <v2> | ...  (dropdowns by index)  |  cancel {}",
                index, index
            );
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  join <id> [name]          bring a player online");
    println!("  obj <name>                create a scoreboard objective");
    println!("  delobj <name>             remove a scoreboard objective");
    println!("  give <player> <item> <n>  add an inventory stack");
    println!("  use <player>              use the settings item");
    println!("  signal <player> <id>      request a sale (picked up next sweep)");
    println!("  forms                     list open forms");
    println!("  answer <form#> <values>   answer a form; separate modal values with |");
    println!("  cancel <form#>            dismiss a form");
    println!("  world                     show players, inventories, scores");
    println!("  quit                      exit");
}

async fn run_sim(config: Config) -> Result<()> {
    let store = SellGuiStore::open(&config.storage.data_dir)?;
    let gui = SellGui::load(
        &store,
        config.gui.settings_item.clone(),
        config.gui.signal_objective.clone(),
    )?;
    let mut sim = Simulator {
        store,
        gui,
        world: SimWorld::new(),
        forms: Vec::new(),
        settings_item: config.gui.settings_item.clone(),
        signal_objective: config.gui.signal_objective.clone(),
    };

    let mut ticker =
        tokio::time::interval(std::time::Duration::from_millis(config.gui.sweep_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("sellgui simulator - type 'help' for commands");
    loop {
        tokio::select! {
            _ = ticker.tick() => sim.tick(),
            line = lines.next_line() => {
                let Some(line) = line? else { break; };
                if !sim.command(line.trim())? {
                    break;
                }
            }
        }
    }
    info!("simulator stopped");
    Ok(())
}

fn show_status(config: &Config) -> Result<()> {
    let store = SellGuiStore::open(&config.storage.data_dir)?;
    let gui = SellGui::load(
        &store,
        config.gui.settings_item.clone(),
        config.gui.signal_objective.clone(),
    )?;
    match gui.permissions().owner() {
        Some(owner) => println!("Owner: {}", owner),
        None => println!("Owner: (unclaimed)"),
    }
    println!("Permitted players: {}", gui.permissions().players().len());
    println!("Configured sell ids: {}", gui.registry().len());
    for (id, entry) in gui.registry().iter() {
        println!(
            "  {:>6}  {}  ({} -> {} @ {})",
            id, entry.item_display_name, entry.item_id, entry.scoreboard, entry.value
        );
    }
    let audit = store.recent_audit(10)?;
    if !audit.is_empty() {
        println!("Recent activity:");
        for line in audit {
            println!("  {}", line);
        }
    }
    Ok(())
}
