use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use keymacro::bus::{load_event_script, KeyEventBus};
use keymacro::cli::CliArgs;
use keymacro::registry::{load_macro_file, KeyEvent, MacroAction, MacroRegistry};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keymacro::tracing::init("warn");

    let config = args.into_config().map_err(anyhow::Error::msg)?;
    tracing::debug!(?config, "Starting replay");

    let defs = load_macro_file(&config.macros_path)
        .with_context(|| format!("loading macros from {}", config.macros_path.display()))?;

    let bus = Rc::new(KeyEventBus::new());
    let registry = MacroRegistry::new(bus.clone(), config.registry);

    for def in defs {
        let id = def.id.clone();
        let label = def.description.clone().unwrap_or_default();
        let action = MacroAction::infallible(move || {
            if label.is_empty() {
                println!("  -> {}", id);
            } else {
                println!("  -> {} ({})", id, label);
            }
        });
        registry.register_def(def, action)?;
    }

    if config.list {
        println!("{}", serde_json::to_string_pretty(&registry.summaries())?);
    }

    let Some(events_path) = config.events_path else {
        return Ok(());
    };

    let events = load_event_script(&events_path)
        .with_context(|| format!("loading events from {}", events_path.display()))?;

    registry.start();
    for event in &events {
        let target = event.target.as_deref().unwrap_or("-");
        println!("{}{} on {}", event.mods, event.key, target);

        bus.emit(event);

        if event.from_text_entry() {
            println!("  (text entry, ignored)");
        } else if event.default_prevented() {
            println!("  default prevented");
        }
    }
    registry.stop();

    Ok(())
}
