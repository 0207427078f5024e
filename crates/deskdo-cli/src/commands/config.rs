use super::{ensure_saved, Ctx};
use anyhow::{bail, Result};
use deskdo_store::Session;

const KEYS: &[&str] = &["show-completed", "auto-hide", "close-to-tray", "remember-choice"];

pub fn show(ctx: &Ctx) -> Result<()> {
    let session = ctx.session()?;
    let config = session.config();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("show-completed   {}", config.show_completed);
    println!("auto-hide        {}", config.auto_hide_enabled);
    println!("close-to-tray    {}", config.close_to_tray);
    println!("remember-choice  {}", config.remember_choice);
    println!("current-group    {}", config.current_group);
    println!("groups           {}", config.groups.join(", "));
    Ok(())
}

pub fn set(ctx: &Ctx, key: String, value: String) -> Result<()> {
    let value = parse_bool(&value)?;
    if !KEYS.contains(&key.as_str()) {
        bail!("unknown preference '{}' (expected one of: {})", key, KEYS.join(", "));
    }

    let mut session = ctx.session()?;
    apply(&mut session, &key, value);
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{} = {}", key, value);
    }
    Ok(())
}

fn apply(session: &mut Session, key: &str, value: bool) {
    let config = session.config().clone();
    match key {
        "show-completed" => session.set_show_completed(value),
        "auto-hide" => session.set_auto_hide(value),
        "close-to-tray" => {
            session.record_close_choice(value, config.remember_choice);
        }
        "remember-choice" => {
            session.record_close_choice(config.close_to_tray, value);
        }
        _ => {}
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => bail!("invalid value '{}': expected true or false", raw),
    }
}
