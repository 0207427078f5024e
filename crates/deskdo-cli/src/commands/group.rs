use super::{ensure_saved, Ctx};
use anyhow::{Context, Result};
use deskdo_core::DEFAULT_GROUP;

pub fn list(ctx: &Ctx) -> Result<()> {
    let session = ctx.session()?;

    if ctx.json {
        let groups: Vec<_> = session
            .groups()
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "current": name == session.current_group(),
                    "stats": session.group_stats(name),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for name in session.groups() {
        let marker = if name == session.current_group() { "*" } else { " " };
        let stats = session.group_stats(name);
        println!(
            "{} {} ({} pending, {} completed)",
            marker, name, stats.pending, stats.completed
        );
    }
    Ok(())
}

pub fn add(ctx: &Ctx, name: String) -> Result<()> {
    let mut session = ctx.session()?;
    let name = session.add_group(&name).context("failed to add group")?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "group": name }));
    } else {
        println!("Created group '{}'", name);
    }
    Ok(())
}

pub fn rename(ctx: &Ctx, old: String, new: String) -> Result<()> {
    let mut session = ctx.session()?;
    let moved = session
        .rename_group(&old, &new)
        .with_context(|| format!("failed to rename group '{}'", old))?;
    ensure_saved(&session)?;

    let new = new.trim();
    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "old": old, "new": new, "tasks_moved": moved })
        );
    } else {
        println!("Renamed '{}' to '{}' ({} tasks)", old, new, moved);
    }
    Ok(())
}

pub fn delete(ctx: &Ctx, name: String) -> Result<()> {
    let mut session = ctx.session()?;
    let moved = session
        .delete_group(&name)
        .with_context(|| format!("failed to delete group '{}'", name))?;
    ensure_saved(&session)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "deleted": name, "tasks_moved": moved })
        );
    } else {
        println!("Deleted group '{}'", name);
        if moved > 0 {
            println!("Moved {} tasks to '{}'", moved, DEFAULT_GROUP);
        }
    }
    Ok(())
}

pub fn switch(ctx: &Ctx, name: String) -> Result<()> {
    let mut session = ctx.session()?;
    session.select_group(&name)?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "current_group": name }));
    } else {
        println!("Switched to '{}'", name);
    }
    Ok(())
}
