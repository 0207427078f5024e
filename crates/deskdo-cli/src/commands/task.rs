use super::{ensure_saved, format_task, Ctx};
use anyhow::{Context, Result};
use deskdo_core::TaskId;

pub fn add(ctx: &Ctx, text: String, group: Option<String>) -> Result<()> {
    let mut session = ctx.session()?;
    let task = session
        .add_task(&text, group.as_deref())
        .context("failed to add task")?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("[{}] {} {}", task.group, task.id.short(), task.text);
    }
    Ok(())
}

pub fn list(ctx: &Ctx, group: Option<String>, all: bool) -> Result<()> {
    let session = ctx.session()?;
    let group = group.unwrap_or_else(|| session.current_group().to_string());
    let include_completed = all || session.config().show_completed;
    let tasks = session.list_tasks(&group, include_completed);
    let stats = session.group_stats(&group);

    if ctx.json {
        let out = serde_json::json!({
            "group": group,
            "stats": stats,
            "tasks": tasks,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if include_completed {
        println!(
            "[{}] total: {} | pending: {} | completed: {}",
            group, stats.total, stats.pending, stats.completed
        );
    } else {
        println!(
            "[{}] pending: {} | completed: {} (hidden)",
            group, stats.pending, stats.completed
        );
    }
    if tasks.is_empty() {
        println!("No tasks in '{}'", group);
    }
    for task in &tasks {
        println!("{}", format_task(task));
    }
    Ok(())
}

pub fn done(ctx: &Ctx, id: String) -> Result<()> {
    let mut session = ctx.session()?;
    let id = session.resolve_id(&id)?;
    let task = session.toggle_task(&id)?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else if task.completed {
        println!("Completed {} {}", task.id.short(), task.text);
    } else {
        println!("Reopened {} {}", task.id.short(), task.text);
    }
    Ok(())
}

pub fn edit(ctx: &Ctx, id: String, text: String) -> Result<()> {
    let mut session = ctx.session()?;
    let id = session.resolve_id(&id)?;
    let task = session.edit_task(&id, &text).context("failed to edit task")?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Updated {}", task.id.short());
    }
    Ok(())
}

pub fn remove(ctx: &Ctx, id: String) -> Result<()> {
    let mut session = ctx.session()?;
    let id = session.resolve_id(&id)?;
    let task = session.delete_task(&id)?;
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Deleted {} {}", task.id.short(), task.text);
    }
    Ok(())
}

pub fn up(ctx: &Ctx, id: String) -> Result<()> {
    shift(ctx, id, true)
}

pub fn down(ctx: &Ctx, id: String) -> Result<()> {
    shift(ctx, id, false)
}

fn shift(ctx: &Ctx, id: String, up: bool) -> Result<()> {
    let mut session = ctx.session()?;
    let id = session.resolve_id(&id)?;
    let moved = if up {
        session.move_up(&id)?
    } else {
        session.move_down(&id)?
    };
    ensure_saved(&session)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "id": id, "moved": moved }));
    } else if moved {
        println!("Moved {} {}", id.short(), if up { "up" } else { "down" });
    } else {
        println!("{} is already at the {}", id.short(), if up { "top" } else { "bottom" });
    }
    Ok(())
}

pub fn reorder(ctx: &Ctx, group: Option<String>, ids: Vec<String>) -> Result<()> {
    let mut session = ctx.session()?;
    let group = group.unwrap_or_else(|| session.current_group().to_string());
    let ids = ids
        .iter()
        .map(|prefix| session.resolve_id(prefix))
        .collect::<Result<Vec<TaskId>, _>>()?;
    session
        .reorder_within_group(&group, &ids)
        .context("failed to reorder")?;
    ensure_saved(&session)?;

    if ctx.json {
        let tasks = session.list_tasks(&group, true);
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        println!("Reordered {} tasks in '{}'", ids.len(), group);
    }
    Ok(())
}
