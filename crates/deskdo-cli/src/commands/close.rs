use super::{ensure_saved, Ctx};
use anyhow::Result;
use deskdo_core::CloseAction;

/// Without a choice, report what closing the window would do. With
/// `--to-tray` or `--quit`, record the answer to the close prompt.
pub fn run(ctx: &Ctx, to_tray: bool, quit: bool, remember: bool) -> Result<()> {
    let mut session = ctx.session()?;

    let action = if to_tray || quit {
        let action = session.record_close_choice(to_tray, remember);
        ensure_saved(&session)?;
        action
    } else {
        session.close_action()
    };

    if ctx.json {
        println!("{}", serde_json::json!({ "action": action }));
        return Ok(());
    }

    match action {
        CloseAction::Ask => println!("ask: hide to tray or quit?"),
        CloseAction::HideToTray => println!("hide to tray"),
        CloseAction::Quit => println!("quit"),
    }
    Ok(())
}
