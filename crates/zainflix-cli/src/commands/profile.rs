use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use dialoguer::Confirm;
use serde_json::json;
use zainflix_models::ProfileSource;

use crate::commands::AppContext;
use crate::notify::NoticeKind;
use crate::output::{Output, OutputFormat};

pub fn run_list(ctx: &AppContext, output: &Output) -> Result<()> {
    let profiles = ctx.registry.profiles();
    let active = ctx.session.current_profile().map(|p| p.name);

    if output.format() != OutputFormat::Human {
        let rows: Vec<serde_json::Value> = profiles
            .iter()
            .map(|(name, p)| {
                json!({
                    "name": name,
                    "source": match p.source {
                        ProfileSource::Builtin => "builtin",
                        ProfileSource::Custom => "custom",
                    },
                    "color": p.attrs.color,
                    "icon": p.attrs.icon,
                    "avatar": p.attrs.avatar,
                    "active": active.as_deref() == Some(name),
                })
            })
            .collect();
        output.json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "Name", "Source", "Color", "Icon"]);
    for (name, profile) in &profiles {
        let marker = if active.as_deref() == Some(name) { "●" } else { "" };
        let source = match profile.source {
            ProfileSource::Builtin => "builtin",
            ProfileSource::Custom => "custom",
        };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(name),
            Cell::new(source),
            Cell::new(&profile.attrs.color),
            Cell::new(&profile.attrs.icon),
        ]);
    }
    output.println(table.to_string());
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Creates or updates a custom profile for the signed-in user. A custom
/// profile with a built-in name shadows the built-in one.
pub fn run_create(
    ctx: &AppContext,
    output: &Output,
    name: &str,
    color: &str,
    icon: &str,
) -> Result<()> {
    let mut notices = ctx.notifications();

    if name.trim().is_empty() {
        notices.error("Profile name cannot be empty.");
        notices.flush(output);
        return Ok(());
    }
    if !is_hex_color(color) {
        notices.error(format!("Invalid color {:?}; expected #rrggbb.", color));
        notices.flush(output);
        return Ok(());
    }

    if ctx.registry.is_deleted(name) {
        notices.info(format!(
            "The name {:?} is on your deleted list; the new profile replaces it there.",
            name
        ));
    }

    if ctx.registry.save_profile(name, color, icon, None) {
        notices.success(format!("Profile {:?} saved.", name));
    } else {
        notices.error("Could not save the profile.");
    }
    notices.flush(output);
    Ok(())
}

/// Soft delete: the name is hidden for this user but nothing is destroyed,
/// so deleting a built-in profile works the same as deleting a custom one.
pub fn run_delete(ctx: &AppContext, output: &Output, name: &str, yes: bool) -> Result<()> {
    let mut notices = ctx.notifications();

    if ctx.registry.profile(name).is_none() {
        notices.error(format!("No profile named {:?}.", name));
        notices.flush(output);
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Hide profile {:?} from your account?", name))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Aborted.");
            return Ok(());
        }
    }

    if ctx.registry.delete_profile(name) {
        notices.success(format!("Profile {:?} hidden.", name));
        if ctx.session.current_profile().map(|p| p.name).as_deref() == Some(name) {
            notices.push(
                "That was the active profile; switch to another one.",
                NoticeKind::Warning,
            );
        }
    } else {
        notices.error("Could not delete the profile.");
    }
    notices.flush(output);
    Ok(())
}

pub fn run_switch(ctx: &AppContext, output: &Output, name: &str) -> Result<()> {
    let mut notices = ctx.notifications();
    match ctx.registry.switch_profile(name) {
        Some(selected) => {
            notices.success(format!("Switched to {}.", selected.name));
            notices.flush(output);
        }
        None => {
            output.warn(format!(
                "Unknown profile {:?}. Run `zainflix profile list` to see your profiles.",
                name
            ));
        }
    }
    Ok(())
}
