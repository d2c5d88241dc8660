use color_eyre::Result;
use serde_json::json;
use zainflix_models::Session;
use zainflix_store::Page;

use crate::commands::AppContext;
use crate::output::Output;

/// Demo authentication: any email and password pair is accepted. The
/// password is prompted for and discarded; only the email identifies the
/// account.
pub fn run_login(ctx: &AppContext, output: &Output, email: &str, remember: bool) -> Result<()> {
    if let Some(session) = ctx.session.current_user() {
        if session.email == email {
            output.info(format!("Already signed in as {}.", email));
            return Ok(());
        }
        output.info(format!(
            "Signing out {} and signing in as {}.",
            session.email, email
        ));
        ctx.session.logout();
    }

    let _password = rpassword::prompt_password("Password: ")?;

    let mut notices = ctx.notifications();
    if !ctx.session.login(&Session::new(email), remember) {
        notices.error("Sign-in failed. Could not persist the session.");
        notices.flush(output);
        return Ok(());
    }

    notices.success(format!("Signed in as {}.", email));
    if ctx.session.redirect_page() == Page::ProfileSelect {
        let names: Vec<String> = ctx.registry.profiles().into_keys().collect();
        notices.info(format!(
            "Pick a profile next: `zainflix profile switch <name>` ({}).",
            names.join(", ")
        ));
    }
    notices.flush(output);
    Ok(())
}

/// Clears the session, the profile selection, and the remember flag. Watch
/// lists stay behind; they are keyed by email and reappear on the next
/// sign-in.
pub fn run_logout(ctx: &AppContext, output: &Output) -> Result<()> {
    if !ctx.session.is_logged_in() {
        output.info("Not signed in.");
        return Ok(());
    }

    let mut notices = ctx.notifications();
    if ctx.session.logout() {
        notices.success("Signed out. Your lists are kept for your next visit.");
    } else {
        notices.error("Sign-out failed. Session state may be partially cleared.");
    }
    notices.flush(output);
    Ok(())
}

pub fn run_whoami(ctx: &AppContext, output: &Output) -> Result<()> {
    let Some(session) = ctx.session.current_user() else {
        output.info("Not signed in.");
        return Ok(());
    };
    let profile = ctx.session.current_profile();

    match output.format() {
        crate::output::OutputFormat::Human => {
            output.println(format!("Signed in as {}", session.email));
            match &profile {
                Some(p) => output.println(format!("Profile: {} (theme {})", p.name, p.theme)),
                None => output.println("Profile: none selected"),
            }
            if ctx.session.remember_user() {
                output.println("Remembered across sessions: yes");
            }
        }
        _ => {
            output.json(&json!({
                "email": session.email,
                "profile": profile.as_ref().map(|p| p.name.clone()),
                "theme": profile.as_ref().map(|p| p.theme.clone()),
                "remembered": ctx.session.remember_user(),
            }));
        }
    }
    Ok(())
}
