//! Account commands (login, register, logout, whoami, profile)

use anyhow::Result;

use nestegg_core::gateway::Session;
use nestegg_core::models::{SavingsInstrument, Transaction};

use super::core::AppContext;

/// Number of local drafts waiting for `nestegg sync`
fn pending_drafts(ctx: &AppContext) -> usize {
    let transactions = ctx
        .local
        .list_drafts::<Transaction>()
        .map(|d| d.len())
        .unwrap_or(0);
    let savings = ctx
        .local
        .list_drafts::<SavingsInstrument>()
        .map(|d| d.len())
        .unwrap_or(0);
    transactions + savings
}

fn welcome(ctx: &AppContext) {
    if let Some(user) = ctx.session.user() {
        println!("✅ Welcome, {}!", user.first_name());
    }
    let pending = pending_drafts(ctx);
    if pending > 0 {
        println!(
            "   💾 {} record(s) were saved on this device while logged out.",
            pending
        );
        println!("   Run 'nestegg sync' to upload them to your account.");
    }
}

pub async fn cmd_login(ctx: &mut AppContext, email: &str, password: &str) -> Result<()> {
    match ctx.client.login(email, password).await {
        Ok(auth) => {
            ctx.session = Session::from(auth);
            ctx.save_session()?;
            ctx.local.clear_mirror()?;
            welcome(ctx);
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub async fn cmd_register(ctx: &mut AppContext, email: &str, password: &str) -> Result<()> {
    match ctx.client.register(email, password).await {
        Ok(auth) => {
            ctx.session = Session::from(auth);
            ctx.save_session()?;
            ctx.local.clear_mirror()?;
            println!("🎉 Account created for {}", email);
            welcome(ctx);
        }
        Err(e) => ctx.report(&e)?,
    }
    Ok(())
}

pub fn cmd_logout(ctx: &mut AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    ctx.session.clear();
    ctx.save_session()?;
    ctx.local.clear_mirror()?;
    println!("👋 Logged out");
    Ok(())
}

/// Show the signed-in user, checking the token with the server
pub async fn cmd_whoami(ctx: &mut AppContext) -> Result<()> {
    let Some(token) = ctx.session.token().map(str::to_string) else {
        println!("Not logged in. Use 'nestegg login' or 'nestegg register'.");
        return Ok(());
    };

    match ctx.client.me(&token).await {
        Ok(user) => {
            ctx.session.set_user(user);
            ctx.save_session()?;
        }
        Err(e) => {
            ctx.session.clear_on_auth_error(&e);
            ctx.report(&e)?;
            if !ctx.session.is_authenticated() {
                return Ok(());
            }
        }
    }

    if let Some(user) = ctx.session.user() {
        println!("👤 {}", user.display_name());
        if let Some(email) = &user.email {
            println!("   {}", email);
        }
    }
    Ok(())
}

pub async fn cmd_profile(ctx: &mut AppContext, first_name: &str, last_name: &str) -> Result<()> {
    let Some(token) = ctx.session.token().map(str::to_string) else {
        println!("Not logged in. The profile lives on the server; log in first.");
        return Ok(());
    };

    match ctx.client.update_me(&token, first_name, last_name).await {
        Ok(updated) => {
            ctx.session.apply_profile(updated);
            ctx.save_session()?;
            if let Some(user) = ctx.session.user() {
                println!("✅ Profile updated: {}", user.display_name());
            }
        }
        Err(e) => {
            ctx.session.clear_on_auth_error(&e);
            ctx.report(&e)?;
        }
    }
    Ok(())
}
