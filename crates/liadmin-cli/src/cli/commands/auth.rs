//! Login/logout/status command handlers.

use anyhow::Result;
use liadmin_core::api::ApiClient;
use liadmin_core::login::LoginForm;
use liadmin_core::session::SessionStore;

use super::prompt_line;

/// Signs in and persists the session.
///
/// Validation runs before anything touches the network; an invalid form
/// never issues a request.
pub async fn login(
    client: &ApiClient,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(value) => value,
        None => prompt_line("Email")?,
    };
    let password = match password {
        Some(value) => value,
        None => prompt_line("Password")?,
    };

    let form = LoginForm::new(email, password);
    let validation = form.validate();
    if !validation.is_valid() {
        anyhow::bail!(validation.messages().join("\n"));
    }

    let session = client.login(&form.email, &form.password).await?;

    let who = session.email().unwrap_or(form.email.as_str()).to_string();
    println!("Logged in as {who}.");
    if !session.verified {
        println!("Note: this account is not marked verified.");
    }
    Ok(())
}

/// Clears the stored session.
pub fn logout(store: &SessionStore) -> Result<()> {
    if !store.get().is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    store.clear()?;
    println!("Logged out.");
    Ok(())
}

/// Prints the current session without revealing the token.
pub fn status(store: &SessionStore) -> Result<()> {
    let session = store.get();
    if !session.is_authenticated() {
        println!("Not logged in. Run `liadmin login` to sign in.");
        return Ok(());
    }

    match session.email() {
        Some(email) => println!("Logged in as {email}."),
        None => println!("Logged in."),
    }
    println!(
        "Verified: {}",
        if session.verified { "yes" } else { "no" }
    );
    // Enough of the token to correlate with backend logs, never all of it
    if let Some(token) = &session.token {
        let head: String = token.chars().take(8).collect();
        println!("Token: {head}…");
    }
    Ok(())
}
