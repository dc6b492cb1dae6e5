//! Session commands: register, login, logout, whoami.

use anyhow::{Context, Result};
use std::path::Path;

use blogpost_client::{BlogClient, Transport};

/// Run the register command.
pub async fn register(
    data_dir: &Path,
    api_url: &str,
    name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => prompt_password("Choose a password: ")?,
    };
    let client = super::http_client(data_dir, api_url);
    sign_up(&client, name, email, &password).await
}

/// Register logic for any transport.
async fn sign_up<T: Transport>(
    client: &BlogClient<T>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    client
        .register(name, email, password)
        .await
        .context("Registration failed")?;

    println!("Account registered!");
    if client.is_authenticated().await {
        if let Some(user) = client.current_user().await {
            println!("Logged in as {}.", user.name);
        }
    } else {
        println!();
        println!("Log in with: blogpost-cli login --email {}", email);
    }
    Ok(())
}

/// Run the login command.
pub async fn login(
    data_dir: &Path,
    api_url: &str,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => prompt_password("Password: ")?,
    };
    let client = super::http_client(data_dir, api_url);
    log_in(&client, email, &password).await
}

/// Login logic for any transport.
async fn log_in<T: Transport>(client: &BlogClient<T>, email: &str, password: &str) -> Result<()> {
    client.login(email, password).await.context("Login failed")?;

    match client.current_user().await {
        Some(user) => println!("Logged in as {}.", user.name),
        None => println!("Logged in."),
    }
    Ok(())
}

/// Run the logout command. Purely local: the stored session is removed
/// without talking to the server.
pub async fn logout(data_dir: &Path, api_url: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    let had_session = client.restore_session().await;
    client.logout().await;

    if had_session {
        println!("Logged out.");
    } else {
        println!("No stored session; nothing to do.");
    }
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(data_dir: &Path, api_url: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    if !client.restore_session().await {
        println!("Not logged in.");
        return Ok(());
    }
    show_profile(&client).await
}

/// Profile display for any transport.
async fn show_profile<T: Transport>(client: &BlogClient<T>) -> Result<()> {
    match client.fetch_current_user().await {
        Some(user) => {
            println!("Logged in as:");
            println!("  Name:  {}", user.name);
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
            println!("  Id:    {}", user.id);
        }
        None => {
            println!("A session token is stored, but the profile fetch failed.");
            println!("The token may be stale. Log in again, or run 'blogpost-cli logout'.");
        }
    }
    Ok(())
}

/// Prompt for a password with echo suppression.
fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    if password.trim().is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpost_client::{ClientConfig, MockTransport, StateStore};
    use serde_json::json;
    use tempfile::tempdir;

    fn mock_client(transport: &MockTransport) -> BlogClient<MockTransport> {
        let config = ClientConfig::new("https://api.test.invalid/api");
        BlogClient::new(&config, transport.clone())
    }

    #[tokio::test]
    async fn log_in_succeeds_with_queued_session() {
        let transport = MockTransport::new();
        transport.queue_json(200, json!({ "token": "tok-1" }));
        transport.queue_json(200, json!({ "user": { "_id": "u1", "name": "Ada" } }));
        let client = mock_client(&transport);

        log_in(&client, "ada@test.invalid", "pw").await.unwrap();

        assert!(client.is_authenticated().await);
    }

    #[tokio::test]
    async fn log_in_surfaces_rejections() {
        let transport = MockTransport::new();
        transport.queue_json(401, json!({ "error": "Invalid credentials" }));
        let client = mock_client(&transport);

        let result = log_in(&client, "ada@test.invalid", "wrong").await;

        assert!(result.is_err());
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn sign_up_without_token_stays_logged_out() {
        let transport = MockTransport::new();
        transport.queue_json(
            200,
            json!({ "message": blogpost_types::REGISTER_SUCCESS_MESSAGE }),
        );
        let client = mock_client(&transport);

        sign_up(&client, "Ada", "ada@test.invalid", "pw").await.unwrap();

        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn whoami_without_session_is_fine() {
        let dir = tempdir().unwrap();

        // No stored token, so no request is ever attempted
        whoami(dir.path(), "https://api.test.invalid/api")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn logout_removes_the_stored_token() {
        let dir = tempdir().unwrap();
        let store = StateStore::at(dir.path());
        store.save_token("tok-1").await.unwrap();

        logout(dir.path(), "https://api.test.invalid/api")
            .await
            .unwrap();

        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn logout_without_session_is_fine() {
        let dir = tempdir().unwrap();
        logout(dir.path(), "https://api.test.invalid/api")
            .await
            .unwrap();
    }
}
