//! Browse posts: the full list and a random home-page selection.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use std::path::Path;

use blogpost_client::{BlogClient, Transport};
use blogpost_types::Post;

/// How many posts the home view samples, matching the web home page.
const HOME_SAMPLE: usize = 6;

/// Run the list command.
pub async fn list(data_dir: &Path, api_url: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    list_posts(&client).await
}

/// List logic for any transport.
async fn list_posts<T: Transport>(client: &BlogClient<T>) -> Result<()> {
    client.refresh_all().await.context("Failed to fetch posts")?;
    load_profile(client).await;

    let posts = client.posts().await;
    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }

    println!("=== Posts ({}) ===", posts.len());
    println!();
    for post in &posts {
        print_post(client, post).await;
    }
    Ok(())
}

/// Run the home command.
pub async fn home(data_dir: &Path, api_url: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    home_posts(&client).await
}

/// Home logic for any transport: a random sample, newest-first order
/// deliberately discarded like the web home page does.
async fn home_posts<T: Transport>(client: &BlogClient<T>) -> Result<()> {
    client.refresh_all().await.context("Failed to fetch posts")?;
    load_profile(client).await;

    let mut posts = client.posts().await;
    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }
    posts.shuffle(&mut rand::thread_rng());
    posts.truncate(HOME_SAMPLE);

    println!("=== Home ({} of {}) ===", posts.len(), client.posts().await.len());
    println!();
    for post in &posts {
        print_post(client, post).await;
    }
    Ok(())
}

/// Fetch the profile when a token is stored but the profile is not
/// loaded yet. Best effort: browsing works logged out, and marking own
/// posts is a bonus, not a requirement.
async fn load_profile<T: Transport>(client: &BlogClient<T>) {
    if client.is_authenticated().await && client.current_user().await.is_none() {
        client.fetch_current_user().await;
    }
}

/// Print one post as a short block.
async fn print_post<T: Transport>(client: &BlogClient<T>, post: &Post) {
    let liked = if client.has_liked(&post.id).await {
        " (liked)"
    } else {
        ""
    };
    let yours = match client.current_user().await {
        Some(user) if post.owned_by(&user.id) => " (yours)",
        _ => "",
    };
    println!("[{}] {}{}", post.id, post.title, yours);
    println!(
        "    {} like(s), {} comment(s){}",
        post.like_count(),
        post.comments.len(),
        liked
    );
    println!("    {}", truncate(&post.description, 72));
    println!();
}

/// Truncate to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
