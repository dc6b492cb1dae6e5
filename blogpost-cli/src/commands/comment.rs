//! Comment on posts and read comment threads.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

use blogpost_client::{BlogClient, Transport};
use blogpost_types::PostId;

/// Run the comment command.
pub async fn add(data_dir: &Path, api_url: &str, id: &str, text: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    // The provisional comment is attributed to the profile's name
    client.fetch_current_user().await;
    add_comment(&client, id, text).await
}

/// Comment logic for any transport.
async fn add_comment<T: Transport>(client: &BlogClient<T>, id: &str, text: &str) -> Result<()> {
    let id = PostId::from(id);
    client
        .comment_post(&id, text)
        .await
        .context("Failed to add the comment")?;

    let count = client
        .post(&id)
        .await
        .map(|p| p.comments.len())
        .unwrap_or_default();
    println!("Comment added. {} comment(s) now.", count);
    Ok(())
}

/// Run the comments command.
pub async fn list(data_dir: &Path, api_url: &str, id: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    list_comments(&client, id).await
}

/// Thread display for any transport.
async fn list_comments<T: Transport>(client: &BlogClient<T>, id: &str) -> Result<()> {
    let id = PostId::from(id);
    client
        .refresh_comments(&id)
        .await
        .context("Failed to fetch the comment thread")?;

    let post = client
        .post(&id)
        .await
        .with_context(|| format!("No post with id {}", id))?;

    if post.comments.is_empty() {
        println!("No comments on \"{}\" yet.", post.title);
        return Ok(());
    }

    println!("=== Comments on \"{}\" ({}) ===", post.title, post.comments.len());
    println!();
    for comment in &post.comments {
        let age = comment
            .created_at
            .map(|ts| format!("  ({})", format_age(ts)))
            .unwrap_or_default();
        println!("  {}: {}{}", comment.user, comment.text, age);
    }
    Ok(())
}

/// Format a timestamp as a rough age relative to now.
fn format_age(ts: DateTime<Utc>) -> String {
    let seconds = (Utc::now() - ts).num_seconds().max(0);

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpost_client::{ClientConfig, MockTransport};
    use chrono::Duration;
    use serde_json::json;

    async fn client_with_post(transport: &MockTransport) -> BlogClient<MockTransport> {
        let config = ClientConfig::new("https://api.test.invalid/api");
        let client = BlogClient::new(&config, transport.clone());
        transport.queue_json(200, json!({ "token": "tok-1" }));
        transport.queue_json(200, json!({ "user": { "_id": "u1", "name": "Ada" } }));
        client.login("ada@test.invalid", "pw").await.unwrap();

        transport.queue_json(
            200,
            json!({ "posts": [{
                "_id": "a",
                "title": "First",
                "description": "body",
                "imgUrl": "https://img.test/x.png",
            }] }),
        );
        client.refresh_all().await.unwrap();
        client
    }

    #[tokio::test]
    async fn add_comment_reports_the_new_count() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;

        transport.queue_json(
            200,
            json!({
                "message": "Comment added.",
                "postComment": [{ "text": "hi", "user": "Ada" }],
            }),
        );
        add_comment(&client, "a", "hi").await.unwrap();

        let post = client.post(&PostId::from("a")).await.unwrap();
        assert_eq!(post.comments.len(), 1);
    }

    #[tokio::test]
    async fn add_rejects_blank_comment_locally() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;
        let before = transport.request_count();

        let result = add_comment(&client, "a", "   ").await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn list_refetches_the_thread() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;

        transport.queue_json(
            200,
            json!({ "postComment": [
                { "text": "first!", "user": "Cal" },
                { "text": "hello", "user": "Ada" },
            ] }),
        );
        list_comments(&client, "a").await.unwrap();

        let post = client.post(&PostId::from("a")).await.unwrap();
        assert_eq!(post.comments.len(), 2);
    }

    #[test]
    fn format_age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(now), "just now");
        assert!(format_age(now - Duration::minutes(5)).contains("minutes"));
        assert!(format_age(now - Duration::hours(3)).contains("hours"));
        assert!(format_age(now - Duration::days(2)).contains("days"));
    }
}
