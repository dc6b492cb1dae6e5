//! Like and unlike posts.

use anyhow::{Context, Result};
use std::path::Path;

use blogpost_client::{BlogClient, Transport};
use blogpost_types::PostId;

/// Run the like command.
pub async fn like(data_dir: &Path, api_url: &str, id: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    // Attribution uses the profile's display name when it loads
    client.fetch_current_user().await;
    like_post(&client, id).await
}

/// Like logic for any transport. Double-liking is caught here, before
/// the engine: the server would accept it and inflate the count.
async fn like_post<T: Transport>(client: &BlogClient<T>, id: &str) -> Result<()> {
    let id = PostId::from(id);
    if client.has_liked(&id).await {
        println!("Post already liked.");
        return Ok(());
    }

    client
        .like_post(&id)
        .await
        .context("Failed to like the post")?;

    let count = client
        .post(&id)
        .await
        .map(|p| p.like_count())
        .unwrap_or_default();
    println!("Liked. {} like(s) now.", count);
    Ok(())
}

/// Run the unlike command.
pub async fn unlike(data_dir: &Path, api_url: &str, id: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    client.fetch_current_user().await;
    unlike_post(&client, id).await
}

/// Unlike logic for any transport.
async fn unlike_post<T: Transport>(client: &BlogClient<T>, id: &str) -> Result<()> {
    let id = PostId::from(id);
    if !client.has_liked(&id).await {
        println!("Post is not liked.");
        return Ok(());
    }

    client
        .unlike_post(&id)
        .await
        .context("Failed to unlike the post")?;

    let count = client
        .post(&id)
        .await
        .map(|p| p.like_count())
        .unwrap_or_default();
    println!("Unliked. {} like(s) now.", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpost_client::{ClientConfig, MockTransport};
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
    async fn like_then_double_like_sends_one_request() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;
        let before = transport.request_count();

        transport.queue_json(200, json!({ "message": "Post liked." }));
        like_post(&client, "a").await.unwrap();
        assert_eq!(transport.request_count(), before + 1);

        // Second like is answered locally
        like_post(&client, "a").await.unwrap();
        assert_eq!(transport.request_count(), before + 1);

        let post = client.post(&PostId::from("a")).await.unwrap();
        assert_eq!(post.like_count(), 1);
    }

    #[tokio::test]
    async fn unlike_before_like_is_answered_locally() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;
        let before = transport.request_count();

        unlike_post(&client, "a").await.unwrap();

        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn unlike_after_like_round_trips() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;

        transport.queue_json(200, json!({ "message": "Post liked." }));
        like_post(&client, "a").await.unwrap();

        transport.queue_json(200, json!({ "message": "Post unliked." }));
        unlike_post(&client, "a").await.unwrap();

        let post = client.post(&PostId::from("a")).await.unwrap();
        assert_eq!(post.like_count(), 0);
        assert!(!client.has_liked(&PostId::from("a")).await);
    }

    #[tokio::test]
    async fn like_failure_surfaces_the_error() {
        let transport = MockTransport::new();
        let client = client_with_post(&transport).await;

        transport.queue_json(500, json!({ "error": "boom" }));
        let result = like_post(&client, "a").await;

        assert!(result.is_err());
        assert!(!client.has_liked(&PostId::from("a")).await);
    }
}
