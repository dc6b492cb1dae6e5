//! Author posts: add, edit, delete.

use anyhow::{Context, Result};
use std::path::Path;

use blogpost_client::{BlogClient, Transport};
use blogpost_types::{Post, PostId, PostUpdate};

/// Run the add command.
pub async fn add(
    data_dir: &Path,
    api_url: &str,
    title: &str,
    description: &str,
    img_url: &str,
) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    add_post(&client, title, description, img_url).await
}

/// Add logic for any transport.
async fn add_post<T: Transport>(
    client: &BlogClient<T>,
    title: &str,
    description: &str,
    img_url: &str,
) -> Result<()> {
    let post = client
        .create_post(title, description, img_url)
        .await
        .context("Failed to add the post")?;

    println!("Post added!");
    println!();
    println!("  Id:    {}", post.id);
    println!("  Title: {}", post.title);
    Ok(())
}

/// Run the edit command. Fields left out keep the post's current value,
/// like the web edit form prefills them.
pub async fn edit(
    data_dir: &Path,
    api_url: &str,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    img_url: Option<&str>,
) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    client.fetch_current_user().await;
    edit_post(&client, id, title, description, img_url).await
}

/// Edit logic for any transport. The catalog must be current.
async fn edit_post<T: Transport>(
    client: &BlogClient<T>,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    img_url: Option<&str>,
) -> Result<()> {
    let id = PostId::from(id);
    let current = client
        .post(&id)
        .await
        .with_context(|| format!("No post with id {}", id))?;
    check_ownership(client, &current, "edit").await?;

    let update = PostUpdate {
        title: title.unwrap_or(&current.title).to_string(),
        description: description.unwrap_or(&current.description).to_string(),
        img_url: img_url.unwrap_or(&current.img_url).to_string(),
    };
    client
        .edit_post(&id, update)
        .await
        .context("Failed to edit the post")?;

    println!("Post updated!");
    Ok(())
}

/// Run the delete command.
pub async fn delete(data_dir: &Path, api_url: &str, id: &str) -> Result<()> {
    let client = super::http_client(data_dir, api_url);
    client.restore_session().await;
    client.refresh_all().await.context("Failed to fetch posts")?;
    client.fetch_current_user().await;
    delete_post(&client, id).await
}

/// Delete logic for any transport. The catalog must be current.
async fn delete_post<T: Transport>(client: &BlogClient<T>, id: &str) -> Result<()> {
    let id = PostId::from(id);
    if let Some(current) = client.post(&id).await {
        check_ownership(client, &current, "delete").await?;
    }
    client
        .delete_post(&id)
        .await
        .context("Failed to delete the post")?;

    println!("Post deleted.");
    Ok(())
}

/// Refuse to touch someone else's post, like the web app only offers
/// edit and delete on your own. Posts without an author id, or a session
/// whose profile never loaded, are left for the server to judge.
async fn check_ownership<T: Transport>(
    client: &BlogClient<T>,
    post: &Post,
    verb: &str,
) -> Result<()> {
    if let Some(user) = client.current_user().await {
        if post.owner_id.is_some() && !post.owned_by(&user.id) {
            anyhow::bail!("Only the author can {} this post", verb);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpost_client::{ClientConfig, MockTransport};
    use serde_json::json;

    fn post_json(id: &str, title: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "title": title,
            "description": "original body",
            "imgUrl": "https://img.test/x.png",
        })
    }

    async fn logged_in_client(transport: &MockTransport) -> BlogClient<MockTransport> {
        let config = ClientConfig::new("https://api.test.invalid/api");
        let client = BlogClient::new(&config, transport.clone());
        transport.queue_json(200, json!({ "token": "tok-1" }));
        transport.queue_json(200, json!({ "user": { "_id": "u1", "name": "Ada" } }));
        client.login("ada@test.invalid", "pw").await.unwrap();
        client
    }

    #[tokio::test]
    async fn add_prepends_the_new_post() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;

        transport.queue_json(200, json!({ "post": post_json("new", "Fresh") }));
        add_post(&client, "Fresh", "Body", "https://img.test/y.png")
            .await
            .unwrap();

        assert_eq!(client.posts().await[0].id, PostId::from("new"));
    }

    #[tokio::test]
    async fn add_rejects_empty_title() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        let before = transport.request_count();

        let result = add_post(&client, "  ", "Body", "https://img.test/y.png").await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn edit_keeps_fields_that_were_not_given() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        transport.queue_json(200, json!({ "posts": [post_json("a", "Old title")] }));
        client.refresh_all().await.unwrap();

        // Ack-only response, so the merged fields stay as sent
        transport.queue_json(200, json!({ "message": "Post updated." }));
        edit_post(&client, "a", Some("New title"), None, None)
            .await
            .unwrap();

        let post = client.post(&PostId::from("a")).await.unwrap();
        assert_eq!(post.title, "New title");
        assert_eq!(post.description, "original body");

        // The request carried the prefilled description too
        let sent = transport.last_request().unwrap();
        assert_eq!(
            sent.body.unwrap()["description"],
            json!("original body")
        );
    }

    #[tokio::test]
    async fn edit_unknown_post_sends_nothing() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        let before = transport.request_count();

        let result = edit_post(&client, "ghost", Some("x"), None, None).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn edit_of_someone_elses_post_is_refused_locally() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        let mut foreign = post_json("a", "Not mine");
        foreign["userId"] = json!("u2");
        transport.queue_json(200, json!({ "posts": [foreign] }));
        client.refresh_all().await.unwrap();
        let before = transport.request_count();

        let result = edit_post(&client, "a", Some("Hijack"), None, None).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), before);
        // The cache is untouched too
        assert_eq!(client.post(&PostId::from("a")).await.unwrap().title, "Not mine");
    }

    #[tokio::test]
    async fn delete_own_post_passes_the_ownership_gate() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        let mut mine = post_json("a", "Mine");
        mine["userId"] = json!("u1");
        transport.queue_json(200, json!({ "posts": [mine] }));
        client.refresh_all().await.unwrap();

        transport.queue_json(200, json!({ "message": "Post deleted." }));
        delete_post(&client, "a").await.unwrap();

        assert!(client.posts().await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_post() {
        let transport = MockTransport::new();
        let client = logged_in_client(&transport).await;
        transport.queue_json(200, json!({ "posts": [post_json("a", "Doomed")] }));
        client.refresh_all().await.unwrap();

        transport.queue_json(200, json!({ "message": "Post deleted." }));
        delete_post(&client, "a").await.unwrap();

        assert!(client.posts().await.is_empty());
    }
}
