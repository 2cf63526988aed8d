// Poster upload and association endpoints.
//
// Saving a poster is two requests: the file goes to `upload-poster`, which
// answers with the stored URL, and that URL is then attached to the event
// through `update-poster-url`. Sequencing the two is the caller's job.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::EventClient;
use crate::error::Error;

/// Multipart field name the server reads the file from.
const POSTER_FIELD: &str = "poster";

impl EventClient {
    /// Upload poster bytes and return the URL the server stored them at.
    ///
    /// `POST /api/event/upload-poster` (multipart, field `poster`)
    pub async fn upload_poster(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Error> {
        debug!(file_name, size = bytes.len(), "uploading poster");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime_for(file_name))?;
        let form = reqwest::multipart::Form::new().part(POSTER_FIELD, part);

        let url = self.event_url(&["upload-poster"])?;
        let data: Option<Value> = self.post_multipart(url, form).await?;
        data.as_ref()
            .and_then(extract_url)
            .ok_or_else(|| Error::Deserialization {
                message: "upload response carried no poster URL".into(),
                body: data.map(|d| d.to_string()).unwrap_or_default(),
            })
    }

    /// Read a file from disk and upload it as the poster.
    pub async fn upload_poster_file(&self, path: &Path) -> Result<String, Error> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| Error::PosterFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "poster".to_owned(), |n| n.to_string_lossy().into_owned());
        self.upload_poster(&file_name, bytes).await
    }

    /// Attach an uploaded poster URL to an event.
    ///
    /// `POST /api/event/update-poster-url` with `{eventId, posterUrl}`
    pub async fn update_poster_url(&self, event_id: &str, poster_url: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            event_id: &'a str,
            poster_url: &'a str,
        }

        debug!(event_id, poster_url, "associating poster");
        let url = self.event_url(&["update-poster-url"])?;
        let _: Option<Value> = self
            .post(url, &Body {
                event_id,
                poster_url,
            })
            .await?;
        Ok(())
    }
}

/// The stored URL: `data.posterUrl`, `data.url`, or `data` itself.
fn extract_url(data: &Value) -> Option<String> {
    match data {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => ["posterUrl", "url"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        _ => None,
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
