//! Domain methods for the past-question API client.
//!
//! Every endpoint is a fixed path under the configured base URL; responses
//! are `{success, ...}` JSON envelopes decoded by the generic helpers in
//! the crate root.

use std::path::PathBuf;

use pastq_core::{to_kebab, Admin, AppError, Filters, PastQuestion};
use serde::Deserialize;

use crate::ApiClient;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    admin: Option<Admin>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<PastQuestion>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    item: Option<PastQuestion>,
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    inserted: u64,
}

/// What a bulk import actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Records posted to the import endpoint.
    pub sent: usize,
    /// Records dropped locally for missing title/course code or file URL.
    pub skipped: usize,
    /// Server-reported insert count.
    pub inserted: u64,
}

/// One upload: the file on disk plus its metadata.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub record: PastQuestion,
    /// Optional server-side file name; slugified before sending.
    pub safe_name: String,
}

impl UploadRequest {
    /// Title fallback chain used for both the metadata and the slug.
    fn effective_title(&self) -> String {
        for candidate in [
            &self.record.title,
            &self.record.course_title,
            &self.record.course_code,
        ] {
            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        "Untitled".to_string()
    }

    /// Slug sent as `safe_name`: the user-supplied name when given, else
    /// derived from the effective title.
    fn effective_slug(&self) -> String {
        let slug = to_kebab(&self.safe_name);
        if !slug.is_empty() {
            return slug;
        }
        to_kebab(&self.effective_title())
    }
}

impl ApiClient {
    /// Log in and return the bearer token. Inputs are validated before any
    /// request is made.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email + password required.".to_string(),
            ));
        }

        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self.post_json("/auth/login.php", &body).await?;
        response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Network("No token returned.".to_string()))
    }

    /// Verify the current session. Fails with `Unauthorized` when no token
    /// is held locally or the server rejects it.
    pub async fn me(&self) -> Result<Admin, AppError> {
        if !self.has_token() {
            return Err(AppError::Unauthorized("Login first.".to_string()));
        }
        let response: MeResponse = self.get("/auth/me.php", &[]).await?;
        response
            .admin
            .filter(|a| !a.email.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Session expired.".to_string()))
    }

    /// Best-effort server-side logout. Local token handling is the caller's
    /// concern and happens regardless of the outcome here.
    pub async fn logout(&self) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json("/auth/logout.php", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// Fetch the current list, server-filtered. Records come back trimmed
    /// and with a derivable format tag filled in.
    pub async fn list(&self, filters: &Filters, limit: u32) -> Result<Vec<PastQuestion>, AppError> {
        let params = filters.query_params(limit);
        let response: ListResponse = self.get("/pastquestions/list.php", &params).await?;
        Ok(response
            .items
            .into_iter()
            .map(PastQuestion::normalized)
            .collect())
    }

    /// Upload one file with its metadata as a multipart form. Returns the
    /// created record when the server echoes it back.
    pub async fn upload(&self, request: &UploadRequest) -> Result<Option<PastQuestion>, AppError> {
        pastq_core::validation::validate_upload_path(&request.file)?;

        let bytes = std::fs::read(&request.file).map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {}: {}", request.file.display(), e))
        })?;
        let filename = request
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let record = &request.record;
        let doc_type = if record.doc_type.trim().is_empty() {
            "Exam"
        } else {
            record.doc_type.trim()
        };

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            )
            .text("title", request.effective_title())
            .text("course_code", record.course_code.trim().to_string())
            .text("course_title", record.course_title.trim().to_string())
            .text("level", record.level.trim().to_string())
            .text("semester", record.semester.trim().to_string())
            .text("type", doc_type.to_string())
            .text("session", record.session.trim().to_string())
            .text("year", record.year.trim().to_string())
            .text("notes", record.notes.trim().to_string());

        let slug = request.effective_slug();
        if !slug.is_empty() {
            form = form.text("safe_name", slug);
        }

        let response: UploadResponse = self.post_multipart("/pastquestions/upload.php", form).await?;
        Ok(response.item.map(PastQuestion::normalized))
    }

    /// Update a record's metadata. The full payload is sent; the server is
    /// the source of truth afterwards.
    pub async fn update(&self, record: &PastQuestion) -> Result<(), AppError> {
        let id = record
            .id
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::InvalidInput("Invalid item id.".to_string()))?;

        let payload = serde_json::json!({
            "id": id,
            "title": record.title.trim(),
            "course_code": record.course_code.trim(),
            "course_title": record.course_title.trim(),
            "level": record.level.trim(),
            "semester": record.semester.trim(),
            "type": record.doc_type.trim(),
            "session": record.session.trim(),
            "year": record.year.trim(),
            "notes": record.notes.trim(),
        });

        let _: serde_json::Value = self.post_json("/pastquestions/update.php", &payload).await?;
        Ok(())
    }

    /// Rename the stored file (metadata is untouched).
    pub async fn rename(&self, id: i64, safe_name: &str) -> Result<(), AppError> {
        let slug = to_kebab(safe_name);
        if id <= 0 || slug.is_empty() {
            return Err(AppError::InvalidInput("Enter a valid name.".to_string()));
        }

        let payload = serde_json::json!({ "id": id, "safe_name": slug });
        let _: serde_json::Value = self.post_json("/pastquestions/rename.php", &payload).await?;
        Ok(())
    }

    /// Delete a record and its stored file.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::InvalidInput("Invalid item id.".to_string()));
        }
        let payload = serde_json::json!({ "id": id });
        let _: serde_json::Value = self.post_json("/pastquestions/delete.php", &payload).await?;
        Ok(())
    }

    /// Bulk-import records. Records without a title/course code or file URL
    /// are dropped locally before posting.
    pub async fn import(&self, records: &[PastQuestion]) -> Result<ImportReport, AppError> {
        let publishable: Vec<&PastQuestion> =
            records.iter().filter(|r| r.is_publishable()).collect();
        let skipped = records.len() - publishable.len();

        if publishable.is_empty() {
            return Err(AppError::InvalidInput("Nothing to publish.".to_string()));
        }

        let response: ImportResponse = self
            .post_json("/pastquestions/import.php", &publishable)
            .await?;

        Ok(ImportReport {
            sent: publishable.len(),
            skipped,
            inserted: response.inserted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;

    fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> ApiClient {
        ApiClient::new(server.url(), token.map(|t| t.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login.php")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "email": "admin@example.com"
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"token":"t0k3n"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let token = client.login("admin@example.com", "secret").await.unwrap();
        assert_eq!(token, "t0k3n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_validates_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.login("", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_me_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/me.php")
            .match_header("authorization", "Bearer t0k3n")
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"admin":{"email":"admin@example.com"}}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let admin = client.me().await.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_me_without_token_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/me.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_sends_filters_and_normalizes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pastquestions/list.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "400".into()),
                Matcher::UrlEncoded("level".into(), "400".into()),
                Matcher::UrlEncoded("q".into(), "land".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"items":[{"id":"7","title":"  Land Law  ","type":"Exam","file_url":"https://x/land.pdf"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let filters = Filters {
            level: "400".to_string(),
            q: "land".to_string(),
            ..Default::default()
        };
        let items = client.list(&filters, 400).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, Some(7));
        assert_eq!(items[0].title, "Land Law");
        assert_eq!(items[0].format, Some(pastq_core::Format::Pdf));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_without_file_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/upload.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let request = UploadRequest::default();
        let err = client.upload(&request).await.unwrap_err();
        assert_eq!(err.client_message(), "Choose a file first.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_posts_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/upload.php")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("law401-final.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 fake").unwrap();

        let client = client_for(&server, Some("t0k3n"));
        let request = UploadRequest {
            file: path,
            record: PastQuestion {
                title: "LAW401 Final".to_string(),
                doc_type: String::new(),
                ..Default::default()
            },
            safe_name: String::new(),
        };
        let created = client.upload(&request).await.unwrap();
        assert!(created.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/update.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let err = client.update(&PastQuestion::default()).await.unwrap_err();
        assert_eq!(err.client_message(), "Invalid item id.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rename_rejects_empty_slug() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/rename.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let err = client.rename(7, "!!!").await.unwrap_err();
        assert_eq!(err.client_message(), "Enter a valid name.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rename_slugifies_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/rename.php")
            .match_body(Matcher::Json(
                serde_json::json!({"id": 7, "safe_name": "law401-resit"}),
            ))
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        client.rename(7, "LAW401 Resit!").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_posts_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/delete.php")
            .match_body(Matcher::Json(serde_json::json!({"id": 12})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        client.delete(12).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_filters_unpublishable_and_reports_inserted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/import.php")
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"inserted":2}"#)
            .create_async()
            .await;

        let publishable = PastQuestion {
            title: "Land Law".to_string(),
            file_url: "https://x/land.pdf".to_string(),
            ..Default::default()
        };
        let no_file = PastQuestion {
            title: "Draft only".to_string(),
            ..Default::default()
        };
        let records = vec![publishable.clone(), no_file, publishable];

        let client = client_for(&server, Some("t0k3n"));
        let report = client.import(&records).await.unwrap();
        assert_eq!(report.sent, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_with_nothing_publishable_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pastquestions/import.php")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let err = client.import(&[PastQuestion::default()]).await.unwrap_err();
        assert_eq!(err.client_message(), "Nothing to publish.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_field_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pastquestions/delete.php")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"error":"File is locked."}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let err = client.delete(3).await.unwrap_err();
        assert_eq!(err.client_message(), "File is locked.");
    }

    #[tokio::test]
    async fn test_envelope_failure_on_http_200() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pastquestions/update.php")
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"error":"Update failed."}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let record = PastQuestion {
            id: Some(4),
            ..Default::default()
        };
        let err = client.update(&record).await.unwrap_err();
        assert_eq!(err.client_message(), "Update failed.");
    }

    #[tokio::test]
    async fn test_bodyless_error_becomes_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pastquestions/list.php")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = client_for(&server, Some("t0k3n"));
        let err = client.list(&Filters::default(), 400).await.unwrap_err();
        assert_eq!(err.client_message(), "HTTP 502");
    }
}
