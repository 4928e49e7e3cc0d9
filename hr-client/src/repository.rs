//! Employee Repository
//!
//! Typed calls for `/api/empleados`. The trait is the seam the admin
//! front-end depends on; [`HttpEmployeeRepository`] is the real one.

use crate::error::ClientResult;
use crate::gateway::{ApiGateway, Binary};
use async_trait::async_trait;
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, Page};

const BASE_PATH: &str = "/api/empleados";

/// List parameters: zero-based page, page size, free text, active filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    /// `None` returns both states
    pub active_only: Option<bool>,
}

impl ListQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            search: None,
            active_only: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_active_only(mut self, active_only: Option<bool>) -> Self {
        self.active_only = active_only;
        self
    }

    /// Query string pairs, in wire order
    ///
    /// `q` only when non-blank after trimming, `activo` only when set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(q) = self.search.as_deref().map(str::trim)
            && !q.is_empty()
        {
            params.push(("q", q.to_string()));
        }
        if let Some(active) = self.active_only {
            params.push(("activo", active.to_string()));
        }
        params
    }
}

/// Generated per-employee document (ficha)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Photo uploaded after a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Guess the content type from a file extension
    pub fn from_file_name(name: &str, bytes: Vec<u8>) -> Self {
        let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        let content_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        };
        Self {
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list(&self, query: &ListQuery) -> ClientResult<Page<Employee>>;

    async fn get(&self, id: i64) -> ClientResult<Employee>;

    async fn create(&self, payload: &EmployeeCreate) -> ClientResult<Employee>;

    /// Full replace of the optional fields; the employee number stays
    async fn update(&self, id: i64, payload: &EmployeeUpdate) -> ClientResult<Employee>;

    /// A second call for the same id fails with a not-found server error
    async fn remove(&self, id: i64) -> ClientResult<()>;

    async fn fetch_generated_document(&self, id: i64) -> ClientResult<Document>;

    async fn upload_photo(&self, id: i64, photo: Photo) -> ClientResult<()>;
}

/// Repository over the HR backend
#[derive(Debug, Clone)]
pub struct HttpEmployeeRepository {
    gateway: ApiGateway,
}

impl HttpEmployeeRepository {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }
}

#[async_trait]
impl EmployeeRepository for HttpEmployeeRepository {
    async fn list(&self, query: &ListQuery) -> ClientResult<Page<Employee>> {
        let params = query.to_params();
        tracing::debug!(?params, "Listing employees");
        self.gateway.get_with_query(BASE_PATH, &params).await
    }

    async fn get(&self, id: i64) -> ClientResult<Employee> {
        self.gateway.get(&format!("{}/{}", BASE_PATH, id)).await
    }

    async fn create(&self, payload: &EmployeeCreate) -> ClientResult<Employee> {
        let created: Employee = self.gateway.post(BASE_PATH, payload).await?;
        tracing::info!(id = created.id, num_empleado = %created.num_empleado, "Employee created");
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &EmployeeUpdate) -> ClientResult<Employee> {
        let updated: Employee = self
            .gateway
            .put(&format!("{}/{}", BASE_PATH, id), payload)
            .await?;
        tracing::info!(id, "Employee updated");
        Ok(updated)
    }

    async fn remove(&self, id: i64) -> ClientResult<()> {
        self.gateway.delete(&format!("{}/{}", BASE_PATH, id)).await?;
        tracing::info!(id, "Employee removed");
        Ok(())
    }

    async fn fetch_generated_document(&self, id: i64) -> ClientResult<Document> {
        let Binary {
            content_type,
            bytes,
        } = self
            .gateway
            .get_bytes(&format!("{}/{}/ficha.pdf", BASE_PATH, id))
            .await?;
        Ok(Document {
            file_name: format!("ficha_{}.pdf", id),
            content_type: content_type.unwrap_or_else(|| "application/pdf".to_string()),
            bytes,
        })
    }

    async fn upload_photo(&self, id: i64, photo: Photo) -> ClientResult<()> {
        let size = photo.bytes.len();
        self.gateway
            .put_bytes(
                &format!("{}/{}/foto", BASE_PATH, id),
                Binary {
                    content_type: Some(photo.content_type),
                    bytes: photo.bytes,
                },
            )
            .await?;
        tracing::debug!(id, size, "Employee photo uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_base() {
        let params = ListQuery::new(0, 20).to_params();
        assert_eq!(params, vec![("page", "0".to_string()), ("size", "20".to_string())]);
    }

    #[test]
    fn test_params_search_trimmed_and_blank_skipped() {
        let params = ListQuery::new(1, 10).with_search("  garcia ").to_params();
        assert_eq!(params[2], ("q", "garcia".to_string()));

        let params = ListQuery::new(1, 10).with_search("   ").to_params();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_active_filter() {
        let params = ListQuery::new(0, 20).with_active_only(Some(true)).to_params();
        assert_eq!(params.last(), Some(&("activo", "true".to_string())));

        let params = ListQuery::new(0, 20).with_active_only(None).to_params();
        assert!(params.iter().all(|(k, _)| *k != "activo"));
    }

    #[test]
    fn test_photo_content_type() {
        assert_eq!(Photo::from_file_name("yo.JPG", vec![1]).content_type, "image/jpeg");
        assert_eq!(Photo::from_file_name("foto.png", vec![1]).content_type, "image/png");
        assert_eq!(
            Photo::from_file_name("sin_extension", vec![1]).content_type,
            "application/octet-stream"
        );
    }
}
