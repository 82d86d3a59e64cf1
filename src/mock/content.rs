//! 文档与文件

use crate::error::ApiError;
use crate::mock::envelope::{ApiResponse, Paginated, PaginationParams, paginate};
use crate::mock::{MockApi, latency};
use crate::model::{Document, FileItem};

impl MockApi {
    /// 在标题与分类中搜索
    pub async fn list_documents(
        &self,
        params: &PaginationParams,
    ) -> ApiResponse<Paginated<Document>> {
        self.delay(latency::LIST).await;

        let mut docs = self.data.read().await.documents.clone();
        if let Some(keyword) = params.keyword() {
            docs.retain(|d| {
                d.title.to_lowercase().contains(&keyword)
                    || d.category.to_lowercase().contains(&keyword)
            });
        }
        ApiResponse::success(paginate(docs, params.page, params.page_size))
    }

    pub async fn get_document(&self, id: &str) -> ApiResponse<Document> {
        self.delay(latency::READ).await;
        let data = self.data.read().await;
        data.documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(ApiError::DocumentNotFound)
            .into()
    }

    pub async fn list_files(&self, params: &PaginationParams) -> ApiResponse<Paginated<FileItem>> {
        self.delay(latency::LIST).await;

        let mut files = self.data.read().await.files.clone();
        if let Some(keyword) = params.keyword() {
            files.retain(|f| f.name.to_lowercase().contains(&keyword));
        }
        ApiResponse::success(paginate(files, params.page, params.page_size))
    }
}
