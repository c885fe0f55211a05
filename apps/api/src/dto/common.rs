use northwind_application::Page;
use serde::{Deserialize, Deserializer, Serialize};

/// Success envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Success envelope for single-record endpoints.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ItemResponse<T> {
    /// Wraps one record in the success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope for operations without a record payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    /// Wraps a confirmation message in the success envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination envelope: `pages = ceil(total / limit)`, zero when empty.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: u32,
}

/// Shapes a page of application views into the list envelope.
pub fn list_response<T, V>(page: Page<V>, convert: impl Fn(V) -> T) -> ListResponse<T> {
    let pagination = Pagination {
        page: page.page(),
        limit: page.page_size(),
        total: page.total(),
        pages: page.pages(),
    };

    ListResponse {
        success: true,
        data: page.into_items().into_iter().map(convert).collect(),
        pagination,
    }
}

/// Distinguishes an absent patch field from an explicit `null`: absent
/// stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
