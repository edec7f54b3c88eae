use super::types::PaginationParams;

pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> PaginationParams {
    PaginationParams::new(
        page.unwrap_or(1),
        limit.unwrap_or(PaginationParams::DEFAULT_LIMIT),
    )
}
