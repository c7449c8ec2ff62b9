use super::error::DbError;
use crate::modules::common::dto::{Pagination, PaginationResult};
use sea_orm::{Paginator, SelectorTrait};
use utoipa::ToSchema;

/// Executes a paginated query, fetching its items, number of items and number
/// of pages into a `PaginationResult`
pub async fn paginated_query_to_pagination_result<
    'db,
    C: sea_orm::ConnectionTrait,
    S: sea_orm::SelectorTrait,
>(
    paginator: Paginator<'db, C, S>,
    pagination: Pagination,
) -> Result<PaginationResult<S::Item>, DbError>
where
    for<'_s> <S as SelectorTrait>::Item: ToSchema<'_s>,
{
    let n = paginator.num_items_and_pages().await?;
    let records = paginator.fetch_page(pagination.page - 1).await?;

    let result = PaginationResult {
        page: pagination.page,
        records,
        page_size: pagination.page_size,
        item_count: n.number_of_items,
        page_count: n.number_of_pages,
    };

    Ok(result)
}

/// Returns `value` unless it is blank, in which case `current` is kept.
///
/// used by partial updates sent from forms, where an empty input means "unchanged"
pub fn non_blank_or(value: Option<String>, current: String) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => current,
    }
}
