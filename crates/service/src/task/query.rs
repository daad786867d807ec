use sea_orm::Order;
use serde::Deserialize;

use crate::pagination::Pagination;

/// Listing order. Both directions break `created_at` ties by `id`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    /// `created_at` descending, then `id` descending
    #[default]
    Newest,
    /// `created_at` ascending, then `id` ascending
    Oldest,
}

impl TaskSort {
    pub fn order(self) -> Order {
        match self {
            Self::Newest => Order::Desc,
            Self::Oldest => Order::Asc,
        }
    }
}

/// Filter, ordering and page for a task listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub done: Option<bool>,
    pub sort: TaskSort,
    pub page: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_directions() {
        assert_eq!(TaskSort::Newest.order(), Order::Desc);
        assert_eq!(TaskSort::Oldest.order(), Order::Asc);
    }

    #[test]
    fn default_query_lists_newest_first_page() {
        let q = TaskQuery::default();
        assert_eq!(q.sort, TaskSort::Newest);
        assert_eq!(q.done, None);
        assert_eq!(q.page, Pagination::default());
    }
}
