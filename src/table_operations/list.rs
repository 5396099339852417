//! List every table in a region.

use tracing::{debug, info};

use crate::errors::Result;
use crate::table_operations::TableCatalog;

/// Maximum names DynamoDB returns per `ListTables` call.
pub const LIST_TABLES_PAGE_SIZE: i32 = 100;

/// Collect all table names, following `LastEvaluatedTableName` until the
/// last page.
///
/// Names are returned in the order DynamoDB lists them. Any failed page
/// aborts the listing.
pub async fn list_tables<C>(catalog: &C) -> Result<Vec<String>>
where
    C: TableCatalog + Sync + ?Sized,
{
    let mut names = Vec::new();
    let mut start: Option<String> = None;

    loop {
        let page = catalog
            .list_table_page(start.as_deref(), LIST_TABLES_PAGE_SIZE)
            .await?;
        debug!(count = page.names.len(), start = ?start, "read table page");
        names.extend(page.names);

        match page.last_evaluated {
            Some(last) => start = Some(last),
            None => break,
        }
    }

    info!(count = names.len(), "read tables from dynamodb");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StepsError;
    use crate::table_operations::{TableInfo, TablePage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves fixed pages keyed by the start name and records each request.
    struct PagedCatalog {
        pages: Vec<(Option<&'static str>, TablePage)>,
        requests: Mutex<Vec<(Option<String>, i32)>>,
    }

    #[async_trait]
    impl TableCatalog for PagedCatalog {
        async fn list_table_page(&self, start: Option<&str>, limit: i32) -> Result<TablePage> {
            self.requests
                .lock()
                .unwrap()
                .push((start.map(str::to_string), limit));
            self.pages
                .iter()
                .find(|(s, _)| *s == start)
                .map(|(_, page)| page.clone())
                .ok_or_else(|| StepsError::Service {
                    service: "DynamoDB",
                    message: format!("no page after {:?}", start),
                })
        }

        async fn describe_table(&self, name: &str) -> Result<TableInfo> {
            Ok(TableInfo::new(name, 1, 1))
        }
    }

    fn page(names: &[&str], last: Option<&str>) -> TablePage {
        TablePage {
            names: names.iter().map(|n| n.to_string()).collect(),
            last_evaluated: last.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_should_follow_pagination_until_last_page() {
        let catalog = PagedCatalog {
            pages: vec![
                (None, page(&["a", "b"], Some("b"))),
                (Some("b"), page(&["c", "d"], Some("d"))),
                (Some("d"), page(&["e"], None)),
            ],
            requests: Mutex::new(Vec::new()),
        };

        let names = list_tables(&catalog).await.unwrap();

        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        let requests = catalog.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![
                (None, LIST_TABLES_PAGE_SIZE),
                (Some("b".to_string()), LIST_TABLES_PAGE_SIZE),
                (Some("d".to_string()), LIST_TABLES_PAGE_SIZE),
            ]
        );
    }

    #[tokio::test]
    async fn test_should_return_empty_list_for_empty_region() {
        let catalog = PagedCatalog {
            pages: vec![(None, page(&[], None))],
            requests: Mutex::new(Vec::new()),
        };

        assert!(list_tables(&catalog).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_when_a_later_page_fails() {
        let catalog = PagedCatalog {
            pages: vec![(None, page(&["a"], Some("a")))],
            requests: Mutex::new(Vec::new()),
        };

        let err = list_tables(&catalog).await.unwrap_err();
        assert!(matches!(err, StepsError::Service { .. }));
    }
}
