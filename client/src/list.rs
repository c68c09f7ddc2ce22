//! 列表 + 弹窗页面的列表部分
//!
//! 每次刷新都会分配一个递增的序号 (ListTicket)，只有最新序号的响应会被应用，
//! 旧页面的慢响应直接丢弃，`loading` 也只由最新的请求清除。
//! 删除必须先确认；任何修改之后都重新加载当前页，不做乐观更新。
//!
//! `ListScreen` 本身是同步状态机，`load` / `reload` / `delete_confirmed`
//! 通过 `StateCell` 驱动它完成网络往返。

use async_trait::async_trait;

use carrent_shared::protocol::{DEFAULT_PAGE_LIMIT, total_pages};
use carrent_shared::{EntityId, ListResponse, PageRequest};

use crate::cell::StateCell;
use crate::error::ClientResult;

/// 分页数据来源
#[async_trait(?Send)]
pub trait ListSource<E> {
    async fn fetch(&self, page: PageRequest) -> ClientResult<ListResponse<E>>;
}

/// 支持删除的数据来源
#[async_trait(?Send)]
pub trait RemoveSource {
    async fn remove(&self, id: &EntityId) -> ClientResult<()>;
}

/// 一次刷新的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    pub seq: u64,
    pub page: PageRequest,
}

/// 列表页状态
#[derive(Debug, Clone, PartialEq)]
pub struct ListScreen<E> {
    pub items: Vec<E>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub loading: bool,
    issued: u64,
    pending_delete: Option<EntityId>,
}

impl<E> Default for ListScreen<E> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl<E> ListScreen<E> {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: limit.max(1),
            loading: false,
            issued: 0,
            pending_delete: None,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.limit)
    }

    pub fn current_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    // =========================================================
    // 刷新
    // =========================================================

    /// 开始加载当前页
    pub fn begin_reload(&mut self) -> ListTicket {
        self.issued += 1;
        self.loading = true;
        ListTicket {
            seq: self.issued,
            page: self.current_request(),
        }
    }

    /// 应用一次刷新的结果
    ///
    /// 返回 `false` 表示该响应已过期并被丢弃。
    /// 失败时保留原有数据，错误交给调用方展示。
    pub fn complete_reload(
        &mut self,
        ticket: ListTicket,
        result: ClientResult<ListResponse<E>>,
    ) -> ClientResult<bool> {
        if ticket.seq != self.issued {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                page = ticket.page.page,
                "discarding stale list response"
            );
            return Ok(false);
        }

        self.loading = false;
        let response = result?;
        self.items = response.data;
        self.total = response.total;
        Ok(true)
    }

    // =========================================================
    // 翻页
    // =========================================================

    pub fn can_go_previous(&self) -> bool {
        !self.loading && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.loading && self.page < self.total_pages()
    }

    /// 跳到指定页（限制在 1..=总页数），页码变化时开始一次刷新
    pub fn go_to(&mut self, page: u32) -> Option<ListTicket> {
        let page = page.clamp(1, self.total_pages());
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.begin_reload())
    }

    pub fn previous_page(&mut self) -> Option<ListTicket> {
        if !self.can_go_previous() {
            return None;
        }
        self.go_to(self.page - 1)
    }

    pub fn next_page(&mut self) -> Option<ListTicket> {
        if !self.can_go_next() {
            return None;
        }
        self.go_to(self.page + 1)
    }

    // =========================================================
    // 删除
    // =========================================================

    /// 请求删除，等待确认
    pub fn request_delete(&mut self, id: EntityId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&EntityId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// 用户确认删除，取出待删除的 ID
    pub fn confirm_delete(&mut self) -> Option<EntityId> {
        self.pending_delete.take()
    }
}

// =========================================================
// 异步流程
// =========================================================

/// 拉取 `ticket` 对应的页并应用；过期的响应返回 `Ok(false)`
pub async fn load<E, H, S>(screen: &H, source: &S, ticket: ListTicket) -> ClientResult<bool>
where
    H: StateCell<ListScreen<E>> + ?Sized,
    S: ListSource<E> + ?Sized,
{
    let result = source.fetch(ticket.page).await;
    screen
        .update_state(|s| s.complete_reload(ticket, result))
        .unwrap_or(Ok(false))
}

/// 重新加载当前页
pub async fn reload<E, H, S>(screen: &H, source: &S) -> ClientResult<bool>
where
    H: StateCell<ListScreen<E>> + ?Sized,
    S: ListSource<E> + ?Sized,
{
    let Some(ticket) = screen.update_state(ListScreen::begin_reload) else {
        return Ok(false);
    };
    load(screen, source, ticket).await
}

/// 确认后删除并重新加载当前页
///
/// 没有待确认的删除时不发出任何请求；删除失败时列表保持不变。
pub async fn delete_confirmed<E, H, S>(screen: &H, source: &S) -> ClientResult<bool>
where
    H: StateCell<ListScreen<E>> + ?Sized,
    S: ListSource<E> + RemoveSource + ?Sized,
{
    let Some(id) = screen.update_state(ListScreen::confirm_delete).flatten() else {
        return Ok(false);
    };
    source.remove(&id).await?;
    tracing::info!(%id, "entity deleted");
    reload(screen, source).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RentalApi;
    use crate::error::ClientError;
    use crate::request::{HttpMethod, MockHttpClient};
    use carrent_shared::Customer;
    use carrent_shared::protocol::{Operation, Resource};
    use rstest::rstest;
    use serde_json::json;
    use std::cell::RefCell;

    fn customers(n: usize) -> ListResponse<Customer> {
        ListResponse {
            data: (0..n)
                .map(|i| Customer {
                    id: EntityId::new(i.to_string()),
                    ..Default::default()
                })
                .collect(),
            total: 25,
            page: 1,
            limit: 10,
        }
    }

    #[rstest]
    #[case(1, 0, false, false)]
    #[case(1, 25, false, true)]
    #[case(2, 25, true, true)]
    #[case(3, 25, true, false)]
    fn test_pagination_bounds(
        #[case] page: u32,
        #[case] total: u64,
        #[case] previous: bool,
        #[case] next: bool,
    ) {
        let mut screen = ListScreen::<Customer>::new(10);
        screen.page = page;
        screen.total = total;
        assert_eq!(screen.can_go_previous(), previous);
        assert_eq!(screen.can_go_next(), next);

        screen.loading = true;
        assert!(!screen.can_go_previous());
        assert!(!screen.can_go_next());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut screen = ListScreen::<Customer>::new(10);
        screen.total = 25;

        let first = screen.go_to(2).unwrap();
        // 第 2 页尚未返回时直接跳到了第 3 页
        let second = screen.go_to(3).unwrap();
        assert_eq!(second.page.page, 3);

        assert_eq!(screen.complete_reload(second, Ok(customers(5))), Ok(true));
        assert_eq!(screen.items.len(), 5);
        assert!(!screen.loading);

        assert_eq!(screen.complete_reload(first, Ok(customers(10))), Ok(false));
        assert_eq!(screen.items.len(), 5);
        assert_eq!(screen.page, 3);
    }

    #[test]
    fn test_stale_failure_does_not_clear_loading() {
        let mut screen = ListScreen::<Customer>::new(10);
        let old = screen.begin_reload();
        let latest = screen.begin_reload();

        let err = ClientError::RequestFailed {
            resource: Resource::Customers,
            operation: Operation::List,
            status: 500,
        };
        assert_eq!(screen.complete_reload(old, Err(err.clone())), Ok(false));
        assert!(screen.loading);

        assert_eq!(screen.complete_reload(latest, Err(err.clone())), Err(err));
        assert!(!screen.loading);
    }

    #[test]
    fn test_go_to_is_clamped() {
        let mut screen = ListScreen::<Customer>::new(10);
        screen.total = 25;
        assert_eq!(screen.go_to(9).map(|t| t.page.page), Some(3));
        assert_eq!(screen.go_to(3), None);
        assert_eq!(screen.go_to(0).map(|t| t.page.page), Some(1));
    }

    #[tokio::test]
    async fn test_reload_issues_one_request_per_page() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        for page in 1..=3 {
            api.client().mock_response(
                HttpMethod::Get,
                &format!("http://api.test/customers?page={}&limit=10", page),
                200,
                json!({ "data": [{ "id": page }], "total": 25 }),
            );
        }

        let screen = RefCell::new(ListScreen::<Customer>::new(10));
        let source = api.customers();
        assert!(reload(&screen, &source).await.unwrap());
        for page in 2..=3 {
            let ticket = screen.borrow_mut().next_page().unwrap();
            assert!(load(&screen, &source, ticket).await.unwrap());
            let current = screen.borrow();
            assert_eq!(current.items[0].id.to_string(), page.to_string());
            assert_eq!(current.total, 25);
        }
        assert_eq!(api.client().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_cancel_delete_issues_no_request() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        let mut initial = ListScreen::<Customer>::new(10);
        initial.items = customers(2).data;
        initial.request_delete("1".into());
        initial.cancel_delete();
        let screen = RefCell::new(initial);

        assert!(!delete_confirmed(&screen, &api.customers()).await.unwrap());
        assert!(api.client().requests().is_empty());
        assert_eq!(screen.borrow().items.len(), 2);
    }

    #[tokio::test]
    async fn test_confirmed_delete_then_reloads_current_page() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        api.client().mock_response(
            HttpMethod::Delete,
            "http://api.test/customers/1",
            200,
            json!({ "success": true }),
        );
        api.client().mock_response(
            HttpMethod::Get,
            "http://api.test/customers?page=1&limit=10",
            200,
            json!({ "data": [{ "id": 2 }], "total": 1 }),
        );

        let screen = RefCell::new(ListScreen::<Customer>::new(10));
        screen.borrow_mut().request_delete("1".into());
        assert!(delete_confirmed(&screen, &api.customers()).await.unwrap());

        assert_eq!(
            api.client().request_lines(),
            vec![
                "DELETE http://api.test/customers/1",
                "GET http://api.test/customers?page=1&limit=10",
            ]
        );
        let screen = screen.into_inner();
        assert_eq!(screen.total, 1);
        assert!(!screen.loading);
        assert!(screen.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_list() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        let mut initial = ListScreen::<Customer>::new(10);
        initial.items = customers(3).data;
        initial.request_delete("1".into());
        let screen = RefCell::new(initial);

        let err = delete_confirmed(&screen, &api.customers()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(screen.borrow().items.len(), 3);
        assert_eq!(api.client().request_lines(), vec!["DELETE http://api.test/customers/1"]);
    }
}
