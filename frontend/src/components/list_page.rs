//! 列表页的公共部分
//!
//! `ListController` 把客户端的列表与表单流程绑定到页面信号上，
//! 结果以 `Notice` 返回，由 `spawn_action` 显示在 toast 上。
//! `CrudPage` 是客户 / 用户 / 违章三个管理列表共用的页面骨架。

use std::future::Future;

use carrent_client::form::{self, FormDraft, FormModal, SaveSink};
use carrent_client::list::{self, ListScreen, ListTicket};
use carrent_client::{ClientError, HttpClient, RentalApi, ResourceApi};
use carrent_shared::protocol::{Deletable, Paginated};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{Api, AuthContext};
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::form_modal::{FieldSpec, FormModalView};
use crate::components::pagination::Pagination;
use crate::components::toast::{Notice, Toast, ToastView};
use crate::signal_cell::SignalCell;
use crate::web::FetchHttpClient;

/// 资源选择器，例如 `Api::customers`
pub type ResourceFn<E, C> = for<'a> fn(&'a RentalApi<C>) -> ResourceApi<'a, C, E>;

pub fn load_failed(e: ClientError) -> Notice {
    Notice::Error(format!("Không tải được danh sách: {}", e))
}

/// 在后台执行一个页面动作，结果显示在 toast 上
///
/// API 客户端在调用时取得，token 以发起动作的那一刻为准。
pub fn spawn_action<Fut>(auth: AuthContext, toast: Toast, action: impl FnOnce(Api) -> Fut)
where
    Fut: Future<Output = Option<Notice>> + 'static,
{
    let task = action(auth.api());
    spawn_local(async move {
        if let Some(notice) = task.await {
            toast.notify(notice);
        }
    });
}

/// 一个资源列表的控制器
pub struct ListController<E: 'static, C: 'static = FetchHttpClient> {
    pub screen: RwSignal<ListScreen<E>>,
    resource: ResourceFn<E, C>,
}

impl<E: 'static, C: 'static> Clone for ListController<E, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: 'static, C: 'static> Copy for ListController<E, C> {}

impl<E, C> ListController<E, C>
where
    E: Paginated + Send + Sync + 'static,
    C: HttpClient + 'static,
{
    pub fn new(limit: u32, resource: ResourceFn<E, C>) -> Self {
        Self {
            screen: RwSignal::new(ListScreen::new(limit)),
            resource,
        }
    }

    pub async fn reload(self, api: &RentalApi<C>) -> Option<Notice> {
        list::reload(&SignalCell(self.screen), &(self.resource)(api))
            .await
            .err()
            .map(load_failed)
    }

    pub async fn load(self, api: &RentalApi<C>, ticket: ListTicket) -> Option<Notice> {
        list::load(&SignalCell(self.screen), &(self.resource)(api), ticket)
            .await
            .err()
            .map(load_failed)
    }

    /// 执行已确认的删除；`done` 为成功提示
    pub async fn delete_confirmed(self, api: &RentalApi<C>, done: &str) -> Option<Notice>
    where
        E: Deletable,
    {
        match list::delete_confirmed(&SignalCell(self.screen), &(self.resource)(api)).await {
            Ok(true) => Some(Notice::Success(done.to_string())),
            Ok(false) => None,
            Err(e) => Some(Notice::Error(format!("Xóa thất bại: {}", e))),
        }
    }

    /// 提交弹窗并在保存成功后重新加载当前页
    ///
    /// 校验错误写入 `form_error` 显示在弹窗内，其余错误作为通知返回。
    pub async fn submit<D>(
        self,
        api: &RentalApi<C>,
        modal: RwSignal<FormModal<D>>,
        form_error: RwSignal<Option<String>>,
    ) -> Option<Notice>
    where
        D: FormDraft + Send + Sync + 'static,
        D::Entity: Send + Sync + 'static,
        for<'a> ResourceApi<'a, C, E>: SaveSink<D>,
    {
        form_error.try_set(None);
        match form::submit(&SignalCell(modal), &(self.resource)(api)).await {
            Ok(true) => Some(
                self.reload(api)
                    .await
                    .unwrap_or_else(|| Notice::Success("Đã lưu thành công".to_string())),
            ),
            Ok(false) => None,
            Err(ClientError::Validation(e)) => {
                form_error.try_set(Some(e.to_string()));
                None
            }
            Err(e) => Some(Notice::Error(format!("Lưu thất bại: {}", e))),
        }
    }
}

/// 管理列表的页面骨架：表格、翻页、编辑弹窗、删除确认
#[component]
pub fn CrudPage<D>(
    auth: AuthContext,
    list: ListController<D::Entity>,
    modal: RwSignal<FormModal<D>>,
    title: &'static str,
    /// 表头：标签, class
    headers: &'static [(&'static str, &'static str)],
    /// 一行中操作按钮以外的单元格
    #[prop(into)]
    cells: Callback<D::Entity, AnyView>,
    fields: Vec<FieldSpec<D::Field>>,
    create_title: &'static str,
    edit_title: &'static str,
    delete_message: &'static str,
    deleted: &'static str,
    /// 标题右侧的按钮
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView
where
    D: FormDraft + Send + Sync + 'static,
    D::Entity: Paginated + Deletable + Send + Sync + 'static,
    D::Field: AsRef<str> + Send + Sync + 'static,
    for<'a> ResourceApi<'a, FetchHttpClient, D::Entity>: SaveSink<D>,
{
    let toast = Toast::new();
    let screen = list.screen;
    let form_error = RwSignal::new(Option::<String>::None);
    let colspan = headers.len() as u32 + 1;

    let load = move |ticket: ListTicket| {
        spawn_action(auth, toast, move |api| async move { list.load(&api, ticket).await });
    };
    let on_submit = move |_: ()| {
        spawn_action(auth, toast, move |api| async move {
            list.submit(&api, modal, form_error).await
        });
    };
    let on_confirm_delete = move |_: ()| {
        spawn_action(auth, toast, move |api| async move {
            list.delete_confirmed(&api, deleted).await
        });
    };

    // 初始加载
    spawn_action(auth, toast, move |api| async move { list.reload(&api).await });

    view! {
        <ToastView toast=toast />
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">{title}</h3>
                        <p class="text-base-content/70 text-sm">
                            "Tổng số: " {move || screen.with(|s| s.total)}
                        </p>
                    </div>
                    {children.map(|children| children())}
                </div>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                {headers
                                    .iter()
                                    .map(|&(label, class)| view! { <th class=class>{label}</th> })
                                    .collect_view()}
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <ListStatus screen=screen colspan=colspan />
                            <For
                                each=move || screen.with(|s| s.items.clone())
                                key=|entity: &D::Entity| D::entity_id(entity)
                                children=move |entity| {
                                    let id = D::entity_id(&entity);
                                    let edit_target = entity.clone();
                                    view! {
                                        <tr>
                                            {cells.run(entity)}
                                            <td class="flex gap-2 justify-end">
                                                <button
                                                    class="btn btn-ghost btn-sm"
                                                    on:click=move |_| modal.update(|m| m.open_edit(&edit_target))
                                                >
                                                    "Sửa"
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-sm text-error"
                                                    on:click=move |_| screen.update(|s| s.request_delete(id.clone()))
                                                >
                                                    "Xóa"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
                <ListPagination screen=screen on_ticket=load />
            </div>
        </div>

        <FormModalView
            modal=modal
            error=form_error
            create_title=create_title
            edit_title=edit_title
            fields=fields
            on_submit=on_submit
        />
        <ConfirmDialog
            open=Signal::derive(move || screen.with(|s| s.pending_delete().is_some()))
            message=delete_message
            on_confirm=on_confirm_delete
            on_cancel=move |_: ()| screen.update(|s| s.cancel_delete())
        />
    }
}

/// 绑定到某个列表的翻页控件
#[component]
pub fn ListPagination<E>(
    screen: RwSignal<ListScreen<E>>,
    /// 页码变化后发起刷新
    #[prop(into)]
    on_ticket: Callback<ListTicket>,
) -> impl IntoView
where
    E: Send + Sync + 'static,
{
    let turn = move |step: fn(&mut ListScreen<E>) -> Option<ListTicket>| {
        if let Some(ticket) = screen.try_update(step).flatten() {
            on_ticket.run(ticket);
        }
    };

    view! {
        <Pagination
            page=Signal::derive(move || screen.with(|s| s.page))
            total_pages=Signal::derive(move || screen.with(|s| s.total_pages()))
            can_previous=Signal::derive(move || screen.with(|s| s.can_go_previous()))
            can_next=Signal::derive(move || screen.with(|s| s.can_go_next()))
            on_previous=move |_: ()| turn(ListScreen::previous_page)
            on_next=move |_: ()| turn(ListScreen::next_page)
        />
    }
}

/// 表格下方的加载 / 空列表提示
#[component]
pub fn ListStatus<E>(screen: RwSignal<ListScreen<E>>, colspan: u32) -> impl IntoView
where
    E: Send + Sync + 'static,
{
    view! {
        <Show when=move || screen.with(|s| s.loading && s.items.is_empty())>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span> " Đang tải..."
                </td>
            </tr>
        </Show>
        <Show when=move || screen.with(|s| !s.loading && s.items.is_empty())>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    "Không có dữ liệu"
                </td>
            </tr>
        </Show>
    }
}
