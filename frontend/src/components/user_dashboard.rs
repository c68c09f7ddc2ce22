use carrent_client::list::{self, ListScreen, ListTicket};
use carrent_client::route::AppRoute;
use carrent_shared::Contract;
use carrent_shared::pricing::format_vnd;
use leptos::prelude::*;

use crate::auth::AuthContext;
use crate::components::list_page::{ListPagination, ListStatus, load_failed, spawn_action};
use crate::components::toast::{Toast, ToastView};
use crate::signal_cell::SignalCell;
use crate::web::router::Link;

/// 当前用户的合同列表
#[component]
pub fn UserDashboardPage(auth: AuthContext) -> impl IntoView {
    let toast = Toast::new();
    let screen = RwSignal::new(ListScreen::<Contract>::new(auth.page_limit()));

    // `None` 表示重新加载当前页
    let load = move |ticket: Option<ListTicket>| {
        // 守卫保证此处已登录
        let Some(user) = auth.user_untracked() else {
            return;
        };
        spawn_action(auth, toast, move |api| async move {
            let source = api.contracts().of_user(user.id);
            let cell = SignalCell(screen);
            let result = match ticket {
                Some(ticket) => list::load(&cell, &source, ticket).await,
                None => list::reload(&cell, &source).await,
            };
            result.err().map(load_failed)
        });
    };

    load(None);

    view! {
        <ToastView toast=toast />
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Hợp đồng của tôi"</h3>
                        <p class="text-base-content/70 text-sm">
                            "Tổng số: " {move || screen.with(|s| s.total)}
                        </p>
                    </div>
                    <Link to=AppRoute::UserRent class="btn btn-primary">
                        "Thuê xe mới"
                    </Link>
                </div>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Xe"</th>
                                <th>"Ngày bắt đầu"</th>
                                <th>"Ngày kết thúc"</th>
                                <th class="text-right">"Giá dự kiến"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <ListStatus screen=screen colspan=4 />
                            <For
                                each=move || screen.with(|s| s.items.clone())
                                key=|c| c.id.clone()
                                children=move |contract| {
                                    let car = contract
                                        .car
                                        .as_ref()
                                        .map(|car| format!("{} {}", car.brand, car.name))
                                        .unwrap_or_else(|| contract.car_id.to_string());
                                    view! {
                                        <tr>
                                            <td class="font-semibold">{car}</td>
                                            <td>{contract.start_date.display_local()}</td>
                                            <td>{contract.end_date.display_local()}</td>
                                            <td class="text-right font-mono">
                                                {format_vnd(contract.estimated_price)} " đ"
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
                <ListPagination screen=screen on_ticket=move |ticket: ListTicket| load(Some(ticket)) />
            </div>
        </div>
    }
}
