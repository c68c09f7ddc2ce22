use carrent_client::route::AppRoute;
use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let sections = [
        (AppRoute::AdminCustomers, "Khách hàng", "Xem, sửa và xóa thông tin khách hàng."),
        (AppRoute::AdminUsers, "Người dùng", "Quản lý tài khoản đăng nhập hệ thống."),
        (AppRoute::AdminViolations, "Vi phạm", "Danh mục các khoản phạt và mức phạt."),
    ];

    view! {
        <div class="grid gap-6 md:grid-cols-3">
            {sections
                .into_iter()
                .map(|(route, title, description)| {
                    view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <h3 class="card-title">{title}</h3>
                                <p class="text-base-content/70">{description}</p>
                                <div class="card-actions justify-end">
                                    <Link to=route class="btn btn-primary btn-sm">
                                        "Mở"
                                    </Link>
                                </div>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
