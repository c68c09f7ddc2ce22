use carrent_client::route::AppRoute;
use leptos::prelude::*;

use crate::auth::AuthContext;
use crate::web::router::{Link, RouterService};

/// 受保护页面的外壳：应用标题、当前用户、注销按钮
#[component]
pub fn ProtectedLayout(auth: AuthContext, router: RouterService, children: Children) -> impl IntoView {
    let user_name = move || auth.user().map(|u| u.name).unwrap_or_default();

    let on_logout = move |_| {
        auth.logout();
        router.navigate(AppRoute::Login);
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to=AppRoute::Home class="btn btn-ghost text-xl">
                            "Quản lý thuê xe"
                        </Link>
                    </div>
                    <div class="flex-none gap-4">
                        <span class="font-semibold">{user_name}</span>
                        <button on:click=on_logout class="btn btn-outline btn-error">
                            "Đăng xuất"
                        </button>
                    </div>
                </div>
                {children()}
            </div>
        </div>
    }
}
